mod application;
mod command;
mod state;

pub use application::{Application, ApplicationParts, Category, NoteLog, Workflow};
pub use command::{Action, Command, Resolution};
pub use state::{State, StateMachine, Transition};
