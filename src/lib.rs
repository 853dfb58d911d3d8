//! Hiring workflow tracker.
//!
//! Each [`Application`](state_machine::Application) carries its own state
//! machine: callers build a validated [`Command`](state_machine::Command) and
//! hand it to `update`, which either applies a whole transition or leaves the
//! record untouched. The [`Registry`](registry::Registry) owns a collection of
//! records and persists them through the flat-text [`codec`].

pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod state_machine;
pub mod telemetry;

pub use error::{FormatError, HireflowError, InapplicableCommand, ValidationError};
pub use registry::Registry;
