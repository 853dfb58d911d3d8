//! Hireflow command line, built on clap.
//!
//! Defines [`Cli`] with its [`Command`] subcommands (list, show, add, update,
//! delete) and the global flags (--file, --json, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use hireflow::state_machine::{Action, Category, Resolution};

/// Hireflow: track applicants through the hiring workflow.
#[derive(Debug, Parser)]
#[command(name = "hireflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Data file to read and write instead of the configured one.
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Enable debug logging on stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Applicant category as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    New,
    Old,
    Hired,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::New => Category::New,
            CategoryArg::Old => Category::Old,
            CategoryArg::Hired => Category::Hired,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Accept,
    Reject,
    Standby,
    Reopen,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Accept => Action::Accept,
            ActionArg::Reject => Action::Reject,
            ActionArg::Standby => Action::Standby,
            ActionArg::Reopen => Action::Reopen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolutionArg {
    ReviewCompleted,
    InterviewCompleted,
    ReferenceCheckCompleted,
    OfferCompleted,
}

impl From<ResolutionArg> for Resolution {
    fn from(arg: ResolutionArg) -> Self {
        match arg {
            ResolutionArg::ReviewCompleted => Resolution::ReviewCompleted,
            ResolutionArg::InterviewCompleted => Resolution::InterviewCompleted,
            ResolutionArg::ReferenceCheckCompleted => Resolution::ReferenceCheckCompleted,
            ResolutionArg::OfferCompleted => Resolution::OfferCompleted,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List applications in ascending id order.
    List {
        /// Only show applications of this category.
        #[arg(long)]
        category: Option<CategoryArg>,
    },

    /// Show one application with its notes.
    Show { id: u32 },

    /// Take in a new applicant. The application starts in Review.
    Add {
        category: CategoryArg,
        summary: String,
        /// First note on the application.
        note: String,
    },

    /// Apply a workflow command to an application.
    Update {
        id: u32,
        action: ActionArg,

        /// Reviewer id; required to accept.
        #[arg(long)]
        reviewer: Option<String>,

        /// Resolution; required to reject or put on standby.
        #[arg(long, value_enum)]
        resolution: Option<ResolutionArg>,

        #[arg(long)]
        note: String,
    },

    /// Delete an application. Its id is not reused.
    Delete { id: u32 },
}
