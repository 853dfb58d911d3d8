//! Error types for the hiring workflow.
//!
//! Three domain failures stay distinguishable all the way to the caller:
//! [`ValidationError`] for malformed commands or record fields,
//! [`InapplicableCommand`] for a guard miss in the transition table, and
//! [`FormatError`] for malformed persisted text. [`HireflowError`] gathers
//! them together with the I/O and configuration failures of the outer layers.

use thiserror::Error;

use crate::state_machine::{Action, State};

/// A command or record whose fields break a construction rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("accept requires a reviewer id")]
    MissingReviewer,

    #[error("{0} requires a resolution")]
    MissingResolution(Action),

    /// Reviewer ids are stored as a comma-separated header field.
    #[error("reviewer id must not contain commas or line breaks")]
    InvalidReviewer,

    #[error("note must not be empty")]
    EmptyNote,

    #[error("note must fit on a single line")]
    MultiLineNote,

    #[error("summary must not be empty")]
    EmptySummary,

    #[error("summary must fit on a single line")]
    MultiLineSummary,

    #[error("no application ids left to assign")]
    IdsExhausted,

    #[error("application id must be a positive integer")]
    InvalidId,

    #[error("an application must carry at least one note")]
    NoNotes,

    /// New intakes start as `New` or `Old`; `Hired` is only reachable by
    /// accepting an offer.
    #[error("applications cannot be created as Hired")]
    HiredIntake,

    /// A record shape that no sequence of transitions can produce.
    #[error("inconsistent {state} application: {rule}")]
    Inconsistent { state: State, rule: &'static str },
}

/// The command is well formed but no transition out of `state` accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{action} is not applicable to an application in {state}")]
pub struct InapplicableCommand {
    pub state: State,
    pub action: Action,
}

/// A token that does not name any state, category, resolution or action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} `{value}`")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub value: String,
}

/// Malformed persisted text. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no record found")]
    Empty,

    #[error("line {line}: expected a single record")]
    TrailingRecord { line: usize },

    #[error("line {line}: expected a `*` header or `-` note line")]
    StrayText { line: usize },

    #[error("line {line}: expected at least 6 header fields, found {found}")]
    MissingFields { line: usize, found: usize },

    #[error("line {line}: `{value}` is not a valid application id")]
    InvalidId { line: usize, value: String },

    #[error("line {line}: `{value}` is not `true` or `false`")]
    InvalidFlag { line: usize, value: String },

    #[error("line {line}: {source}")]
    UnknownToken {
        line: usize,
        #[source]
        source: UnknownToken,
    },

    #[error("line {line}: record has no note lines")]
    MissingNotes { line: usize },

    #[error("line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Error)]
pub enum HireflowError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("command rejected: {0}")]
    Inapplicable(#[from] InapplicableCommand),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("Application not found: {0}")]
    NotFound(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
