use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{UnknownToken, ValidationError};

/// The verb of a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Accept,
    Reject,
    Standby,
    Reopen,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Accept => write!(f, "Accept"),
            Action::Reject => write!(f, "Reject"),
            Action::Standby => write!(f, "Standby"),
            Action::Reopen => write!(f, "Reopen"),
        }
    }
}

impl FromStr for Action {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Accept" => Ok(Action::Accept),
            "Reject" => Ok(Action::Reject),
            "Standby" => Ok(Action::Standby),
            "Reopen" => Ok(Action::Reopen),
            other => Err(UnknownToken {
                kind: "action",
                value: other.to_string(),
            }),
        }
    }
}

/// Why a workflow stage ended. Distinct from the state the record lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    ReviewCompleted,
    InterviewCompleted,
    ReferenceCheckCompleted,
    OfferCompleted,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::ReviewCompleted => write!(f, "ReviewCompleted"),
            Resolution::InterviewCompleted => write!(f, "InterviewCompleted"),
            Resolution::ReferenceCheckCompleted => write!(f, "ReferenceCheckCompleted"),
            Resolution::OfferCompleted => write!(f, "OfferCompleted"),
        }
    }
}

impl FromStr for Resolution {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ReviewCompleted" => Ok(Resolution::ReviewCompleted),
            "InterviewCompleted" => Ok(Resolution::InterviewCompleted),
            "ReferenceCheckCompleted" => Ok(Resolution::ReferenceCheckCompleted),
            "OfferCompleted" => Ok(Resolution::OfferCompleted),
            other => Err(UnknownToken {
                kind: "resolution",
                value: other.to_string(),
            }),
        }
    }
}

/// A validated request to move an application through the workflow.
///
/// Construction enforces the per-action field requirements, so a handler
/// never sees an `Accept` without a reviewer or a `Reject` without a
/// resolution. There is no way to mutate a command once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    action: Action,
    reviewer_id: Option<String>,
    resolution: Option<Resolution>,
    note: String,
}

impl Command {
    /// Build a command, rejecting it when:
    /// - `Accept` has no (or an empty) reviewer id,
    /// - the reviewer id contains a comma or a line break,
    /// - `Standby` or `Reject` has no resolution,
    /// - the note is empty or spans more than one line.
    ///
    /// An empty reviewer id on any other action is treated as absent.
    pub fn new(
        action: Action,
        reviewer_id: Option<String>,
        resolution: Option<Resolution>,
        note: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let reviewer_id = reviewer_id.filter(|r| !r.is_empty());
        let note = note.into();

        if action == Action::Accept && reviewer_id.is_none() {
            return Err(ValidationError::MissingReviewer);
        }
        if reviewer_id
            .as_deref()
            .is_some_and(|r| r.contains([',', '\n', '\r']))
        {
            return Err(ValidationError::InvalidReviewer);
        }
        if matches!(action, Action::Standby | Action::Reject) && resolution.is_none() {
            return Err(ValidationError::MissingResolution(action));
        }
        if note.is_empty() {
            return Err(ValidationError::EmptyNote);
        }
        if note.contains(['\n', '\r']) {
            return Err(ValidationError::MultiLineNote);
        }

        Ok(Self {
            action,
            reviewer_id,
            resolution,
            note,
        })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn reviewer_id(&self) -> Option<&str> {
        self.reviewer_id.as_deref()
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn note(&self) -> &str {
        &self.note
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_requires_reviewer() {
        let err = Command::new(Action::Accept, None, None, "looks good").unwrap_err();
        assert_eq!(err, ValidationError::MissingReviewer);

        let err = Command::new(Action::Accept, Some(String::new()), None, "looks good").unwrap_err();
        assert_eq!(err, ValidationError::MissingReviewer);
    }

    #[test]
    fn reject_and_standby_require_resolution() {
        let err = Command::new(Action::Reject, Some("alice".into()), None, "no").unwrap_err();
        assert_eq!(err, ValidationError::MissingResolution(Action::Reject));

        let err = Command::new(Action::Standby, None, None, "later").unwrap_err();
        assert_eq!(err, ValidationError::MissingResolution(Action::Standby));
    }

    #[test]
    fn note_must_not_be_empty() {
        let err = Command::new(Action::Reopen, None, None, "").unwrap_err();
        assert_eq!(err, ValidationError::EmptyNote);
    }

    #[test]
    fn reviewer_with_delimiters_is_rejected() {
        for reviewer in ["Doe, Jane", "alice\nbob", "alice\r"] {
            let err = Command::new(Action::Accept, Some(reviewer.into()), None, "go").unwrap_err();
            assert_eq!(err, ValidationError::InvalidReviewer, "{reviewer:?}");
        }
        let cmd = Command::new(Action::Accept, Some("o'neil-j.doe".into()), None, "go").unwrap();
        assert_eq!(cmd.reviewer_id(), Some("o'neil-j.doe"));
    }

    #[test]
    fn note_must_fit_on_one_line() {
        for note in ["para one\n\npara two", "pros:\n-fast\n-kind", "a\r\nb"] {
            let err = Command::new(Action::Reopen, None, None, note).unwrap_err();
            assert_eq!(err, ValidationError::MultiLineNote, "{note:?}");
        }
        let cmd = Command::new(Action::Reopen, None, None, "pros: fast, kind - hire").unwrap();
        assert_eq!(cmd.note(), "pros: fast, kind - hire");
    }

    #[test]
    fn reopen_needs_nothing_but_a_note() {
        let cmd = Command::new(Action::Reopen, None, None, "second look").unwrap();
        assert_eq!(cmd.action(), Action::Reopen);
        assert_eq!(cmd.reviewer_id(), None);
        assert_eq!(cmd.resolution(), None);
        assert_eq!(cmd.note(), "second look");
    }

    #[test]
    fn empty_reviewer_is_normalized_to_absent() {
        let cmd = Command::new(
            Action::Standby,
            Some(String::new()),
            Some(Resolution::ReviewCompleted),
            "hold",
        )
        .unwrap();
        assert_eq!(cmd.reviewer_id(), None);
    }

    #[test]
    fn tokens_parse_from_display_names() {
        for action in [Action::Accept, Action::Reject, Action::Standby, Action::Reopen] {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
        assert_eq!(
            "ReferenceCheckCompleted".parse::<Resolution>().unwrap(),
            Resolution::ReferenceCheckCompleted
        );
        let err = "Done".parse::<Resolution>().unwrap_err();
        assert_eq!(err.kind, "resolution");
    }
}
