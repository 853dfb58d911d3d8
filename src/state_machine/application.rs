use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::command::{Command, Resolution};
use super::state::{State, StateMachine};
use crate::error::{InapplicableCommand, UnknownToken, ValidationError};

/// Applicant track. `New` applicants pass an extra review gate before they
/// become `Old`; `Hired` only follows an accepted offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    New,
    Old,
    Hired,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::New => write!(f, "New"),
            Category::Old => write!(f, "Old"),
            Category::Hired => write!(f, "Hired"),
        }
    }
}

impl FromStr for Category {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(Category::New),
            "Old" => Ok(Category::Old),
            "Hired" => Ok(Category::Hired),
            other => Err(UnknownToken {
                kind: "category",
                value: other.to_string(),
            }),
        }
    }
}

/// The business fields a transition may rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workflow {
    pub category: Category,
    pub resolution: Option<Resolution>,
    pub reviewer: Option<String>,
    pub paperwork_processed: bool,
}

/// Append-only log of notes, each tagged with the state it was written in.
///
/// Never empty: it can only be built from a first note or from a non-empty
/// list of already tagged entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NoteLog(Vec<String>);

impl NoteLog {
    fn first(state: State, text: &str) -> Self {
        Self(vec![Self::tag(state, text)])
    }

    /// Wrap entries that already carry their tag, as read back from storage.
    pub fn from_entries(entries: Vec<String>) -> Result<Self, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::NoNotes);
        }
        if entries.iter().any(|e| is_multi_line(e)) {
            return Err(ValidationError::MultiLineNote);
        }
        Ok(Self(entries))
    }

    fn append(&mut self, state: State, text: &str) {
        self.0.push(Self::tag(state, text));
    }

    fn tag(state: State, text: &str) -> String {
        format!("[{state}] {text}")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn last(&self) -> &str {
        // Non-empty by construction.
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raw field values of a stored record, before the invariants are checked.
#[derive(Debug, Clone)]
pub struct ApplicationParts {
    pub id: u32,
    pub state: State,
    pub category: Category,
    pub summary: String,
    pub reviewer: Option<String>,
    pub paperwork_processed: bool,
    pub resolution: Option<Resolution>,
    pub notes: Vec<String>,
}

/// One applicant's record in the hiring workflow.
///
/// The state machine is embedded: the only way to change anything after
/// construction is [`Application::update`], which either applies a whole
/// transition and appends exactly one note, or changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    id: u32,
    state: State,
    summary: String,
    #[serde(flatten)]
    workflow: Workflow,
    notes: NoteLog,
}

impl Application {
    /// Intake a new applicant in `Review` with a first note tagged `[Review]`.
    pub fn new(
        id: u32,
        category: Category,
        summary: impl Into<String>,
        note: &str,
    ) -> Result<Self, ValidationError> {
        let summary = summary.into();
        if id == 0 {
            return Err(ValidationError::InvalidId);
        }
        if category == Category::Hired {
            return Err(ValidationError::HiredIntake);
        }
        if summary.is_empty() {
            return Err(ValidationError::EmptySummary);
        }
        if is_multi_line(&summary) {
            return Err(ValidationError::MultiLineSummary);
        }
        if note.is_empty() {
            return Err(ValidationError::EmptyNote);
        }
        if is_multi_line(note) {
            return Err(ValidationError::MultiLineNote);
        }

        Ok(Self {
            id,
            state: State::Review,
            summary,
            workflow: Workflow {
                category,
                resolution: None,
                reviewer: None,
                paperwork_processed: false,
            },
            notes: NoteLog::first(State::Review, note),
        })
    }

    /// Rebuild a record from stored fields.
    ///
    /// Accepts exactly the shapes the transition table can produce, so a
    /// record that loads can always be driven further by commands.
    pub fn from_parts(parts: ApplicationParts) -> Result<Self, ValidationError> {
        if parts.id == 0 {
            return Err(ValidationError::InvalidId);
        }
        if parts.summary.is_empty() {
            return Err(ValidationError::EmptySummary);
        }
        if is_multi_line(&parts.summary) {
            return Err(ValidationError::MultiLineSummary);
        }
        let reviewer = parts.reviewer.filter(|r| !r.is_empty());
        if reviewer.as_deref().is_some_and(|r| r.contains([',', '\n', '\r'])) {
            return Err(ValidationError::InvalidReviewer);
        }
        let notes = NoteLog::from_entries(parts.notes)?;
        let workflow = Workflow {
            category: parts.category,
            resolution: parts.resolution,
            reviewer,
            paperwork_processed: parts.paperwork_processed,
        };
        check_shape(parts.state, &workflow)?;

        Ok(Self {
            id: parts.id,
            state: parts.state,
            summary: parts.summary,
            workflow,
            notes,
        })
    }

    /// Apply `command` through the handler for the current state.
    ///
    /// On success the new note is tagged with the destination state, not the
    /// state the record was in when the command arrived.
    pub fn update(&mut self, command: &Command) -> Result<(), InapplicableCommand> {
        let transition = match StateMachine::next(self.state, &self.workflow, command) {
            Ok(t) => t,
            Err(err) => {
                debug!(id = self.id, state = %self.state, action = %command.action(), "command rejected");
                return Err(err);
            }
        };

        debug!(
            id = self.id,
            from = %self.state,
            to = %transition.to,
            action = %command.action(),
            "application transitioned"
        );
        self.state = transition.to;
        self.workflow = transition.workflow;
        self.notes.append(self.state, command.note());
        Ok(())
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn category(&self) -> Category {
        self.workflow.category
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.workflow.resolution
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn reviewer(&self) -> Option<&str> {
        self.workflow.reviewer.as_deref()
    }

    pub fn is_paperwork_processed(&self) -> bool {
        self.workflow.paperwork_processed
    }

    pub fn notes(&self) -> &NoteLog {
        &self.notes
    }
}

/// Every text field is stored on a single line of the data file.
fn is_multi_line(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

fn check_shape(state: State, w: &Workflow) -> Result<(), ValidationError> {
    let fail = |rule: &'static str| -> Result<(), ValidationError> {
        Err(ValidationError::Inconsistent { state, rule })
    };
    let active = matches!(state, State::Interview | State::RefCheck | State::Offer);

    if active && w.category != Category::Old {
        return fail("only Old applicants can be interviewed, checked or offered");
    }
    if active && w.reviewer.is_none() {
        return fail("a reviewer must be assigned");
    }
    if w.category == Category::New && w.paperwork_processed {
        return fail("New applicants have no processed paperwork");
    }

    match state {
        State::Review => {
            if w.resolution.is_some() {
                return fail("resolution must be empty");
            }
            if w.category == Category::Hired {
                return fail("Hired applicants are always closed");
            }
            if w.paperwork_processed {
                return fail("paperwork is not processed before interview");
            }
        }
        State::Interview => {
            if w.resolution.is_some() {
                return fail("resolution must be empty");
            }
            if w.paperwork_processed {
                return fail("paperwork is not processed before interview");
            }
        }
        State::RefCheck | State::Offer => {
            if w.resolution.is_some() {
                return fail("resolution must be empty");
            }
            if !w.paperwork_processed {
                return fail("paperwork must be processed");
            }
        }
        State::Waitlist => match (w.resolution, w.category) {
            (Some(Resolution::ReviewCompleted), Category::New)
            | (Some(Resolution::InterviewCompleted), Category::Old) => {
                if w.paperwork_processed {
                    return fail("paperwork is not processed while waitlisted");
                }
            }
            _ => {
                return fail(
                    "waitlist needs ReviewCompleted for New or InterviewCompleted for Old",
                );
            }
        },
        State::Closed => {
            let Some(resolution) = w.resolution else {
                return fail("a closed application needs a resolution");
            };
            if w.category == Category::Hired && resolution != Resolution::OfferCompleted {
                return fail("Hired applicants close with OfferCompleted");
            }
            if w.category == Category::New && resolution != Resolution::ReviewCompleted {
                return fail("New applicants can only be closed at review");
            }
            let processed = matches!(
                resolution,
                Resolution::ReferenceCheckCompleted | Resolution::OfferCompleted
            );
            if w.paperwork_processed != processed {
                return fail("paperwork flag does not match the stage it closed in");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::Action;

    fn app() -> Application {
        Application::new(1, Category::New, "Backend role", "Applied via referral").unwrap()
    }

    fn cmd(action: Action, reviewer: Option<&str>, resolution: Option<Resolution>) -> Command {
        Command::new(action, reviewer.map(str::to_string), resolution, "note").unwrap()
    }

    fn parts(state: State, category: Category) -> ApplicationParts {
        ApplicationParts {
            id: 3,
            state,
            category,
            summary: "Data role".into(),
            reviewer: Some("alice".into()),
            paperwork_processed: false,
            resolution: None,
            notes: vec!["[Review] in".into()],
        }
    }

    #[test]
    fn new_application_starts_in_review() {
        let a = app();
        assert_eq!(a.id(), 1);
        assert_eq!(a.state(), State::Review);
        assert_eq!(a.category(), Category::New);
        assert_eq!(a.resolution(), None);
        assert_eq!(a.reviewer(), None);
        assert!(!a.is_paperwork_processed());
        assert_eq!(a.notes().iter().collect::<Vec<_>>(), ["[Review] Applied via referral"]);
    }

    #[test]
    fn new_application_rejects_bad_fields() {
        assert_eq!(
            Application::new(0, Category::New, "s", "n").unwrap_err(),
            ValidationError::InvalidId
        );
        assert_eq!(
            Application::new(1, Category::Hired, "s", "n").unwrap_err(),
            ValidationError::HiredIntake
        );
        assert_eq!(
            Application::new(1, Category::Old, "", "n").unwrap_err(),
            ValidationError::EmptySummary
        );
        assert_eq!(
            Application::new(1, Category::Old, "s", "").unwrap_err(),
            ValidationError::EmptyNote
        );
    }

    #[test]
    fn line_breaks_are_refused_in_summary_and_first_note() {
        assert_eq!(
            Application::new(1, Category::New, "Role\nline2", "n").unwrap_err(),
            ValidationError::MultiLineSummary
        );
        assert_eq!(
            Application::new(1, Category::New, "Role\r", "n").unwrap_err(),
            ValidationError::MultiLineSummary
        );
        assert_eq!(
            Application::new(1, Category::New, "Role", "para one\n\npara two").unwrap_err(),
            ValidationError::MultiLineNote
        );
        let a = Application::new(1, Category::New, "Ops, nights - remote", "pros: fast, kind").unwrap();
        assert_eq!(a.summary(), "Ops, nights - remote");
    }

    #[test]
    fn from_parts_rejects_fields_that_cannot_be_stored() {
        let mut p = parts(State::Review, Category::New);
        p.summary = "Role\nline2".into();
        assert_eq!(
            Application::from_parts(p).unwrap_err(),
            ValidationError::MultiLineSummary
        );

        let mut p = parts(State::Interview, Category::Old);
        p.reviewer = Some("Doe, Jane".into());
        assert_eq!(
            Application::from_parts(p).unwrap_err(),
            ValidationError::InvalidReviewer
        );

        let mut p = parts(State::Review, Category::New);
        p.notes = vec!["[Review] one\ntwo".into()];
        assert_eq!(
            Application::from_parts(p).unwrap_err(),
            ValidationError::MultiLineNote
        );
    }

    #[test]
    fn note_is_tagged_with_destination_state() {
        let mut a = app();
        a.update(&cmd(Action::Accept, Some("alice"), None)).unwrap();
        assert_eq!(a.state(), State::Interview);
        assert_eq!(a.notes().last(), "[Interview] note");
        assert!(!a.notes().last().starts_with("[Review]"));

        a.update(&cmd(Action::Standby, None, Some(Resolution::InterviewCompleted)))
            .unwrap();
        assert_eq!(a.notes().last(), "[Waitlist] note");
        assert_eq!(a.notes().len(), 3);
    }

    #[test]
    fn failed_update_changes_nothing() {
        let mut a = app();
        a.update(&cmd(Action::Reject, Some("alice"), Some(Resolution::ReviewCompleted)))
            .unwrap();

        let before = a.clone();
        let err = a.update(&cmd(Action::Accept, Some("bob"), None)).unwrap_err();
        assert_eq!(err.state, State::Closed);
        assert_eq!(a, before);
    }

    #[test]
    fn reopen_from_closed_is_legal_exactly_once() {
        let mut a = app();
        a.update(&cmd(Action::Reject, None, Some(Resolution::ReviewCompleted)))
            .unwrap();
        a.update(&cmd(Action::Reopen, None, None)).unwrap();
        assert_eq!(a.state(), State::Review);
        assert_eq!(a.category(), Category::Old);

        a.update(&cmd(Action::Reject, None, Some(Resolution::ReviewCompleted)))
            .unwrap();
        assert_eq!(a.state(), State::Closed);
        assert!(a.update(&cmd(Action::Reopen, None, None)).is_err());
    }

    #[test]
    fn from_parts_normalizes_empty_reviewer() {
        let mut p = parts(State::Review, Category::New);
        p.reviewer = Some(String::new());
        let a = Application::from_parts(p).unwrap();
        assert_eq!(a.reviewer(), None);
    }

    #[test]
    fn from_parts_requires_reviewer_for_interview() {
        let mut p = parts(State::Interview, Category::Old);
        p.reviewer = Some(String::new());
        let err = Application::from_parts(p).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Inconsistent {
                state: State::Interview,
                ..
            }
        ));
    }

    #[test]
    fn from_parts_rejects_resolution_in_review() {
        let mut p = parts(State::Review, Category::Old);
        p.resolution = Some(Resolution::ReviewCompleted);
        assert!(Application::from_parts(p).is_err());
    }

    #[test]
    fn from_parts_rejects_new_applicant_in_active_states() {
        for state in [State::Interview, State::RefCheck, State::Offer] {
            let mut p = parts(state, Category::New);
            p.paperwork_processed = state != State::Interview;
            assert!(Application::from_parts(p).is_err(), "{state}");
        }
    }

    #[test]
    fn from_parts_requires_notes() {
        let mut p = parts(State::Review, Category::New);
        p.notes.clear();
        assert_eq!(Application::from_parts(p).unwrap_err(), ValidationError::NoNotes);
    }

    #[test]
    fn from_parts_checks_waitlist_resolution() {
        let mut p = parts(State::Waitlist, Category::Old);
        p.resolution = Some(Resolution::InterviewCompleted);
        p.reviewer = None;
        assert!(Application::from_parts(p.clone()).is_ok());

        p.resolution = Some(Resolution::OfferCompleted);
        assert!(Application::from_parts(p).is_err());
    }

    #[test]
    fn from_parts_checks_closed_hired() {
        let mut p = parts(State::Closed, Category::Hired);
        p.resolution = Some(Resolution::OfferCompleted);
        p.paperwork_processed = true;
        assert!(Application::from_parts(p.clone()).is_ok());

        p.resolution = Some(Resolution::InterviewCompleted);
        p.paperwork_processed = false;
        assert!(Application::from_parts(p).is_err());
    }
}
