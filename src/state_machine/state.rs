use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::application::{Category, Workflow};
use super::command::{Action, Command, Resolution};
use crate::error::{InapplicableCommand, UnknownToken};

/// The six states of an application's hiring workflow.
///
/// Applications start in `Review`. `Waitlist` and `Closed` are dead ends that
/// only a narrow `Reopen` can leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Review,
    Interview,
    RefCheck,
    Offer,
    Waitlist,
    Closed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Review => write!(f, "Review"),
            State::Interview => write!(f, "Interview"),
            State::RefCheck => write!(f, "RefCheck"),
            State::Offer => write!(f, "Offer"),
            State::Waitlist => write!(f, "Waitlist"),
            State::Closed => write!(f, "Closed"),
        }
    }
}

impl FromStr for State {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Review" => Ok(State::Review),
            "Interview" => Ok(State::Interview),
            "RefCheck" => Ok(State::RefCheck),
            "Offer" => Ok(State::Offer),
            "Waitlist" => Ok(State::Waitlist),
            "Closed" => Ok(State::Closed),
            other => Err(UnknownToken {
                kind: "state",
                value: other.to_string(),
            }),
        }
    }
}

/// The result of a successful transition: where the record lands and the
/// business fields it carries there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub to: State,
    pub workflow: Workflow,
}

/// The transition table of the hiring workflow.
pub struct StateMachine;

impl StateMachine {
    /// Compute the transition for `command` from `state` with the record's
    /// current business fields.
    ///
    /// This is a pure function: `current` is never touched, and a guard miss
    /// returns [`InapplicableCommand`] without producing any fields. Arms are
    /// tried in order and the first matching guard wins.
    pub fn next(
        state: State,
        current: &Workflow,
        command: &Command,
    ) -> Result<Transition, InapplicableCommand> {
        let mut next = current.clone();
        let reviewer = command.reviewer_id().map(str::to_string);

        let to = match (state, command.action()) {
            (State::Review, Action::Accept) if reviewer.is_some() => {
                next.reviewer = reviewer;
                next.category = Category::Old;
                State::Interview
            }
            (State::Review, Action::Standby) if current.category != Category::Old => {
                next.resolution = Some(Resolution::ReviewCompleted);
                next.reviewer = reviewer;
                State::Waitlist
            }
            (State::Review, Action::Reject) => {
                next.resolution = Some(Resolution::ReviewCompleted);
                next.reviewer = reviewer;
                State::Closed
            }

            (State::Interview, Action::Accept) if reviewer.is_some() => {
                next.reviewer = reviewer;
                next.paperwork_processed = true;
                State::RefCheck
            }
            (State::Interview, Action::Standby) => {
                next.resolution = Some(Resolution::InterviewCompleted);
                next.reviewer = reviewer;
                State::Waitlist
            }
            (State::Interview, Action::Reject) => {
                next.resolution = Some(Resolution::InterviewCompleted);
                next.reviewer = reviewer;
                State::Closed
            }

            (State::RefCheck, Action::Accept) if reviewer.is_some() => {
                next.paperwork_processed = true;
                next.reviewer = reviewer;
                next.resolution = None;
                State::Offer
            }
            (State::RefCheck, Action::Reject) => {
                next.resolution = Some(Resolution::ReferenceCheckCompleted);
                next.reviewer = reviewer;
                State::Closed
            }

            (State::Offer, Action::Accept) if reviewer.is_some() => {
                next.resolution = Some(Resolution::OfferCompleted);
                next.paperwork_processed = true;
                next.category = Category::Hired;
                State::Closed
            }
            // A declined offer never keeps a reviewer, whatever the command says.
            (State::Offer, Action::Reject) => {
                next.resolution = Some(Resolution::OfferCompleted);
                next.reviewer = None;
                State::Closed
            }

            (State::Waitlist, Action::Reopen)
                if current.resolution == Some(Resolution::InterviewCompleted)
                    && reviewer.is_some() =>
            {
                next.paperwork_processed = true;
                next.resolution = None;
                next.reviewer = reviewer;
                State::RefCheck
            }
            (State::Waitlist, Action::Reopen)
                if current.resolution == Some(Resolution::ReviewCompleted)
                    && current.category == Category::New =>
            {
                next.category = Category::Old;
                next.resolution = None;
                next.paperwork_processed = false;
                next.reviewer = reviewer;
                State::Review
            }

            // Closed is terminal except for a New applicant closed at review.
            (State::Closed, Action::Reopen)
                if current.category == Category::New
                    && current.resolution == Some(Resolution::ReviewCompleted) =>
            {
                next.category = Category::Old;
                next.resolution = None;
                State::Review
            }

            (state, action) => return Err(InapplicableCommand { state, action }),
        };

        Ok(Transition { to, workflow: next })
    }
}
