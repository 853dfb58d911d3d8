//! Caller-owned collection of applications.
//!
//! [`Registry`] keeps records in ascending id order, hands out ids for new
//! intakes, routes commands to the matching record and exposes the list views
//! and file persistence the command line needs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::codec;
use crate::error::{FormatError, HireflowError, ValidationError};
use crate::state_machine::{Application, Category, Command, State};

/// What to do with a record that fails to decode during a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// The first bad record fails the whole load and nothing is replaced.
    #[default]
    Abort,
    /// Bad records are logged and left out.
    Skip,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<FormatError>,
    pub duplicates: Vec<u32>,
}

/// One line of the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationRow {
    pub id: u32,
    pub state: State,
    pub category: Category,
    pub summary: String,
}

impl From<&Application> for ApplicationRow {
    fn from(app: &Application) -> Self {
        Self {
            id: app.id(),
            state: app.state(),
            category: app.category(),
            summary: app.summary().to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    apps: BTreeMap<u32, Application>,
    counter: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intake a new applicant under the next free id and return that id.
    pub fn create(
        &mut self,
        category: Category,
        summary: &str,
        first_note: &str,
    ) -> Result<u32, ValidationError> {
        let id = self
            .counter
            .checked_add(1)
            .ok_or(ValidationError::IdsExhausted)?;
        let app = Application::new(id, category, summary, first_note)?;
        self.counter = id;
        self.apps.insert(id, app);
        info!(id, %category, "application created");
        Ok(id)
    }

    /// Insert an existing record. Returns `false` and keeps the record already
    /// stored when the id is taken.
    pub fn add(&mut self, app: Application) -> bool {
        let id = app.id();
        if self.apps.contains_key(&id) {
            return false;
        }
        self.counter = self.counter.max(id);
        self.apps.insert(id, app);
        true
    }

    pub fn get(&self, id: u32) -> Option<&Application> {
        self.apps.get(&id)
    }

    /// Records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Application> {
        self.apps.values()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Application> {
        self.iter().filter(move |app| app.category() == category)
    }

    /// Route `command` to the record with `id`.
    pub fn execute(&mut self, id: u32, command: &Command) -> Result<(), HireflowError> {
        let app = self.apps.get_mut(&id).ok_or(HireflowError::NotFound(id))?;
        app.update(command)?;
        Ok(())
    }

    /// Remove a record. Its id is never handed out again by [`Registry::create`].
    pub fn remove(&mut self, id: u32) -> Option<Application> {
        let removed = self.apps.remove(&id);
        if removed.is_some() {
            info!(id, "application deleted");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Drop every record and restart id assignment.
    pub fn clear(&mut self) {
        self.apps.clear();
        self.counter = 0;
    }

    pub fn rows(&self) -> Vec<ApplicationRow> {
        self.iter().map(ApplicationRow::from).collect()
    }

    pub fn rows_by_category(&self, category: Category) -> Vec<ApplicationRow> {
        self.by_category(category).map(ApplicationRow::from).collect()
    }

    /// Replace the contents with the records decoded from `text`.
    ///
    /// Under [`LoadPolicy::Abort`] the registry is left untouched when any
    /// record fails. Duplicate ids keep the first record seen.
    pub fn load_str(&mut self, text: &str, policy: LoadPolicy) -> Result<LoadReport, FormatError> {
        let mut loaded = Registry::new();
        let mut report = LoadReport::default();

        for result in codec::decode_all(text) {
            match result {
                Ok(app) => {
                    let id = app.id();
                    if !loaded.add(app) {
                        warn!(id, "duplicate application id ignored");
                        report.duplicates.push(id);
                    }
                }
                Err(err) if policy == LoadPolicy::Skip => {
                    warn!(error = %err, "skipping malformed application");
                    report.skipped.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        report.loaded = loaded.len();
        *self = loaded;
        info!(
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "applications loaded"
        );
        Ok(report)
    }

    /// Encode every record in ascending id order.
    pub fn to_text(&self) -> String {
        codec::encode_all(self.iter())
    }

    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        policy: LoadPolicy,
    ) -> Result<LoadReport, HireflowError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(self.load_str(&text, policy)?)
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), HireflowError> {
        std::fs::write(path.as_ref(), self.to_text())?;
        info!(count = self.len(), path = %path.as_ref().display(), "applications saved");
        Ok(())
    }
}
