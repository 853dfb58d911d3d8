//! Flat-text persistence format for applications.
//!
//! Each record is a header line followed by its notes:
//!
//! ```text
//! *<id>,<state>,<category>,<summary>,<reviewer>,<paperwork>,<resolution>
//! -<note>
//! -<note>
//! ```
//!
//! The reviewer and resolution fields are left empty when absent. Every field
//! and note fits on one line: [`Application`] refuses line breaks in text and
//! commas in the reviewer id, so only the summary may carry commas. Blank lines
//! are ignored; any other line without a `*` or `-` prefix is a format error.

use crate::error::FormatError;
use crate::state_machine::{Application, ApplicationParts, Category, Resolution, State};

/// Encode one record, header and notes, each line newline-terminated.
pub fn encode(app: &Application) -> String {
    let mut out = format!(
        "*{},{},{},{},{},{},{}\n",
        app.id(),
        app.state(),
        app.category(),
        app.summary(),
        app.reviewer().unwrap_or_default(),
        app.is_paperwork_processed(),
        app.resolution().map(|r| r.to_string()).unwrap_or_default(),
    );
    for note in app.notes().iter() {
        out.push('-');
        out.push_str(note);
        out.push('\n');
    }
    out
}

/// Encode records back to back, in the order given.
pub fn encode_all<'a>(apps: impl IntoIterator<Item = &'a Application>) -> String {
    apps.into_iter().map(encode).collect()
}

/// Decode text holding exactly one record.
pub fn decode(text: &str) -> Result<Application, FormatError> {
    let mut results = decode_all(text).into_iter();
    let first = results.next().ok_or(FormatError::Empty)??;
    if results.next().is_some() {
        let line = text
            .lines()
            .enumerate()
            .filter(|(_, l)| l.starts_with('*'))
            .nth(1)
            .map_or(1, |(idx, _)| idx + 1);
        return Err(FormatError::TrailingRecord { line });
    }
    Ok(first)
}

/// Decode every record in `text`, one result per record in file order.
///
/// A bad record does not stop decoding of the ones after it; the caller
/// decides whether a single failure aborts the whole load.
pub fn decode_all(text: &str) -> Vec<Result<Application, FormatError>> {
    let mut results = Vec::new();
    let mut current: Option<Block<'_>> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if let Some(header) = line.strip_prefix('*') {
            if let Some(block) = current.take() {
                results.push(block.decode());
            }
            current = Some(Block {
                line: line_no,
                header,
                body: Vec::new(),
            });
        } else if line.trim().is_empty() {
            continue;
        } else if let Some(block) = current.as_mut() {
            block.body.push((line_no, line));
        } else {
            results.push(Err(FormatError::StrayText { line: line_no }));
        }
    }
    if let Some(block) = current {
        results.push(block.decode());
    }

    results
}

struct Block<'a> {
    line: usize,
    header: &'a str,
    body: Vec<(usize, &'a str)>,
}

impl Block<'_> {
    fn decode(self) -> Result<Application, FormatError> {
        let line = self.line;
        let fields: Vec<&str> = self.header.split(',').collect();

        // Extra commas can only come from the summary: the encoder always
        // writes seven fields, so the last three are fixed.
        let (id, state, category, summary, reviewer, flag, resolution) = match fields.as_slice() {
            [id, state, category, summary, reviewer, flag] => {
                (*id, *state, *category, summary.to_string(), *reviewer, *flag, "")
            }
            [id, state, category, summary @ .., reviewer, flag, resolution] => (
                *id,
                *state,
                *category,
                summary.join(","),
                *reviewer,
                *flag,
                *resolution,
            ),
            _ => {
                return Err(FormatError::MissingFields {
                    line,
                    found: fields.len(),
                });
            }
        };

        let id = id.parse::<u32>().map_err(|_| FormatError::InvalidId {
            line,
            value: id.to_string(),
        })?;
        let state = state
            .parse::<State>()
            .map_err(|source| FormatError::UnknownToken { line, source })?;
        let category = category
            .parse::<Category>()
            .map_err(|source| FormatError::UnknownToken { line, source })?;
        let paperwork_processed = match flag {
            "true" => true,
            "false" => false,
            other => {
                return Err(FormatError::InvalidFlag {
                    line,
                    value: other.to_string(),
                });
            }
        };
        let resolution = match resolution {
            "" => None,
            token => Some(
                token
                    .parse::<Resolution>()
                    .map_err(|source| FormatError::UnknownToken { line, source })?,
            ),
        };

        let notes = collect_notes(self.body)?;
        if notes.is_empty() {
            return Err(FormatError::MissingNotes { line });
        }

        Application::from_parts(ApplicationParts {
            id,
            state,
            category,
            summary,
            reviewer: Some(reviewer.to_string()),
            paperwork_processed,
            resolution,
            notes,
        })
        .map_err(|source| FormatError::InvalidRecord { line, source })
    }
}

fn collect_notes(body: Vec<(usize, &str)>) -> Result<Vec<String>, FormatError> {
    body.into_iter()
        .map(|(line_no, line)| {
            line.strip_prefix('-')
                .map(str::to_string)
                .ok_or(FormatError::StrayText { line: line_no })
        })
        .collect()
}
