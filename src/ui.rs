//! Terminal rendering for hireflow, colored with `console`.
//!
//! [`Printer`] writes application tables and detail views to stdout, or JSON
//! when the caller asked for machine-readable output.

use console::Style;
use serde::Serialize;

use hireflow::registry::ApplicationRow;
use hireflow::state_machine::{Application, State};

pub struct Printer {
    json: bool,
    // Active workflow states.
    green: Style,
    // Closed applications and failures.
    red: Style,
    // Waitlisted applications.
    yellow: Style,
    dim: Style,
    bold: Style,
}

impl Printer {
    /// Create a printer. With `json` set, every view is written as pretty JSON.
    pub fn new(json: bool) -> Self {
        Self {
            json,
            green: Style::new().green(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
            bold: Style::new().bold(),
        }
    }

    fn state_style(&self, state: State) -> &Style {
        match state {
            State::Closed => &self.red,
            State::Waitlist => &self.yellow,
            _ => &self.green,
        }
    }

    /// Print the list view: one line per application, colored by state.
    pub fn rows(&self, rows: &[ApplicationRow]) {
        if self.json {
            self.print_json(&rows);
            return;
        }
        if rows.is_empty() {
            println!("{}", self.dim.apply_to("No applications."));
            return;
        }
        println!(
            "{}",
            self.bold
                .apply_to(format!("{:>4}  {:<10} {:<6} {}", "ID", "STATE", "TYPE", "SUMMARY"))
        );
        for row in rows {
            let state = format!("{:<10}", row.state.to_string());
            println!(
                "{:>4}  {} {:<6} {}",
                row.id,
                self.state_style(row.state).apply_to(state),
                row.category.to_string(),
                row.summary
            );
        }
    }

    /// Print one application with its workflow fields and full note history.
    pub fn application(&self, app: &Application) {
        if self.json {
            self.print_json(app);
            return;
        }
        println!(
            "{} {}",
            self.bold.apply_to(format!("#{}", app.id())),
            app.summary()
        );
        println!("  state:      {}", self.state_style(app.state()).apply_to(app.state()));
        println!("  category:   {}", app.category());
        println!("  reviewer:   {}", app.reviewer().unwrap_or("-"));
        println!("  paperwork:  {}", if app.is_paperwork_processed() { "processed" } else { "pending" });
        match app.resolution() {
            Some(resolution) => println!("  resolution: {resolution}"),
            None => println!("  resolution: -"),
        }
        println!("  notes:");
        for note in app.notes().iter() {
            println!("    {}", self.dim.apply_to(note));
        }
    }

    /// Confirmation after a mutating command.
    pub fn done(&self, message: &str) {
        if self.json {
            self.print_json(&serde_json::json!({ "ok": true, "message": message }));
            return;
        }
        println!("  {} {message}", self.green.apply_to("✓"));
    }

    /// Report an error on stderr with its whole cause chain.
    pub fn failure(&self, err: &anyhow::Error) {
        eprintln!("  {} {err:#}", self.red.apply_to("✗"));
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
    }
}
