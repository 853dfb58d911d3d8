mod cli;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command};
use hireflow::Registry;
use hireflow::config::HireflowConfig;
use hireflow::state_machine;
use hireflow::telemetry;
use ui::Printer;

fn main() {
    let cli = Cli::parse();
    let printer = Printer::new(cli.json);

    if let Err(err) = run(cli, &printer) {
        printer.failure(&err);
        std::process::exit(1);
    }
}

fn run(cli: Cli, printer: &Printer) -> Result<()> {
    let config = HireflowConfig::load()?;
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    telemetry::init(level)?;

    let path = cli.file.unwrap_or(config.data_file);
    let mut registry = Registry::new();
    if path.exists() {
        registry
            .load_file(&path, config.on_invalid_record)
            .with_context(|| format!("unable to read {}", path.display()))?;
    }

    match cli.command {
        Command::List { category } => {
            let rows = match category {
                Some(category) => registry.rows_by_category(category.into()),
                None => registry.rows(),
            };
            printer.rows(&rows);
            return Ok(());
        }
        Command::Show { id } => {
            let app = registry
                .get(id)
                .ok_or(hireflow::HireflowError::NotFound(id))?;
            printer.application(app);
            return Ok(());
        }
        Command::Add {
            category,
            summary,
            note,
        } => {
            let id = registry.create(category.into(), &summary, &note)?;
            printer.done(&format!("Created application {id}"));
        }
        Command::Update {
            id,
            action,
            reviewer,
            resolution,
            note,
        } => {
            let command = state_machine::Command::new(
                action.into(),
                reviewer,
                resolution.map(Into::into),
                note,
            )?;
            registry.execute(id, &command)?;
            let state = registry.get(id).map(|app| app.state().to_string()).unwrap_or_default();
            printer.done(&format!("Application {id} is now in {state}"));
        }
        Command::Delete { id } => {
            registry
                .remove(id)
                .ok_or(hireflow::HireflowError::NotFound(id))?;
            printer.done(&format!("Deleted application {id}"));
        }
    }

    registry
        .save_file(&path)
        .with_context(|| format!("unable to write {}", path.display()))?;
    Ok(())
}
