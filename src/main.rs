//! Featureform TUI - demo host for the form container
//!
//! Opens a JSON dataset in the in-memory form engine and presents its
//! first record. Closing the form exits.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use featureform_tui::config::TuiConfig;
use featureform_tui::container::{FormBinding, FormContainer};
use featureform_tui::engine::{Dataset, FeatureForm};
use featureform_tui::state::EditingEvent;
use featureform_tui::ui;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE_DATASET: &str = include_str!("../assets/sample_dataset.json");

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let first_arg = args.next();

    if first_arg.as_deref() == Some("--init-config") {
        let config = TuiConfig::load()?;
        config.save()?;
        println!("Configuration written");
        return Ok(());
    }

    let config = TuiConfig::load().context("Failed to load configuration")?;
    init_logging(&config)?;

    let dataset_path = first_arg.map(PathBuf::from).or(config.dataset_path.clone());
    let dataset = match &dataset_path {
        Some(path) => Dataset::load(path)
            .with_context(|| format!("Failed to load dataset {}", path.display()))?,
        None => Dataset::from_json(SAMPLE_DATASET).context("Bundled dataset is invalid")?,
    };
    let first = dataset.first().context("Dataset has no records")?;
    info!(records = dataset.forms().len(), "Dataset loaded");

    let options = config.to_options().with_editing_event_handler(|event| match event {
        EditingEvent::SavedEdits { will_navigate } => info!(will_navigate, "Edits saved"),
        EditingEvent::DiscardedEdits { will_navigate } => info!(will_navigate, "Edits discarded"),
    });
    let binding = FormBinding::new(Some(first as Arc<dyn FeatureForm>));
    let mut container = FormContainer::new(binding, options);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut container).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to the configured file, or stderr when none is set
fn init_logging(config: &TuiConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "featureform_tui=info".into());

    match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    container: &mut FormContainer,
) -> Result<()> {
    loop {
        container.refresh();

        // Closing the form clears the binding
        if !container.binding().is_some() {
            info!("Form closed");
            return Ok(());
        }

        terminal.draw(|frame| ui::draw(frame, container))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }
                container.handle_key(key).await;
            }
        }
    }
}
