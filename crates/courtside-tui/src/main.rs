// Courtside entry point.
//
// Startup sequence:
// 1. Load config
// 2. Initialize tracing (log to file, not terminal)
// 3. Open database
// 4. Import the roster CSV
// 5. Open a new match and record it as current
// 6. Build the presenter over the stored roster
// 7. Run the TUI until the scorekeeper quits
// 8. Save every stat line on exit

use std::path::Path;

use anyhow::Context;
use tracing::{error, info, warn};

use courtside_core::config;
use courtside_core::db::Database;
use courtside_core::game::presenter::GamePresenter;
use courtside_core::import;
use courtside_core::storage::Storage;
use courtside_tui::tui::{self, ViewState};

fn main() -> anyhow::Result<()> {
    // 1. Load config (before tracing, which reads its filter)
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging.filter)?;
    info!("Courtside starting up for team {}", config.team.name);

    // 3. Open database
    let db_path = config.database_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let db_path_str = db_path.to_string_lossy();
    let db = Database::open(&db_path_str).context("failed to open database")?;
    info!("Database opened at {}", db_path_str);

    // 4. Import the roster
    let roster_path = Path::new(&config.roster.csv);
    if roster_path.exists() {
        import::import_roster(&db, roster_path).context("failed to import roster")?;
    } else {
        warn!(
            "Roster file {} not found; using players already stored",
            roster_path.display()
        );
    }
    info!("{} players on the roster", db.player_count()?);

    // 5. Open a new match
    match db
        .current_match_id()
        .and_then(|id| id.map(|id| db.load_match(id)).transpose())
    {
        Ok(Some(Some(previous))) => info!(
            "Previous session was match {} ({}, started {})",
            previous.id, previous.home_team, previous.started_at
        ),
        Ok(Some(None)) => warn!("Previous match id points at a missing match"),
        Ok(None) => info!("No previous session"),
        Err(e) => warn!("Could not read the previous match: {:#}", e),
    }
    let record = db
        .create_match(&config.team.name)
        .context("failed to create match")?;
    db.set_current_match_id(record.id)?;
    info!("Match {} started at {}", record.id, record.started_at);

    // 6. Build the presenter
    let mut view = ViewState::new(&config.team.name, record.id);
    let mut presenter =
        GamePresenter::setup(&db, &mut view).context("failed to load the roster")?;

    // 7. Run the TUI (blocks until the scorekeeper quits)
    if let Err(e) = tui::run(&mut presenter, record.id) {
        error!("TUI error: {:#}", e);
    }

    // 8. Save on exit
    let report = presenter.save_all(record.id);
    if report.failed > 0 {
        error!(
            "{} of {} stat records failed to save",
            report.failed,
            report.saved + report.failed
        );
    }
    info!(
        "Courtside shut down cleanly ({} stat records saved)",
        report.saved
    );
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("courtside.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
