use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sweepscope::script::{Export, ScriptAction, apply_all};
use sweepscope::{App, AppConfig, AppState, init_logging, load_dataset};
use sweepscope_core::RunSession;

#[derive(Parser, Debug)]
#[command(name = "sweepscope")]
#[command(about = "A terminal viewer for multi-dimensional sweep results")]
struct Args {
    /// Run file to open (JSON)
    path: PathBuf,

    /// Path to the data directory (default: ~/.sweepscope/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Heatmaps per plot row
    #[arg(short, long)]
    columns: Option<usize>,

    /// Assign a role before opening, e.g. `freq=x` or `power=fixed:3`
    #[arg(short, long = "role", value_name = "NAME=ROLE[:INDEX]")]
    roles: Vec<String>,

    /// Add a result variable to the plot selection
    #[arg(short, long = "select", value_name = "VARIABLE")]
    selects: Vec<String>,

    /// Make a member of a parallel sweep group active, e.g. `0=q2.amp`
    #[arg(long = "active", value_name = "GROUP=NAME")]
    actives: Vec<String>,

    /// Write the plot grid as JSON instead of opening the viewer
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sweepscope")
}

impl Args {
    /// Actions in the order they are applied: active members first so that
    /// roles refer to the visible names.
    fn actions(&self) -> color_eyre::Result<Vec<ScriptAction>> {
        let mut actions = Vec::new();
        for spec in &self.actives {
            actions.push(ScriptAction::parse_active(spec)?);
        }
        for spec in &self.roles {
            actions.push(ScriptAction::parse_role(spec)?);
        }
        actions.extend(self.selects.iter().cloned().map(ScriptAction::Select));
        if let Some(columns) = self.columns {
            actions.push(ScriptAction::Columns(columns));
        }
        Ok(actions)
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);

    let _guard = init_logging(&data_dir, &args.log_level)?;

    let mut config = AppConfig::load_or_default(&data_dir);
    if !args.selects.is_empty() {
        config.select_first_variable = false;
    }

    let dataset = load_dataset(&args.path)?;
    let mut session = RunSession::with_options(Arc::new(dataset), config.session_options());
    apply_all(&mut session, &args.actions()?)?;

    if let Some(export_path) = &args.export {
        Export::from_session(&session)?.write(export_path)?;
        tracing::info!(path = %export_path.display(), "exported plot grid");
        return Ok(());
    }

    let mut app = App::new(AppState::new(session, config));
    ratatui::run(|terminal| app.run(terminal))?;

    tracing::info!("Application shutting down");

    if let Err(err) = ratatui::try_restore() {
        tracing::error!("Failed to restore terminal: {err}");
    }

    Ok(())
}
