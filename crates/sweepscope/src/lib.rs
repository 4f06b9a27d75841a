//! Terminal viewer for multi-dimensional sweep results
//!
//! Loads one measurement run, lets the operator assign a role to every sweep
//! axis and shows the resulting line charts or heatmaps. The same session
//! can be driven headless from the command line and exported as JSON.

pub mod app;
pub mod components;
pub mod config;
pub mod loader;
pub mod logging;
pub mod script;
pub mod state;
pub mod util;

pub use app::App;
pub use config::AppConfig;
pub use loader::load_dataset;
pub use logging::init_logging;
pub use state::AppState;
