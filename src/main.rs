use std::path::PathBuf;

use hubnav::api::HubClient;
use hubnav::{App, Config, logging, paths};
use tracing::info;

fn main() -> hubnav::Result<()> {
    let config = Config::from_env()?;

    let log_path = paths::log_path().unwrap_or_else(|| PathBuf::from("hubnav.log"));
    logging::init(&log_path)?;
    info!(origin = %config.origin, "starting");

    let runtime = tokio::runtime::Runtime::new()?;
    let client = HubClient::from_config(&config)?;
    let mut app = App::new(config, client, runtime.handle().clone())?;

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result?;
    info!("exiting");
    Ok(())
}
