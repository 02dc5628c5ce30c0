mod app;
mod config;
mod effects;
mod logging;
mod render;
mod resize;

use config::AppConfig;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    logging::initialize(config.log);
    app::run_app(config)
}
