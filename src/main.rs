use anyhow::Context;
use driftfield::{control, Config, Overlay, SharedConfig};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::from_json_file(&path)
            .with_context(|| format!("loading config from {}", path.to_string_lossy()))?,
        None => Config::default(),
    };
    log::debug!("starting with {config:?}");

    let shared = SharedConfig::new(config);
    let overlay = Overlay::new(shared.clone());
    control::spawn_stdin(shared, overlay.exit_signal()).context("starting control console")?;

    overlay.run()?;
    Ok(())
}
