use genesis_v::{config::AppConfig, flow, logging, platform::PlatformState};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    logging::init(config.logging());

    let platform = PlatformState::new(config.selection);
    flow::run(config, platform)
}
