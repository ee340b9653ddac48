use bridge_core::config::BridgeConfig;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the loaded configuration as YAML
    Show,
    /// Print the config file path
    Path,
}

pub fn run(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = BridgeConfig::load_default()?;
            println!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", BridgeConfig::default_path().display());
        }
    }
    Ok(())
}
