mod commands;

use anchor_config::config::Config;
use anchor_core::{Checkpoints, Network};
use clap::Parser;
use commands::*;

#[derive(Parser)]
#[command(name = "anchor")]
#[command(about = "Checkpoint policy tool", long_about = None)]
struct Cli {
    /// Override the configured network (main or test)
    #[arg(long, global = true)]
    network: Option<Network>,

    /// Disable checkpoint enforcement for this invocation
    #[arg(long, global = true)]
    no_checkpoints: bool,

    #[command(subcommand)]
    command: Commands,
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let policy = || load_policy(cli.network, cli.no_checkpoints);

    match cli.command {
        Commands::Check { height, hash } => check_block(&policy()?, height, &hash),
        Commands::Total => Ok(total_blocks(&policy()?)),
        Commands::Progress { tx_count, time } => Ok(progress(&policy()?, tx_count, time)),
        Commands::Last { index } => last_checkpoint(&policy()?, &index),
        Commands::Reorg { depth, height } => Ok(reorg(&policy()?, depth, height)),
        Commands::Config { subcommand } => run_config(subcommand),
    }
}

/// Policy from the loaded config with command-line overrides applied.
fn load_policy(
    network: Option<Network>,
    no_checkpoints: bool,
) -> anyhow::Result<Checkpoints<'static>> {
    let mut cfg = Config::load()?;
    if let Some(network) = network {
        cfg.network = network;
    }
    if no_checkpoints {
        cfg.checkpoints = false;
    }
    log::debug!(
        "network={} checkpoints={}",
        cfg.network,
        if cfg.checkpoints { "on" } else { "off" }
    );
    Ok(cfg.checkpoint_policy())
}

fn run_config(subcommand: ConfigCommands) -> anyhow::Result<String> {
    match subcommand {
        ConfigCommands::View => Config::load()?.view(),
        ConfigCommands::Set { key, value } => {
            let mut cfg = Config::load()?;
            cfg.set_value(&key, &value)?;
            cfg.save()?;
            Ok(format!("{} = {} set successfully.", key, value))
        }
        ConfigCommands::Init => {
            let path = Config::init_default()?;
            Ok(format!("Default configuration file has been created: {:?}", path))
        }
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let args = ["anchor", "total", "--network", "test", "--no-checkpoints"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.network, Some(Network::Test));
        assert!(cli.no_checkpoints);
        assert!(matches!(cli.command, Commands::Total));
    }

    #[test]
    fn config_subcommand_parses_without_policy_flags() {
        let args = ["anchor", "config", "set", "checkpoints", "false"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.network.is_none());
        match cli.command {
            Commands::Config {
                subcommand: ConfigCommands::Set { key, value },
            } => {
                assert_eq!(key, "checkpoints");
                assert_eq!(value, "false");
            }
            _ => panic!("expected config set"),
        }
    }
}
