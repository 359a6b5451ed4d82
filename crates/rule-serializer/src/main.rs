//! rule-codec 命令行入口

use clap::Parser;
use rule_serializer::cli::{Cli, CommandRunner, Commands};
use rule_shared::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load("rule-codec")?;
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    rule_shared::observability::init(&config.service_name, &config.observability)?;

    let runner = CommandRunner::new(config.codec);

    match cli.command {
        Commands::Check { file } => {
            let summary = runner.run_check(&file)?;
            println!(
                "{}: {} attributes, {} facts, {} predicate nodes, {} actions",
                summary.name, summary.attributes, summary.facts, summary.predicate_nodes, summary.actions
            );
        }
        Commands::Normalize {
            file,
            output,
            compact,
        } => {
            let text = runner.run_normalize(&file, output.as_deref(), compact)?;
            if output.is_none() {
                println!("{}", text);
            }
        }
    }

    Ok(())
}
