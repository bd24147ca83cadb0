use std::sync::Arc;

use clap::Parser;
use plant_e2e::cli::{Cli, Commands};
use plant_e2e::playwright::PlaywrightSessionFactory;
use plant_e2e::{Result, ScenarioRunner, logging};
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match execute(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            error!(target = "plant-e2e", error = %err, "run failed");
            std::process::exit(2);
        }
    }
}

async fn execute(cli: Cli) -> Result<bool> {
    let config = cli.config.validated()?;
    let Commands::Run {
        input,
        workers,
        report,
    } = cli.command;

    let sessions = Arc::new(PlaywrightSessionFactory {
        headless: config.headless,
    });
    let result = ScenarioRunner::new(sessions, config)
        .with_workers(workers)
        .run(&input)
        .await?;

    for failure in result.failures() {
        println!(
            "{:?} {} / {} [{}]",
            failure.status, failure.feature, failure.scenario, failure.worker
        );
    }
    println!("{} passed, {} failed", result.passed(), result.failed());

    if let Some(path) = report {
        std::fs::write(&path, serde_json::to_vec_pretty(&result)?)?;
    }
    Ok(result.is_success())
}
