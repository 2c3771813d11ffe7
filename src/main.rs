use std::time::Duration;
use anyhow::{anyhow, Context};
use clap::Parser;
use dotenv::dotenv;
use time::OffsetDateTime;
use tracing::info;
use vaccine_api_conformance::catalog::catalog;
use vaccine_api_conformance::client::VaccineApiClient;
use vaccine_api_conformance::config::Config;
use vaccine_api_conformance::runner::{select, RunOptions, ScenarioRunner};

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    let scenarios = catalog(config.api_contract, OffsetDateTime::now_utc())?;

    if config.list {
        for scenario in select(&scenarios, config.filter.as_deref()) {
            println!("{:<45} {}", scenario.name, scenario.description);
        }
        return Ok(());
    }

    let client = VaccineApiClient::new(
        &config.url,
        config.api_contract,
        config.request_timeout_secs.map(Duration::from_secs),
    )?;
    info!("Running conformance scenarios against {} ({} contract)", config.url, config.api_contract);

    let runner = ScenarioRunner::new(client);
    let report = runner.run(&scenarios, &RunOptions {
        filter: config.filter.clone(),
        fail_fast: config.fail_fast,
    });

    if config.json {
        let rendered = serde_json::to_string_pretty(&report)
            .context("Failed to render run report")?;
        println!("{}", rendered);
    } else {
        for outcome in &report.outcomes {
            match &outcome.failure {
                None => println!("ok      {}", outcome.name),
                Some(failure) => println!("FAILED  {}: {}", outcome.name, failure),
            }
        }
        println!("{} passed, {} failed", report.passed, report.failed);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(anyhow!("{} of {} scenarios failed", report.failed, report.outcomes.len()))
    }
}
