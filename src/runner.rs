use serde::Serialize;
use tracing::{info, warn};
use crate::catalog::seed_citizen;
use crate::client::VaccineApiClient;
use crate::contract::ApiContract;
use crate::error::ScenarioFailure;
use crate::scenario::{Scenario, Step};

#[derive(Clone, Debug, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    pub failure: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub contract: ApiContract,
    pub base_url: String,
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed)
    }
}

pub struct RunOptions {
    pub filter: Option<String>,
    pub fail_fast: bool,
}

/// Runs scenarios one at a time, registering the seed citizen before each.
pub struct ScenarioRunner {
    client: VaccineApiClient,
}

impl ScenarioRunner {
    pub fn new(client: VaccineApiClient) -> Self {
        Self { client }
    }

    pub fn run(&self, scenarios: &[Scenario], options: &RunOptions) -> RunReport {
        let mut outcomes = Vec::new();

        for scenario in select(scenarios, options.filter.as_deref()) {
            let result = self.run_scenario(scenario);
            let stop = result.is_err() && options.fail_fast;

            match &result {
                Ok(_) => info!("PASS {}", scenario.name),
                Err(e) => warn!("FAIL {}: {}", scenario.name, e),
            }
            outcomes.push(ScenarioOutcome {
                name: scenario.name.to_string(),
                passed: result.is_ok(),
                failure: result.err().map(|e| e.to_string()),
            });

            if stop {
                warn!("Stopping after first failure");
                break;
            }
        }

        let passed = outcomes.iter().filter(|o| o.passed).count();
        RunReport {
            contract: self.client.contract(),
            base_url: self.client.base_url().to_string(),
            passed,
            failed: outcomes.len() - passed,
            outcomes,
        }
    }

    pub fn run_scenario(&self, scenario: &Scenario) -> Result<(), ScenarioFailure> {
        let seed = Step::Register(seed_citizen(self.client.contract()));
        for step in std::iter::once(&seed).chain(scenario.setup.iter()) {
            self.send(step)?;
        }

        let response = self.send(&scenario.request)?;
        scenario.expect.check(&response)
    }

    fn send(&self, step: &Step) -> Result<crate::client::ApiResponse, ScenarioFailure> {
        step.send(&self.client).map_err(|e| ScenarioFailure::Transport {
            step: step.label(),
            message: format!("{:#}", e),
        })
    }
}

pub fn select<'a>(scenarios: &'a [Scenario], filter: Option<&'a str>) -> impl Iterator<Item = &'a Scenario> {
    scenarios
        .iter()
        .filter(move |scenario| filter.map_or(true, |text| scenario.name.contains(text)))
}
