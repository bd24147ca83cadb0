//! Scenario execution.
//!
//! Feature files are parsed, matched and run by cucumber. The runner adds
//! what a browser suite needs on top: before a scenario it checks a worker id
//! out of a [`WorkerPool`] and opens a session for it, after the scenario it
//! closes the session and records a [`ScenarioReport`]. At most `workers`
//! scenarios run at once, so no two live scenarios share a map namespace.
//!
//! A failing or panicking step fails only its own scenario; the run carries on.

use std::path::Path;
use std::sync::Arc;

use cucumber::event::ScenarioFinished;
use cucumber::writer::Stats as _;
use cucumber::{World as _, gherkin};
use futures::FutureExt as _;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::E2eConfig;
use crate::driver::SessionFactory;
use crate::error::{E2eError, Result};
use crate::namespace::{MapNaming, SuffixNaming, WorkerPool};
use crate::pages::{DirectMapNavigator, MapNavigator};
use crate::world::ScenarioWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    /// A step had no matching definition.
    Skipped,
}

impl From<&ScenarioFinished> for ScenarioStatus {
    fn from(finished: &ScenarioFinished) -> Self {
        match finished {
            ScenarioFinished::StepPassed => ScenarioStatus::Passed,
            ScenarioFinished::StepSkipped => ScenarioStatus::Skipped,
            _ => ScenarioStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub feature: String,
    pub scenario: String,
    pub line: usize,
    pub worker: String,
    pub status: ScenarioStatus,
    pub duration_ms: u64,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Ordered by feature name, then by line.
    pub scenarios: Vec<ScenarioReport>,
    /// Feature files cucumber could not parse.
    pub parsing_errors: usize,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.parsing_errors == 0 && self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.scenarios.iter().filter(|s| !s.passed())
    }
}

pub struct ScenarioRunner {
    sessions: Arc<dyn SessionFactory>,
    config: E2eConfig,
    naming: Arc<dyn MapNaming>,
    navigator: Arc<dyn MapNavigator>,
    workers: usize,
}

impl ScenarioRunner {
    pub fn new(sessions: Arc<dyn SessionFactory>, config: E2eConfig) -> Self {
        Self {
            sessions,
            config,
            naming: Arc::new(SuffixNaming),
            navigator: Arc::new(DirectMapNavigator),
            workers: 1,
        }
    }

    pub fn with_naming(mut self, naming: Arc<dyn MapNaming>) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn MapNavigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Runs up to `workers` scenarios concurrently (`gw0`, `gw1`, ...).
    ///
    /// With one worker scenarios run one after another under the configured
    /// worker id.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Runs every scenario of the feature file, or of every feature file
    /// below the directory, at `input`.
    pub async fn run(&self, input: impl AsRef<Path>) -> Result<RunReport> {
        let input = input.as_ref();
        if self.workers == 0 {
            return Err(E2eError::Config("at least one worker is required".into()));
        }
        if !input.exists() {
            return Err(E2eError::Config(format!(
                "no feature files at {}",
                input.display()
            )));
        }

        let setup = Arc::new(Setup {
            sessions: Arc::clone(&self.sessions),
            config: self.config.clone(),
            naming: Arc::clone(&self.naming),
            navigator: Arc::clone(&self.navigator),
            pool: WorkerPool::new(self.workers, self.config.worker()),
        });
        let reports = Arc::new(Mutex::new(Vec::new()));
        let collected = Arc::clone(&reports);

        info!(
            target = "plant-e2e",
            input = %input.display(),
            workers = self.workers,
            "running scenarios"
        );

        let summary = ScenarioWorld::cucumber()
            .with_default_cli()
            .max_concurrent_scenarios(self.workers)
            .before(move |_feature, _rule, scenario, world| {
                let setup = Arc::clone(&setup);
                async move { setup.prepare(&scenario.name, world).await }.boxed_local()
            })
            .after(move |feature, _rule, scenario, finished, world| {
                let reports = Arc::clone(&collected);
                async move {
                    let report = finish(feature, scenario, finished, world).await;
                    reports.lock().push(report);
                }
                .boxed_local()
            })
            .run(input)
            .await;

        let mut scenarios = std::mem::take(&mut *reports.lock());
        scenarios.sort_by(|a, b| (&a.feature, a.line).cmp(&(&b.feature, b.line)));
        let report = RunReport {
            scenarios,
            parsing_errors: summary.parsing_errors(),
        };

        info!(
            target = "plant-e2e",
            passed = report.passed(),
            failed = report.failed(),
            parsing_errors = report.parsing_errors,
            "run finished"
        );
        Ok(report)
    }
}

/// What every scenario needs before its first step.
struct Setup {
    sessions: Arc<dyn SessionFactory>,
    config: E2eConfig,
    naming: Arc<dyn MapNaming>,
    navigator: Arc<dyn MapNavigator>,
    pool: Arc<WorkerPool>,
}

impl Setup {
    async fn prepare(&self, scenario: &str, world: &mut ScenarioWorld) {
        let lease = self.pool.acquire();
        let worker = lease.id().clone();
        let config = self.config.clone().with_worker(&worker);
        info!(target = "plant-e2e", %scenario, %worker, "scenario");

        match self.sessions.open(&worker).await {
            Ok(session) => world.attach(
                session,
                config,
                Arc::clone(&self.naming),
                Arc::clone(&self.navigator),
            ),
            Err(err) => {
                error!(target = "plant-e2e", %scenario, error = %err, "session failed");
                world.setup_failed(config, &err);
            }
        }
        world.hold(lease);
    }
}

async fn finish(
    feature: &gherkin::Feature,
    scenario: &gherkin::Scenario,
    finished: &ScenarioFinished,
    world: Option<&mut ScenarioWorld>,
) -> ScenarioReport {
    let status = ScenarioStatus::from(finished);
    let mut worker = String::new();
    let mut duration_ms = 0;

    if let Some(world) = world {
        worker = world.worker().to_string();
        duration_ms = world.elapsed_ms();
        if let Err(err) = world.close().await {
            warn!(target = "plant-e2e", error = %err, "failed to close session");
        }
    }
    debug!(target = "plant-e2e", scenario = %scenario.name, ?status, %worker, "scenario finished");

    ScenarioReport {
        feature: feature.name.clone(),
        scenario: scenario.name.clone(),
        line: scenario.position.line,
        worker,
        status,
        duration_ms,
    }
}
