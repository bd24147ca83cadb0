//! Per-scenario state shared by step functions.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use cucumber::World;
use tracing::info;

use crate::config::E2eConfig;
use crate::driver::{PageLike, SessionLike};
use crate::error::{E2eError, Result};
use crate::namespace::{MapNaming, SuffixNaming, WorkerId, WorkerLease};
use crate::pages::{DirectMapNavigator, MapNavigator, MapPlantingPage};

/// Everything one scenario owns: its browser session, its configuration
/// and the collaborators that isolate it from other workers.
///
/// Cucumber creates the world empty; [`ScenarioRunner`](crate::ScenarioRunner)
/// attaches a session before the first step runs.
#[derive(World)]
pub struct ScenarioWorld {
    session: Option<Box<dyn SessionLike>>,
    setup_error: Option<String>,
    lease: Option<WorkerLease>,
    config: E2eConfig,
    naming: Arc<dyn MapNaming>,
    navigator: Arc<dyn MapNavigator>,
    map_name: Option<String>,
    started: Instant,
}

impl Default for ScenarioWorld {
    fn default() -> Self {
        Self {
            session: None,
            setup_error: None,
            lease: None,
            config: E2eConfig::default(),
            naming: Arc::new(SuffixNaming),
            navigator: Arc::new(DirectMapNavigator),
            map_name: None,
            started: Instant::now(),
        }
    }
}

impl fmt::Debug for ScenarioWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioWorld")
            .field("worker", &self.config.worker_id)
            .field("attached", &self.session.is_some())
            .field("setup_error", &self.setup_error)
            .field("map_name", &self.map_name)
            .finish()
    }
}

impl ScenarioWorld {
    pub fn new(
        session: Box<dyn SessionLike>,
        config: E2eConfig,
        naming: Arc<dyn MapNaming>,
        navigator: Arc<dyn MapNavigator>,
    ) -> Self {
        let mut world = Self::default();
        world.attach(session, config, naming, navigator);
        world
    }

    /// Binds this world to an open session.
    pub fn attach(
        &mut self,
        session: Box<dyn SessionLike>,
        config: E2eConfig,
        naming: Arc<dyn MapNaming>,
        navigator: Arc<dyn MapNavigator>,
    ) {
        self.session = Some(session);
        self.setup_error = None;
        self.config = config;
        self.naming = naming;
        self.navigator = navigator;
        self.started = Instant::now();
    }

    /// Records why no session could be attached; every step then fails with it.
    pub fn setup_failed(&mut self, config: E2eConfig, error: &E2eError) {
        self.session = None;
        self.setup_error = Some(error.to_string());
        self.config = config;
        self.started = Instant::now();
    }

    pub(crate) fn hold(&mut self, lease: WorkerLease) {
        self.lease = Some(lease);
    }

    pub fn page(&self) -> Result<&dyn PageLike> {
        match &self.session {
            Some(session) => Ok(session.page()),
            None => Err(E2eError::NoSession(
                self.setup_error
                    .clone()
                    .unwrap_or_else(|| "scenario was not attached to a browser".into()),
            )),
        }
    }

    pub fn config(&self) -> &E2eConfig {
        &self.config
    }

    pub fn worker(&self) -> WorkerId {
        self.config.worker()
    }

    /// Time since the scenario was attached.
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// A planting page object bound to this scenario's page.
    pub fn planting(&self) -> Result<MapPlantingPage<'_>> {
        Ok(MapPlantingPage::new(self.page()?, &self.config))
    }

    /// The concrete name of the map opened by [`open_map`](Self::open_map).
    pub fn map_name(&self) -> Option<&str> {
        self.map_name.as_deref()
    }

    /// Opens this worker's copy of the map called `logical` in the scenario.
    pub async fn open_map(&mut self, logical: &str) -> Result<&str> {
        let map_name = self.naming.map_name(&self.worker(), logical);
        info!(target = "plant-e2e", %map_name, worker = %self.worker(), "open planting page");
        self.navigator
            .to_planting_page(self.page()?, &self.config, &map_name)
            .await?;
        Ok(self.map_name.insert(map_name).as_str())
    }

    /// Closes the session and gives the worker id back to its pool.
    pub async fn close(&mut self) -> Result<()> {
        let result = match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        };
        self.lease = None;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockPage, MockSession};

    #[tokio::test]
    async fn detached_world_reports_setup_error() {
        let mut world = ScenarioWorld::default();
        world.setup_failed(
            E2eConfig::default(),
            &E2eError::BrowserLaunch("no chromium".into()),
        );

        let err = world.planting().err().unwrap();
        assert!(matches!(err, E2eError::NoSession(ref msg) if msg.contains("no chromium")));
        assert!(world.open_map("Solo").await.is_err());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let mut world = ScenarioWorld::new(
            Box::new(MockSession::new(Arc::new(MockPage::new()))),
            E2eConfig::default(),
            Arc::new(SuffixNaming),
            Arc::new(DirectMapNavigator),
        );
        assert!(world.page().is_ok());
        world.close().await.unwrap();
        world.close().await.unwrap();
        assert!(world.page().is_err());
    }
}
