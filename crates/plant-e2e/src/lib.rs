//! End-to-end scenarios for the map planting workflow.
//!
//! Feature files are run by cucumber through [`ScenarioRunner`], which gives
//! every scenario its own browser session and worker namespace. The step
//! definitions in [`steps`] act through the
//! [`MapPlantingPage`](pages::MapPlantingPage) page object, which only talks
//! to the browser through the [`driver`] traits.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use plant_e2e::{E2eConfig, ScenarioRunner};
//! use plant_e2e::playwright::PlaywrightSessionFactory;
//!
//! #[tokio::main]
//! async fn main() -> plant_e2e::Result<()> {
//!     let config = E2eConfig::from_env()?;
//!     let sessions = Arc::new(PlaywrightSessionFactory { headless: config.headless });
//!     let report = ScenarioRunner::new(sessions, config)
//!         .with_workers(2)
//!         .run("features")
//!         .await?;
//!     assert!(report.is_success());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod namespace;
pub mod pages;
#[cfg(feature = "playwright")]
pub mod playwright;
pub mod runner;
pub mod steps;
pub mod target;
pub mod testing;
pub mod wait;
pub mod world;

pub use config::E2eConfig;
pub use error::{E2eError, Result};
pub use namespace::{MapNaming, SuffixNaming, WorkerId, WorkerLease, WorkerPool};
pub use pages::{DirectMapNavigator, MapNavigator, MapPlantingPage, TourOutcome};
pub use runner::{RunReport, ScenarioReport, ScenarioRunner, ScenarioStatus};
pub use target::Target;
pub use world::ScenarioWorld;
