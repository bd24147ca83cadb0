//! Getting from a fresh session to a map's planting screen.

use async_trait::async_trait;
use tracing::info;

use crate::config::E2eConfig;
use crate::driver::PageLike;
use crate::error::Result;
use crate::pages::planting::MapPlantingPage;
use crate::target::Target;
use crate::wait;

/// URL glob of an opened map.
pub const MAP_URL: &str = "**/maps/*";

/// Drives the helper pages (login, map list, map creation) that precede
/// the planting screen.
#[async_trait]
pub trait MapNavigator: Send + Sync {
    async fn to_planting_page(
        &self,
        page: &dyn PageLike,
        config: &E2eConfig,
        map_name: &str,
    ) -> Result<()>;
}

/// Opens an existing map from the map list, assuming the session is
/// already authenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectMapNavigator;

impl DirectMapNavigator {
    pub fn map_link(map_name: &str) -> Target {
        Target::role("link", map_name)
    }
}

#[async_trait]
impl MapNavigator for DirectMapNavigator {
    async fn to_planting_page(
        &self,
        page: &dyn PageLike,
        config: &E2eConfig,
        map_name: &str,
    ) -> Result<()> {
        info!(target = "plant-e2e", %map_name, "open map");
        page.goto(&config.url("/maps")).await?;
        page.locator(&Self::map_link(map_name))
            .click(Some(config.timeout()))
            .await?;
        wait::wait_for_url(page, MAP_URL, config.timeout()).await?;
        MapPlantingPage::new(page, config).close_tour().await?;
        Ok(())
    }
}
