//! The planting screen of a map.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::E2eConfig;
use crate::driver::PageLike;
use crate::error::{E2eError, Result};
use crate::target::Target;
use crate::wait;

/// Pause after a canvas click so the editor can finish its placement animation.
pub const CANVAS_SETTLE: Duration = Duration::from_millis(300);

/// URL glob of the map list.
pub const MAP_LIST_URL: &str = "**/maps";

/// What [`MapPlantingPage::close_tour`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourOutcome {
    /// The tour was open and has been dismissed.
    Closed,
    /// No tour showed up within the short timeout.
    NotPresent,
}

/// Page object for the map planting screen.
///
/// Holds target descriptors only; every operation resolves its element again.
pub struct MapPlantingPage<'a> {
    page: &'a dyn PageLike,
    base_layer_radio: Target,
    plant_layer_radio: Target,
    plant_search_icon: Target,
    plant_search_input: Target,
    delete_plant_button: Target,
    map_management_button: Target,
    canvas: Target,
    timeout: Duration,
    short_timeout: Duration,
}

impl<'a> MapPlantingPage<'a> {
    pub const TITLE: &'static str = "PermaplanT";

    pub fn new(page: &'a dyn PageLike, config: &E2eConfig) -> Self {
        Self {
            page,
            base_layer_radio: Target::test_id("base-layer-radio"),
            plant_layer_radio: Target::test_id("plants-layer-radio"),
            plant_search_icon: Target::test_id("plant-search-icon"),
            plant_search_input: Target::test_id("plant-search-input"),
            delete_plant_button: Target::role("button", "Delete Planting"),
            map_management_button: Target::role("button", "Maps"),
            canvas: Target::test_id("canvas"),
            timeout: config.timeout(),
            short_timeout: config.short_timeout(),
        }
    }

    pub fn search_result(plant_name: &str) -> Target {
        Target::test_id(format!("{plant_name}-plant-search-result"))
    }

    pub fn planted_heading(plant_name: &str) -> Target {
        Target::role("heading", plant_name)
    }

    pub fn empty_search_results() -> Target {
        Target::test_id("plant-search-results-empty")
    }

    pub fn undo_button() -> Target {
        Target::test_id("undo-button")
    }

    pub fn redo_button() -> Target {
        Target::test_id("redo-button")
    }

    pub fn tour_close() -> Target {
        Target::label("Close Tour")
    }

    pub fn tour_end() -> Target {
        Target::role("button", "End")
    }

    pub async fn check_base_layer(&self) -> Result<()> {
        self.page.locator(&self.base_layer_radio).set_checked(true).await
    }

    pub async fn check_plant_layer(&self) -> Result<()> {
        self.page.locator(&self.plant_layer_radio).set_checked(true).await
    }

    /// Clicks the search icon that reveals the search box.
    pub async fn click_search_icon(&self) -> Result<()> {
        self.page.locator(&self.plant_search_icon).click(None).await
    }

    /// Replaces the search box content. The app debounces and searches on its own.
    pub async fn fill_plant_search(&self, text: &str) -> Result<()> {
        debug!(target = "plant-e2e", %text, "fill plant search");
        self.page.locator(&self.plant_search_input).fill(text).await
    }

    pub async fn click_plant_from_search_results(&self, plant_name: &str) -> Result<()> {
        self.page
            .locator(&Self::search_result(plant_name))
            .click(None)
            .await
    }

    /// Clicks the middle of the canvas, then waits [`CANVAS_SETTLE`].
    ///
    /// The bounding box is read on every call so layout shifts are tolerated.
    pub async fn click_on_canvas_middle(&self) -> Result<()> {
        let bbox = self
            .page
            .locator(&self.canvas)
            .bounding_box()
            .await?
            .ok_or_else(|| E2eError::ElementNotFound {
                selector: self.canvas.selector(),
            })?;
        let (x, y) = bbox.center();
        debug!(target = "plant-e2e", x, y, "click canvas middle");
        self.page.mouse_click(x, y).await?;
        self.page.wait_for_timeout(CANVAS_SETTLE).await;
        Ok(())
    }

    /// Deletes the selected planting. Assumes one is selected.
    pub async fn click_delete(&self) -> Result<()> {
        self.page.locator(&self.delete_plant_button).click(None).await
    }

    pub async fn click_undo(&self) -> Result<()> {
        self.page.locator(&Self::undo_button()).click(None).await
    }

    pub async fn click_redo(&self) -> Result<()> {
        self.page.locator(&Self::redo_button()).click(None).await
    }

    /// Waits until the plant's heading shows up in the side panel.
    pub async fn expect_plant_to_be_planted(&self, plant_name: &str) -> Result<()> {
        let heading = self.page.locator(&Self::planted_heading(plant_name));
        wait::expect_visible(heading.as_ref(), self.timeout).await
    }

    /// Waits until the plant's heading is gone from the side panel.
    pub async fn expect_plant_to_not_be_planted(&self, plant_name: &str) -> Result<()> {
        let heading = self.page.locator(&Self::planted_heading(plant_name));
        wait::expect_hidden(heading.as_ref(), self.timeout).await
    }

    pub async fn expect_search_result_is_visible(&self, result: &str) -> Result<()> {
        let entry = self.page.locator(&Self::search_result(result));
        wait::expect_visible(entry.as_ref(), self.timeout).await
    }

    pub async fn expect_no_plants_found_text_is_visible(&self) -> Result<()> {
        let empty = self.page.locator(&Self::empty_search_results());
        wait::expect_visible(empty.as_ref(), self.timeout).await
    }

    /// Dismisses the first-run tour if it is showing.
    ///
    /// Absence of the tour is not an error: a timeout on either click yields
    /// [`TourOutcome::NotPresent`]. Any other failure propagates.
    pub async fn close_tour(&self) -> Result<TourOutcome> {
        let close = self.page.locator(&Self::tour_close());
        let end = self.page.locator(&Self::tour_end());

        let attempt = async {
            close.click(Some(self.short_timeout)).await?;
            end.click(Some(self.short_timeout)).await
        };

        match attempt.await {
            Ok(()) => {
                debug!(target = "plant-e2e", "tour closed");
                Ok(TourOutcome::Closed)
            }
            Err(err) if err.is_timeout() => {
                info!(target = "plant-e2e", error = %err, "tour was already closed");
                Ok(TourOutcome::NotPresent)
            }
            Err(err) => Err(err),
        }
    }

    /// Navigates to the map list through the navbar.
    pub async fn to_map_management_page(&self) -> Result<()> {
        self.page.locator(&self.map_management_button).click(None).await?;
        wait::wait_for_url(self.page, MAP_LIST_URL, self.timeout).await
    }
}
