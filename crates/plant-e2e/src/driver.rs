//! Browser capability seam.
//!
//! The page object and the step bindings only ever talk to these traits:
//! - [`PageLike`]: url, navigation, locators, raw mouse input, fixed pauses
//! - [`LocatorLike`]: actions and state queries against one [`Target`]
//! - [`SessionLike`]: a page plus the browser resources that back it
//! - [`SessionFactory`]: opens one isolated session per worker
//!
//! The Playwright adapter implements them against a real browser; the
//! [`testing`](crate::testing) doubles implement them in memory.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::namespace::WorkerId;
use crate::target::Target;

/// Abstracts page operations.
#[async_trait]
pub trait PageLike: Send + Sync {
    /// Returns the current URL of the page.
    fn url(&self) -> String;

    /// Navigates the page to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Creates a [`LocatorLike`] for `target`. Does not touch the page.
    fn locator(&self, target: &Target) -> Box<dyn LocatorLike + '_>;

    /// Dispatches a left click at viewport coordinates.
    async fn mouse_click(&self, x: f64, y: f64) -> Result<()>;

    /// Pauses for `duration`, letting the application settle.
    async fn wait_for_timeout(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Abstracts locator operations.
///
/// Each call resolves the target afresh.
#[async_trait]
pub trait LocatorLike: Send + Sync {
    /// Returns the target this locator was created for.
    fn target(&self) -> &Target;

    /// Clicks the element once it is actionable, waiting up to `timeout`
    /// (the engine default when [`None`]).
    async fn click(&self, timeout: Option<Duration>) -> Result<()>;

    /// Types `text` into an input element, replacing any existing value.
    async fn fill(&self, text: &str) -> Result<()>;

    /// Sets a checkbox or radio to `checked`. A no-op if already in that state.
    async fn set_checked(&self, checked: bool) -> Result<()>;

    /// Returns the element's [`BoundingBox`], or [`None`] if it is not rendered.
    async fn bounding_box(&self) -> Result<Option<BoundingBox>>;

    /// Returns whether the element is currently visible. Does not wait.
    async fn is_visible(&self) -> Result<bool>;
}

/// Element bounding box in CSS pixels, relative to the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A browser page together with whatever keeps it alive.
#[async_trait]
pub trait SessionLike: Send + Sync {
    /// Returns the page driven by this session.
    fn page(&self) -> &dyn PageLike;

    /// Closes the session and releases browser resources.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens one session per worker. Sessions are never shared between workers.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self, worker: &WorkerId) -> Result<Box<dyn SessionLike>>;
}
