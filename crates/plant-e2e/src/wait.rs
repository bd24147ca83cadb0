//! Bounded polling.
//!
//! UI updates land asynchronously relative to the action that caused them,
//! so every assertion polls until its condition holds or the budget runs out.

use std::future::Future;
use std::time::{Duration, Instant};

use glob::Pattern;
use tracing::trace;

use crate::driver::{LocatorLike, PageLike};
use crate::error::{E2eError, Result};

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polls `check` until it returns `true` or `timeout` elapses.
///
/// Check errors count as "not yet": an element can be detached and
/// re-rendered between two polls.
pub async fn until<F, Fut>(timeout: Duration, condition: &str, mut check: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let started = Instant::now();
    loop {
        match check().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(err) => trace!(target = "plant-e2e", %condition, error = %err, "check failed"),
        }

        let elapsed = started.elapsed();
        if elapsed >= timeout {
            return Err(E2eError::timeout(timeout, condition));
        }
        tokio::time::sleep(POLL_INTERVAL.min(timeout - elapsed)).await;
    }
}

pub async fn expect_visible(locator: &dyn LocatorLike, timeout: Duration) -> Result<()> {
    let condition = format!("{} to be visible", locator.target());
    until(timeout, &condition, move || locator.is_visible()).await
}

pub async fn expect_hidden(locator: &dyn LocatorLike, timeout: Duration) -> Result<()> {
    let condition = format!("{} to be hidden", locator.target());
    until(timeout, &condition, move || async move {
        Ok(!locator.is_visible().await?)
    })
    .await
}

/// Waits until the page URL matches a glob such as `**/maps`.
pub async fn wait_for_url(page: &dyn PageLike, pattern: &str, timeout: Duration) -> Result<()> {
    let glob = Pattern::new(pattern)
        .map_err(|e| E2eError::Config(format!("invalid url pattern `{pattern}`: {e}")))?;
    let glob = &glob;
    let condition = format!("url matching {pattern}");
    until(timeout, &condition, move || {
        let url = page.url();
        async move { Ok(glob.matches(&url)) }
    })
    .await
}
