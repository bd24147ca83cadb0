//! [`PageLike`] over a real browser driven by Playwright.

use std::time::Duration;

use async_trait::async_trait;
use pw::{ClickOptions, LaunchOptions, Playwright};
use tracing::debug;

use crate::driver::{BoundingBox, LocatorLike, PageLike, SessionFactory, SessionLike};
use crate::error::{E2eError, Result};
use crate::namespace::WorkerId;
use crate::target::Target;

fn browser_err(err: pw::Error) -> E2eError {
    E2eError::Browser(err.to_string())
}

/// A Playwright page.
pub struct PlaywrightPage {
    page: pw::Page,
}

impl PlaywrightPage {
    pub fn new(page: pw::Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl PageLike for PlaywrightPage {
    fn url(&self) -> String {
        self.page.url()
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url, None)
            .await
            .map(|_| ())
            .map_err(|e| E2eError::Navigation {
                url: url.to_string(),
                source: anyhow::Error::new(e),
            })
    }

    fn locator(&self, target: &Target) -> Box<dyn LocatorLike + '_> {
        Box::new(PlaywrightLocator {
            page: &self.page,
            target: target.clone(),
        })
    }

    async fn mouse_click(&self, x: f64, y: f64) -> Result<()> {
        // The engine's mouse only takes whole CSS pixels.
        self.page
            .mouse()
            .click(x.round() as i32, y.round() as i32, None)
            .await
            .map_err(browser_err)
    }
}

/// Resolves its target through `page.locator()` on every call.
pub struct PlaywrightLocator<'a> {
    page: &'a pw::Page,
    target: Target,
}

impl PlaywrightLocator<'_> {
    async fn resolve(&self) -> pw::Locator {
        self.page.locator(&self.target.selector()).await
    }
}

#[async_trait]
impl LocatorLike for PlaywrightLocator<'_> {
    fn target(&self) -> &Target {
        &self.target
    }

    async fn click(&self, timeout: Option<Duration>) -> Result<()> {
        let options = timeout.map(|t| {
            ClickOptions::builder()
                .timeout(t.as_millis() as f64)
                .build()
        });
        self.resolve()
            .await
            .click(options)
            .await
            .map_err(|e| classify(e, &self.target, timeout))
    }

    async fn fill(&self, text: &str) -> Result<()> {
        self.resolve()
            .await
            .fill(text, None)
            .await
            .map_err(|e| classify(e, &self.target, None))
    }

    async fn set_checked(&self, checked: bool) -> Result<()> {
        self.resolve()
            .await
            .set_checked(checked, None)
            .await
            .map_err(|e| classify(e, &self.target, None))
    }

    async fn bounding_box(&self) -> Result<Option<BoundingBox>> {
        let css = self.target.css().ok_or_else(|| {
            E2eError::Browser(format!("bounding box needs a test id target, got {}", self.target))
        })?;
        let raw = self
            .page
            .evaluate_value(&bounding_box_js(&css))
            .await
            .map_err(|e| E2eError::JsEval(e.to_string()))?;
        if raw == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn is_visible(&self) -> Result<bool> {
        self.resolve().await.is_visible().await.map_err(browser_err)
    }
}

fn classify(err: pw::Error, target: &Target, timeout: Option<Duration>) -> E2eError {
    let message = err.to_string();
    match timeout {
        Some(budget) if message.contains("Timeout") => {
            E2eError::timeout(budget, format!("{target} to be actionable"))
        }
        _ => E2eError::Browser(message),
    }
}

fn bounding_box_js(css: &str) -> String {
    let escaped = css.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        r#"(() => {{
                const el = document.querySelector('{escaped}');
                if (!el) return 'null';
                const rect = el.getBoundingClientRect();
                if (rect.width === 0 && rect.height === 0) return 'null';
                return JSON.stringify({{
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height
                }});
            }})()"#
    )
}

/// Keeps the driver, the browser and its page alive together.
pub struct BrowserSession {
    _playwright: Playwright,
    browser: pw::Browser,
    page: PlaywrightPage,
}

impl BrowserSession {
    pub async fn launch(headless: bool) -> Result<Self> {
        debug!(target = "plant-e2e", headless, "starting Playwright...");
        let playwright = Playwright::launch()
            .await
            .map_err(|e| E2eError::BrowserLaunch(e.to_string()))?;
        let browser = playwright
            .chromium()
            .launch_with_options(LaunchOptions::default().headless(headless))
            .await
            .map_err(|e| E2eError::BrowserLaunch(e.to_string()))?;
        let page = browser.new_page().await.map_err(browser_err)?;

        Ok(Self {
            _playwright: playwright,
            browser,
            page: PlaywrightPage::new(page),
        })
    }
}

#[async_trait]
impl SessionLike for BrowserSession {
    fn page(&self) -> &dyn PageLike {
        &self.page
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.browser.close().await.map_err(browser_err)
    }
}

/// Launches one Chromium per worker.
#[derive(Debug, Clone, Copy)]
pub struct PlaywrightSessionFactory {
    pub headless: bool,
}

#[async_trait]
impl SessionFactory for PlaywrightSessionFactory {
    async fn open(&self, worker: &WorkerId) -> Result<Box<dyn SessionLike>> {
        debug!(target = "plant-e2e", %worker, "launching browser");
        Ok(Box::new(BrowserSession::launch(self.headless).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_script_escapes_quotes() {
        let js = bounding_box_js(r#"[data-testid="it's"]"#);
        assert!(js.contains(r#"document.querySelector('[data-testid="it\'s"]')"#));
    }
}
