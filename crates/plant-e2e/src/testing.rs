//! Test doubles for the browser seam.
//!
//! [`MockPage`] keeps a tiny model of page state (visible targets, checked
//! toggles, bounding boxes, URL) and records every action for later
//! assertion. Reactions script how the simulated application responds:
//!
//! ```ignore
//! use plant_e2e::testing::{Effect, MockPage};
//! use plant_e2e::target::Target;
//!
//! let page = MockPage::new();
//! let input = Target::test_id("plant-search-input");
//! page.show(&input);
//! page.on_fill(&input, "Tomato", [Effect::show(Target::test_id("Tomato-plant-search-result"))]);
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::driver::{BoundingBox, LocatorLike, PageLike, SessionFactory, SessionLike};
use crate::error::{E2eError, Result};
use crate::namespace::WorkerId;
use crate::target::Target;
use crate::wait;

/// Action recorded by [`MockPage`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockAction {
    Goto { url: String },
    Click { target: Target },
    Fill { target: Target, text: String },
    SetChecked { target: Target, checked: bool },
    MouseClick { x: f64, y: f64 },
    Wait { ms: u64 },
}

/// State change applied when a reaction fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Show(Target),
    Hide(Target),
    SetUrl(String),
}

impl Effect {
    pub fn show(target: Target) -> Self {
        Effect::Show(target)
    }

    pub fn hide(target: Target) -> Self {
        Effect::Hide(target)
    }

    pub fn set_url(url: impl Into<String>) -> Self {
        Effect::SetUrl(url.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Trigger {
    Click(Target),
    Fill(Target, String),
    MouseClick,
    Goto(String),
}

#[derive(Debug)]
struct Reaction {
    trigger: Trigger,
    effects: Vec<Effect>,
}

/// In-memory page.
pub struct MockPage {
    url: Mutex<String>,
    visible: Mutex<HashSet<Target>>,
    checked: Mutex<HashMap<Target, bool>>,
    bboxes: Mutex<HashMap<Target, BoundingBox>>,
    reactions: Mutex<Vec<Reaction>>,
    failures: Mutex<HashMap<Target, VecDeque<E2eError>>>,
    actions: Mutex<Vec<MockAction>>,
    action_timeout: Duration,
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPage {
    /// Creates an empty page at `about:blank`.
    pub fn new() -> Self {
        Self {
            url: Mutex::new("about:blank".to_string()),
            visible: Mutex::new(HashSet::new()),
            checked: Mutex::new(HashMap::new()),
            bboxes: Mutex::new(HashMap::new()),
            reactions: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            actions: Mutex::new(Vec::new()),
            action_timeout: Duration::from_millis(200),
        }
    }

    /// How long actions wait for a hidden target when no timeout is given.
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    pub fn set_url(&self, url: &str) {
        *self.url.lock().unwrap() = url.to_string();
    }

    pub fn show(&self, target: &Target) {
        self.visible.lock().unwrap().insert(target.clone());
    }

    pub fn hide(&self, target: &Target) {
        self.visible.lock().unwrap().remove(target);
    }

    pub fn is_shown(&self, target: &Target) -> bool {
        self.visible.lock().unwrap().contains(target)
    }

    pub fn is_checked(&self, target: &Target) -> bool {
        self.checked
            .lock()
            .unwrap()
            .get(target)
            .copied()
            .unwrap_or(false)
    }

    /// Sets the bounding box for `target` and makes it visible.
    pub fn set_bbox(&self, target: &Target, bbox: BoundingBox) {
        self.bboxes.lock().unwrap().insert(target.clone(), bbox);
        self.show(target);
    }

    pub fn on_click(&self, target: &Target, effects: impl IntoIterator<Item = Effect>) {
        self.add_reaction(Trigger::Click(target.clone()), effects);
    }

    pub fn on_fill(&self, target: &Target, text: &str, effects: impl IntoIterator<Item = Effect>) {
        self.add_reaction(Trigger::Fill(target.clone(), text.to_string()), effects);
    }

    pub fn on_mouse_click(&self, effects: impl IntoIterator<Item = Effect>) {
        self.add_reaction(Trigger::MouseClick, effects);
    }

    pub fn on_goto(&self, url: &str, effects: impl IntoIterator<Item = Effect>) {
        self.add_reaction(Trigger::Goto(url.to_string()), effects);
    }

    /// Makes the next click on `target` fail with `error` without acting.
    pub fn fail_click(&self, target: &Target, error: E2eError) {
        self.failures
            .lock()
            .unwrap()
            .entry(target.clone())
            .or_default()
            .push_back(error);
    }

    /// Returns all recorded actions.
    pub fn actions(&self) -> Vec<MockAction> {
        self.actions.lock().unwrap().clone()
    }

    pub fn clear_actions(&self) {
        self.actions.lock().unwrap().clear();
    }

    /// Counts recorded clicks on `target`.
    pub fn clicks_on(&self, target: &Target) -> usize {
        self.actions
            .lock()
            .unwrap()
            .iter()
            .filter(|a| matches!(a, MockAction::Click { target: t } if t == target))
            .count()
    }

    fn add_reaction(&self, trigger: Trigger, effects: impl IntoIterator<Item = Effect>) {
        self.reactions.lock().unwrap().push(Reaction {
            trigger,
            effects: effects.into_iter().collect(),
        });
    }

    fn record_action(&self, action: MockAction) {
        self.actions.lock().unwrap().push(action);
    }

    fn take_failure(&self, target: &Target) -> Option<E2eError> {
        self.failures.lock().unwrap().get_mut(target)?.pop_front()
    }

    fn fire(&self, trigger: &Trigger) {
        let effects: Vec<Effect> = self
            .reactions
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.trigger == trigger)
            .flat_map(|r| r.effects.iter().cloned())
            .collect();

        for effect in effects {
            match effect {
                Effect::Show(target) => self.show(&target),
                Effect::Hide(target) => self.hide(&target),
                Effect::SetUrl(url) => self.set_url(&url),
            }
        }
    }

    async fn wait_actionable(&self, target: &Target, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or(self.action_timeout);
        let condition = format!("{target} to be actionable");
        wait::until(timeout, &condition, move || async move { Ok(self.is_shown(target)) }).await
    }
}

#[async_trait]
impl PageLike for MockPage {
    fn url(&self) -> String {
        self.url.lock().unwrap().clone()
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.record_action(MockAction::Goto {
            url: url.to_string(),
        });
        self.set_url(url);
        self.fire(&Trigger::Goto(url.to_string()));
        Ok(())
    }

    fn locator(&self, target: &Target) -> Box<dyn LocatorLike + '_> {
        Box::new(MockLocator {
            target: target.clone(),
            page: self,
        })
    }

    async fn mouse_click(&self, x: f64, y: f64) -> Result<()> {
        self.record_action(MockAction::MouseClick { x, y });
        self.fire(&Trigger::MouseClick);
        Ok(())
    }

    async fn wait_for_timeout(&self, duration: Duration) {
        self.record_action(MockAction::Wait {
            ms: duration.as_millis() as u64,
        });
    }
}

/// Locator returned by [`MockPage::locator()`].
pub struct MockLocator<'a> {
    target: Target,
    page: &'a MockPage,
}

#[async_trait]
impl LocatorLike for MockLocator<'_> {
    fn target(&self) -> &Target {
        &self.target
    }

    async fn click(&self, timeout: Option<Duration>) -> Result<()> {
        if let Some(err) = self.page.take_failure(&self.target) {
            return Err(err);
        }
        self.page.wait_actionable(&self.target, timeout).await?;
        self.page.record_action(MockAction::Click {
            target: self.target.clone(),
        });
        self.page.fire(&Trigger::Click(self.target.clone()));
        Ok(())
    }

    async fn fill(&self, text: &str) -> Result<()> {
        self.page.wait_actionable(&self.target, None).await?;
        self.page.record_action(MockAction::Fill {
            target: self.target.clone(),
            text: text.to_string(),
        });
        self.page
            .fire(&Trigger::Fill(self.target.clone(), text.to_string()));
        Ok(())
    }

    async fn set_checked(&self, checked: bool) -> Result<()> {
        self.page.wait_actionable(&self.target, None).await?;
        self.page.record_action(MockAction::SetChecked {
            target: self.target.clone(),
            checked,
        });
        self.page
            .checked
            .lock()
            .unwrap()
            .insert(self.target.clone(), checked);
        Ok(())
    }

    async fn bounding_box(&self) -> Result<Option<BoundingBox>> {
        if !self.page.is_shown(&self.target) {
            return Ok(None);
        }
        Ok(self.page.bboxes.lock().unwrap().get(&self.target).copied())
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self.page.is_shown(&self.target))
    }
}

/// Session over a shared [`MockPage`].
pub struct MockSession {
    page: Arc<MockPage>,
    closed: Arc<Mutex<bool>>,
}

impl MockSession {
    pub fn new(page: Arc<MockPage>) -> Self {
        Self {
            page,
            closed: Arc::new(Mutex::new(false)),
        }
    }

    pub fn mock_page(&self) -> &MockPage {
        &self.page
    }
}

#[async_trait]
impl SessionLike for MockSession {
    fn page(&self) -> &dyn PageLike {
        self.page.as_ref()
    }

    async fn close(self: Box<Self>) -> Result<()> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

type PageBuilder = dyn Fn(&WorkerId) -> MockPage + Send + Sync;

/// Opens a fresh [`MockPage`] per worker and remembers each one.
pub struct MockSessionFactory {
    build: Box<PageBuilder>,
    opened: Mutex<Vec<(WorkerId, Arc<MockPage>)>>,
    closed: Mutex<Vec<Arc<Mutex<bool>>>>,
}

impl MockSessionFactory {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&WorkerId) -> MockPage + Send + Sync + 'static,
    {
        Self {
            build: Box::new(build),
            opened: Mutex::new(Vec::new()),
            closed: Mutex::new(Vec::new()),
        }
    }

    /// Pages opened so far, in opening order.
    pub fn opened(&self) -> Vec<(WorkerId, Arc<MockPage>)> {
        self.opened.lock().unwrap().clone()
    }

    /// Returns `true` once every opened session has been closed.
    pub fn all_closed(&self) -> bool {
        self.closed
            .lock()
            .unwrap()
            .iter()
            .all(|flag| *flag.lock().unwrap())
    }
}

#[async_trait]
impl SessionFactory for MockSessionFactory {
    async fn open(&self, worker: &WorkerId) -> Result<Box<dyn SessionLike>> {
        let page = Arc::new((self.build)(worker));
        self.opened
            .lock()
            .unwrap()
            .push((worker.clone(), Arc::clone(&page)));
        let session = MockSession::new(page);
        self.closed
            .lock()
            .unwrap()
            .push(Arc::clone(&session.closed));
        Ok(Box::new(session))
    }
}

/// Session factory that always fails, for launch-error paths.
pub struct FailingSessionFactory;

#[async_trait]
impl SessionFactory for FailingSessionFactory {
    async fn open(&self, _worker: &WorkerId) -> Result<Box<dyn SessionLike>> {
        Err(E2eError::BrowserLaunch("no browser available".into()))
    }
}
