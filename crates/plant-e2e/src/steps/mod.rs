//! Step definitions.
//!
//! Steps are plain async functions bound to [`ScenarioWorld`](crate::ScenarioWorld)
//! with cucumber's `#[given]`/`#[when]`/`#[then]` attributes. Cucumber collects
//! them at link time, so a module only has to be compiled to be registered.

pub mod plant_search;
