//! Element targets.
//!
//! A [`Target`] describes *how* to find an element at the moment it is used.
//! It is never a resolved handle: every operation renders it again and hands
//! the selector to the browser, so a canvas that re-renders underneath us
//! cannot leave a stale reference behind.

use std::fmt;

/// Strategy for locating one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Stable `data-testid` attribute.
    TestId(String),
    /// ARIA role plus accessible name, matched case-insensitively.
    Role { role: String, name: String },
    /// Associated label text or `aria-label`.
    Label(String),
}

impl Target {
    pub fn test_id(id: impl Into<String>) -> Self {
        Target::TestId(id.into())
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Target::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Target::Label(text.into())
    }

    /// Playwright selector for this target.
    pub fn selector(&self) -> String {
        match self {
            Target::TestId(id) => {
                format!("internal:testid=[data-testid={}s]", quote(id))
            }
            Target::Role { role, name } => {
                format!("internal:role={role}[name={}i]", quote(name))
            }
            Target::Label(text) => format!("internal:label={}i", quote(text)),
        }
    }

    /// Plain CSS equivalent, when one exists. Used for in-page script lookups.
    pub fn css(&self) -> Option<String> {
        match self {
            Target::TestId(id) => Some(format!("[data-testid={}]", quote(id))),
            Target::Role { .. } | Target::Label(_) => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::TestId(id) => write!(f, "test id \"{id}\""),
            Target::Role { role, name } => write!(f, "{role} \"{name}\""),
            Target::Label(text) => write!(f, "label \"{text}\""),
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
