//! Weak/strong content reference switch.
//!
//! A menu node links to a content document through one of two slots. The weak
//! slot is stored without referential integrity, the strong slot with it. Both
//! slots hold the same reference type; the store decides what "strong" means at
//! commit time. Only the active slot may be filled.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reference to an external content document, by its store path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(String);

impl ContentRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Which of the two slots is authoritative, plus the slots themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSwitch<R> {
    weak_mode: bool,
    weak: Option<R>,
    strong: Option<R>,
}

impl<R> Default for ContentSwitch<R> {
    fn default() -> Self {
        Self {
            weak_mode: true,
            weak: None,
            strong: None,
        }
    }
}

impl<R> ContentSwitch<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored slots. Returns `None` if the inactive slot is filled.
    pub fn from_slots(weak_mode: bool, weak: Option<R>, strong: Option<R>) -> Option<Self> {
        let inactive = if weak_mode { &strong } else { &weak };
        if inactive.is_some() {
            return None;
        }
        Some(Self {
            weak_mode,
            weak,
            strong,
        })
    }

    /// The reference held by the active slot.
    pub fn get(&self) -> Option<&R> {
        if self.weak_mode {
            self.weak.as_ref()
        } else {
            self.strong.as_ref()
        }
    }

    /// Write the active slot. The inactive slot is not touched.
    pub fn set(&mut self, content: Option<R>) {
        if self.weak_mode {
            self.weak = content;
        } else {
            self.strong = content;
        }
    }

    pub fn is_weak(&self) -> bool {
        self.weak_mode
    }

    /// Switch modes, moving the current reference into the newly active slot.
    pub fn set_weak(&mut self, weak: bool) {
        if weak == self.weak_mode {
            return;
        }
        if weak {
            self.weak = self.strong.take();
        } else {
            self.strong = self.weak.take();
        }
        debug!(weak, "content mode switched");
        self.weak_mode = weak;
    }

    pub fn weak_slot(&self) -> Option<&R> {
        self.weak.as_ref()
    }

    pub fn strong_slot(&self) -> Option<&R> {
        self.strong.as_ref()
    }
}
