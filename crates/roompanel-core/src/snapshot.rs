//! Statistics snapshot and control affordance model.

use crate::extract::FieldMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of a control exposed to the monitoring platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Momentary button
    Push,
}

impl ControlKind {
    /// Wire name of the control kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point-in-time view of the panel, owned by whoever asked for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Field name to field value
    pub statistics: HashMap<String, String>,
    /// Control name to control kind
    pub controls: HashMap<String, ControlKind>,
}

impl Statistics {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge extracted fields into the snapshot.
    pub fn merge(&mut self, fields: FieldMap) {
        self.statistics.extend(fields);
    }

    /// Set a single field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.statistics.insert(key.into(), value.into());
    }

    /// Look up a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.statistics.get(key).map(String::as_str)
    }

    /// Expose a control to the platform.
    pub fn register_control(&mut self, name: impl Into<String>, kind: ControlKind) {
        self.controls.insert(name.into(), kind);
    }
}
