//! Container configuration.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::internal::MAX_DEPTH;

/// Options applied when a container is created
///
/// Child containers inherit their parent's options; a labelled parent
/// produces children labelled `<parent>/child-<n>`.
///
/// With the `config` feature enabled the options can be read from JSON:
///
/// ```rust
/// # #[cfg(feature = "config")] {
/// use layered_di::ContainerOptions;
///
/// let options = ContainerOptions::from_json(r#"{ "label": "app", "maxDepth": 64 }"#).unwrap();
/// assert_eq!(options.label.as_deref(), Some("app"));
/// assert_eq!(options.max_depth, 64);
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "camelCase", default))]
pub struct ContainerOptions {
    /// Label attached to every log event emitted by the container
    pub label: Option<String>,
    /// Maximum number of nested in-flight constructions per container
    pub max_depth: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            label: None,
            max_depth: MAX_DEPTH,
        }
    }
}

impl ContainerOptions {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses options from a JSON document. Missing fields take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn for_child(&self, index: usize) -> Self {
        let label = format!("{}/child-{}", self.label.as_deref().unwrap_or("root"), index);
        Self {
            label: Some(label),
            max_depth: self.max_depth,
        }
    }

    pub(crate) fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("root")
    }
}
