use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default marker attribute set on elements that already carry a conversion.
pub const DEFAULT_MARKER_ATTRIBUTE: &str = "data-metric-converted";
/// Default attribute the tooltip text is written to.
pub const DEFAULT_TOOLTIP_ATTRIBUTE: &str = "title";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    // Attribute flagging an element as converted
    #[serde(default = "default_marker_attribute")]
    pub marker_attribute: String,

    // Attribute receiving the human-readable conversion
    #[serde(default = "default_tooltip_attribute")]
    pub tooltip_attribute: String,

    // Never annotate elements whose parent is <body>
    #[serde(default = "default_true")]
    pub skip_body_children: bool,

    // Also block elements that sit anywhere under a converted element,
    // not just directly under one. Off keeps the immediate-container check.
    #[serde(default)]
    pub guard_ancestors: bool,
}

fn default_marker_attribute() -> String {
    DEFAULT_MARKER_ATTRIBUTE.to_string()
}

fn default_tooltip_attribute() -> String {
    DEFAULT_TOOLTIP_ATTRIBUTE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marker_attribute: default_marker_attribute(),
            tooltip_attribute: default_tooltip_attribute(),
            skip_body_children: true,
            guard_ancestors: false,
        }
    }
}

impl Settings {
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    /// Load from `path` if one is named, otherwise use defaults. A named file
    /// that can't be read is an error.
    pub fn load_or_default<P: AsRef<std::path::Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = Settings::load_from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.marker_attribute, "data-metric-converted");
        assert_eq!(settings.tooltip_attribute, "title");
        assert!(settings.skip_body_children);
        assert!(!settings.guard_ancestors);
    }

    #[test]
    fn test_partial_config() {
        let settings = Settings::load_from_str(
            r#"
tooltip_attribute = "data-metric"
guard_ancestors = true
"#,
        )
        .unwrap();
        assert_eq!(settings.marker_attribute, DEFAULT_MARKER_ATTRIBUTE);
        assert_eq!(settings.tooltip_attribute, "data-metric");
        assert!(settings.guard_ancestors);
    }

    #[test]
    fn test_invalid_config() {
        let result = Settings::load_from_str("skip_body_children = \"yes\"");
        assert!(matches!(result, Err(crate::error::Error::Config(_))));
    }

    #[test]
    fn test_no_config_uses_defaults() {
        let settings = Settings::load_or_default(None::<&str>).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_named_config_must_exist() {
        let result = Settings::load_or_default(Some("/nonexistent/metric-mcmaster.toml"));
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
