//! Page-supplied configuration
//!
//! The host page may embed
//! `<script type="application/json" id="arbor-config">{ ... }</script>`.
//! Anything it leaves out keeps its default.

use arbor_core::AppConfig;
use arbor_core::error::ConfigError;

/// Id of the script element holding the JSON configuration.
pub const CONFIG_ELEMENT_ID: &str = "arbor-config";

/// Parses the embedded configuration text. A blank element means defaults.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the text is not a valid configuration.
pub fn parse_embedded(text: &str) -> Result<AppConfig, ConfigError> {
    if text.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    AppConfig::from_json(text)
}

/// Reads the configuration from the current document.
///
/// Returns defaults when the element is absent.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the element holds an invalid configuration.
pub fn read_config() -> Result<AppConfig, ConfigError> {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());
    match text {
        Some(text) => parse_embedded(&text),
        None => Ok(AppConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_blank_element_uses_defaults() {
        assert_eq!(parse_embedded("  \n ").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_embedded_overrides() {
        let config = parse_embedded(
            r#"{ "owner_id": "ada", "store": { "base_url": "/api" }, "log_filter": "debug" }"#,
        )
        .unwrap();
        assert_eq!(config.owner_id, "ada");
        assert_eq!(config.store.base_url.as_deref(), Some("/api"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_embedded_config() {
        assert!(matches!(parse_embedded("{ nope"), Err(ConfigError::Parse(_))));
    }
}
