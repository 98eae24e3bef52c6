//! Names of the DOM elements and attributes a widget binds to.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// DOM contract of a focal point widget.
///
/// The defaults match the markup rendered by
/// `focal_io::FocalPointPicker` and by server-side form builders that
/// emit the same classes. Missing JSON fields take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Class of the draggable crosshair. Its `id` is the widget id.
    pub indicator_class: String,

    /// Class of the text input holding the `"x,y"` value.
    pub field_class: String,

    /// Class of the optional preview link.
    pub preview_link_class: String,

    /// Attribute on the field and the preview link holding the widget id.
    pub id_attribute: String,

    /// Class of the form item wrapping the field; this is what gets
    /// hidden and shown.
    pub form_item_class: String,

    /// Class marking a field with a validation error.
    pub error_class: String,

    /// Class of the element wrapping indicator and image.
    pub wrapper_class: String,

    /// Attribute set on an indicator once it is bound.
    pub attached_attribute: String,

    /// Appended to the widget id to form its preview request key.
    /// May be empty.
    pub request_key_suffix: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            indicator_class: "focal-point-indicator".into(),
            field_class: "focal-point".into(),
            preview_link_class: "focal-point-preview-link".into(),
            id_attribute: "data-focal-point-id".into(),
            form_item_class: "form-item".into(),
            error_class: "error".into(),
            wrapper_class: "focal-point-wrapper".into(),
            attached_attribute: "data-focal-point-attached".into(),
            request_key_suffix: "-preview-link".into(),
        }
    }
}

impl WidgetConfig {
    /// Load a configuration from JSON, filling unspecified fields with
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if `json` is malformed and
    /// [`ConfigError::EmptyName`] if a class or attribute name is empty.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every class and attribute name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyName`] naming the first empty field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("indicator_class", &self.indicator_class),
            ("field_class", &self.field_class),
            ("preview_link_class", &self.preview_link_class),
            ("id_attribute", &self.id_attribute),
            ("form_item_class", &self.form_item_class),
            ("error_class", &self.error_class),
            ("wrapper_class", &self.wrapper_class),
            ("attached_attribute", &self.attached_attribute),
        ];
        match names.into_iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(ConfigError::EmptyName(name)),
            None => Ok(()),
        }
    }

    /// CSS selector matching indicators.
    #[must_use]
    pub fn indicator_selector(&self) -> String {
        format!(".{}", self.indicator_class)
    }

    /// CSS selector matching fields of any widget.
    #[must_use]
    pub fn field_selector(&self) -> String {
        format!(".{}", self.field_class)
    }

    /// CSS selector matching preview links of any widget.
    #[must_use]
    pub fn preview_link_selector(&self) -> String {
        format!(".{}", self.preview_link_class)
    }

    /// CSS selector matching form items.
    #[must_use]
    pub fn form_item_selector(&self) -> String {
        format!(".{}", self.form_item_class)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        assert_eq!(WidgetConfig::from_json("{}").unwrap(), WidgetConfig::default());
    }

    #[test]
    fn partial_json_overrides_named_fields() {
        let config = WidgetConfig::from_json(r#"{"field_class": "crop-focus"}"#).unwrap();
        assert_eq!(config.field_class, "crop-focus");
        assert_eq!(config.field_selector(), ".crop-focus");
        assert_eq!(config.indicator_class, "focal-point-indicator");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let result = WidgetConfig::from_json(r#"{"field_class": 3}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn empty_names_are_rejected() {
        let result = WidgetConfig::from_json(r#"{"error_class": ""}"#);
        assert!(matches!(result, Err(ConfigError::EmptyName("error_class"))));
    }

    #[test]
    fn empty_request_suffix_is_allowed() {
        let config = WidgetConfig::from_json(r#"{"request_key_suffix": ""}"#).unwrap();
        assert!(config.request_key_suffix.is_empty());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = WidgetConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(WidgetConfig::from_json(&json).unwrap(), config);
    }
}
