//! Processor configuration.
//!
//! [`Options`] is built in code with `with_*` methods. Its serializable
//! subset, [`OptionsConfig`], can be loaded from JSON or TOML; unknown keys
//! are ignored.
//!
//! ```toml
//! keyPrefix = "md-"
//! tabSize = 2
//!
//! [sanitize]
//! tagNames = ["p", "em", "strong"]
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compiler::{DEFAULT_TAB_SIZE, GenericContainer, UnknownHandler};
use crate::error::Result;
use crate::hyperscript::{Components, CreateElement, Hyperscript};
use crate::sanitize::Schema;

/// Default key prefix.
pub const DEFAULT_KEY_PREFIX: &str = "h-";

/// Whether and how the render tree is sanitized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sanitize {
    /// Keep the render tree as compiled.
    Disabled,
    /// Sanitize with the given rules.
    Enabled(Schema),
}

impl Default for Sanitize {
    fn default() -> Self {
        Self::Enabled(Schema::baseline())
    }
}

/// Processor options.
#[derive(Clone)]
pub struct Options {
    pub(crate) sanitize: Sanitize,
    pub(crate) components: Components,
    pub(crate) element_factory: Arc<dyn CreateElement>,
    pub(crate) key_prefix: Option<String>,
    pub(crate) tab_size: usize,
    pub(crate) unknown: Arc<dyn UnknownHandler>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sanitize: Sanitize::default(),
            components: Components::new(),
            element_factory: Arc::new(Hyperscript),
            key_prefix: Some(DEFAULT_KEY_PREFIX.to_owned()),
            tab_size: DEFAULT_TAB_SIZE,
            unknown: Arc::new(GenericContainer),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut components: Vec<_> = self.components.keys().collect();
        components.sort();
        f.debug_struct("Options")
            .field("sanitize", &self.sanitize)
            .field("components", &components)
            .field("key_prefix", &self.key_prefix)
            .field("tab_size", &self.tab_size)
            .finish_non_exhaustive()
    }
}

impl Options {
    /// Create options with defaults: baseline sanitizing, `h-` keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from JSON.
    pub fn from_json(input: &str) -> Result<Self> {
        let config: OptionsConfig = serde_json::from_str(input)?;
        Ok(config.into())
    }

    /// Load options from TOML.
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: OptionsConfig = toml::from_str(input)?;
        Ok(config.into())
    }

    /// Set sanitizing behavior.
    #[must_use]
    pub fn with_sanitize(mut self, sanitize: Sanitize) -> Self {
        self.sanitize = sanitize;
        self
    }

    /// Sanitize with a custom schema.
    #[must_use]
    pub fn with_schema(self, schema: Schema) -> Self {
        self.with_sanitize(Sanitize::Enabled(schema))
    }

    /// Disable sanitizing.
    #[must_use]
    pub fn without_sanitize(self) -> Self {
        self.with_sanitize(Sanitize::Disabled)
    }

    /// Register a component for a tag name (matched case-insensitively).
    #[must_use]
    pub fn with_component(
        mut self,
        tag_name: &str,
        component: impl CreateElement + 'static,
    ) -> Self {
        self.components
            .insert(tag_name.to_lowercase(), Arc::new(component));
        self
    }

    /// Replace the element factory used for tags without a component.
    #[must_use]
    pub fn with_element_factory(mut self, factory: impl CreateElement + 'static) -> Self {
        self.element_factory = Arc::new(factory);
        self
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Do not assign keys.
    #[must_use]
    pub fn without_keys(mut self) -> Self {
        self.key_prefix = None;
        self
    }

    /// Set the tab width for code blocks.
    #[must_use]
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    /// Replace the fallback for unknown node types.
    #[must_use]
    pub fn with_unknown_handler(mut self, handler: impl UnknownHandler + 'static) -> Self {
        self.unknown = Arc::new(handler);
        self
    }

    #[must_use]
    pub fn sanitize(&self) -> &Sanitize {
        &self.sanitize
    }

    #[must_use]
    pub fn key_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref()
    }

    #[must_use]
    pub fn tab_size(&self) -> usize {
        self.tab_size
    }
}

/// `sanitize` as written in configuration: a flag or a schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SanitizeConfig {
    /// `true` for the baseline schema, `false` to disable.
    Enabled(bool),
    Schema(Schema),
}

/// `keyPrefix` as written in configuration: a prefix, or `false` for no keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPrefixConfig {
    Enabled(bool),
    Prefix(String),
}

/// Serializable options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsConfig {
    pub sanitize: Option<SanitizeConfig>,
    pub key_prefix: Option<KeyPrefixConfig>,
    pub tab_size: Option<usize>,
}

impl From<OptionsConfig> for Options {
    fn from(config: OptionsConfig) -> Self {
        let mut options = Self::default();
        match config.sanitize {
            Some(SanitizeConfig::Enabled(false)) => options.sanitize = Sanitize::Disabled,
            Some(SanitizeConfig::Schema(schema)) => options.sanitize = Sanitize::Enabled(schema),
            Some(SanitizeConfig::Enabled(true)) | None => {}
        }
        match config.key_prefix {
            Some(KeyPrefixConfig::Enabled(false)) => options.key_prefix = None,
            Some(KeyPrefixConfig::Prefix(prefix)) => options.key_prefix = Some(prefix),
            Some(KeyPrefixConfig::Enabled(true)) | None => {}
        }
        if let Some(tab_size) = config.tab_size {
            options.tab_size = tab_size;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::RenderNode;
    use crate::Error;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.sanitize(), &Sanitize::Enabled(Schema::baseline()));
        assert_eq!(options.key_prefix(), Some("h-"));
        assert_eq!(options.tab_size(), 4);
    }

    #[test]
    fn test_from_json() {
        let options =
            Options::from_json(r#"{"sanitize": false, "keyPrefix": "f-", "tabSize": 2}"#).unwrap();
        assert_eq!(options.sanitize(), &Sanitize::Disabled);
        assert_eq!(options.key_prefix(), Some("f-"));
        assert_eq!(options.tab_size(), 2);
    }

    #[test]
    fn test_from_json_schema() {
        let options = Options::from_json(r#"{"sanitize": {"tagNames": []}}"#).unwrap();
        assert_eq!(options.sanitize(), &Sanitize::Enabled(Schema::default()));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options = Options::from_json(r#"{"prefix": "x-", "commonmark": true}"#).unwrap();
        assert_eq!(options.key_prefix(), Some("h-"));
    }

    #[test]
    fn test_key_prefix_false_disables_keys() {
        let options = Options::from_json(r#"{"keyPrefix": false}"#).unwrap();
        assert_eq!(options.key_prefix(), None);
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
keyPrefix = "md-"

[sanitize]
tagNames = ["p"]
clobberPrefix = ""
"#;
        let options = Options::from_toml(toml).unwrap();
        assert_eq!(options.key_prefix(), Some("md-"));
        let Sanitize::Enabled(schema) = options.sanitize() else {
            panic!("expected schema");
        };
        assert_eq!(schema.tag_names, ["p"]);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Options::from_toml("tabSize = \"four\"").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_builder() {
        let options = Options::new()
            .without_sanitize()
            .without_keys()
            .with_tab_size(8)
            .with_component(
                "EM",
                |_: &str, _: crate::Props, children: Vec<RenderNode>| children,
            );
        assert_eq!(options.sanitize(), &Sanitize::Disabled);
        assert_eq!(options.key_prefix(), None);
        assert_eq!(options.tab_size(), 8);
        assert!(options.components.contains_key("em"));
    }
}
