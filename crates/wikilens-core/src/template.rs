//! Placeholder substitution and transport encoding for query templates

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z][A-Za-z0-9_]*)\}").expect("invalid placeholder regex"));

/// Named values for template placeholders. One `Bindings` is one layer;
/// [`render`] takes several in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    map: HashMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any earlier value in this layer.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.map.insert(name.into(), value.into());
        self
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Substitute `{name}` placeholders in a single pass.
///
/// The first layer carrying a name wins; a name no layer binds is left
/// verbatim in the output rather than failing. Substituted text is never
/// re-scanned, so a binding value that itself contains `{...}` survives
/// literally.
pub fn render(template: &str, layers: &[&Bindings]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            layers
                .iter()
                .find_map(|layer| layer.get(name))
                .map(str::to_owned)
                .unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

/// Percent-encode a rendered query for use as a URL fragment, `#` prefixed.
pub fn encode_for_transport(rendered: &str) -> String {
    format!("#{}", urlencoding::encode(rendered))
}
