//! Locale-scoped overrides.
//!
//! A [`Localization`] namespaces its output under `"{culture}.lproj/"`:
//! an optional `pass.strings` table plus its own asset slots shadowing the
//! pass-level ones for that locale.

use indexmap::IndexMap;

use super::AssetSet;

/// Strings and asset overrides for one locale.
#[derive(Debug, Clone, Default)]
pub struct Localization {
    /// Locale identifier, e.g. `"fr"` or `"zh-Hans"`.
    pub culture: String,
    /// Localized string table, kept in insertion order.
    pub strings: IndexMap<String, String>,
    /// Asset slots overriding the pass-level ones for this locale.
    pub assets: AssetSet,
}

impl Localization {
    pub fn new(culture: impl Into<String>) -> Self {
        Localization {
            culture: culture.into(),
            ..Localization::default()
        }
    }

    /// Adds one localized string pair.
    pub fn string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }

    /// Archive path prefix for this locale's members.
    pub fn prefix(&self) -> String {
        format!("{}.lproj", self.culture)
    }

    /// Renders the `pass.strings` file content: one `"key" = "value";`
    /// line per pair, insertion order, newline-joined.
    pub fn strings_file(&self) -> String {
        self.strings
            .iter()
            .map(|(key, value)| format!("\"{}\" = \"{}\";", key, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
