//! Pass definition file format.
//!
//! The definition is a JSON document with three sections: the pass
//! record itself, pass-level asset paths, and localizations (strings
//! plus locale-scoped asset paths). Asset paths are resolved relative to
//! the definition file's directory.
//!
//! ```json
//! {
//!   "pass": {
//!     "type": "coupon",
//!     "description": "20% off",
//!     "organizationName": "Example",
//!     "passTypeIdentifier": "pass.com.example.coupon",
//!     "serialNumber": "0001",
//!     "teamIdentifier": "ABCDE12345",
//!     "fields": { "primary": [{ "key": "offer", "value": "20%" }] }
//!   },
//!   "assets": { "icon": "icon.png", "icon@2x": "icon@2x.png" },
//!   "localizations": [
//!     { "culture": "fr", "strings": { "offer": "20 %" } }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use pkpass::{Asset, AssetSet, Localization, Pass, Result};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Definition {
    pass: Pass,
    #[serde(default)]
    assets: AssetPaths,
    #[serde(default)]
    localizations: Vec<LocalizationDef>,
}

impl Definition {
    /// Builds the full pass record, loading every referenced asset file.
    pub fn into_pass(self, base_dir: &Path) -> Result<Pass> {
        let mut pass = self.pass;
        pass.assets = self.assets.load(base_dir)?;
        for def in self.localizations {
            pass.localizations.push(def.load(base_dir)?);
        }
        Ok(pass)
    }
}

#[derive(Deserialize)]
struct LocalizationDef {
    culture: String,
    #[serde(default)]
    strings: IndexMap<String, String>,
    #[serde(default)]
    assets: AssetPaths,
}

impl LocalizationDef {
    fn load(self, base_dir: &Path) -> Result<Localization> {
        Ok(Localization {
            culture: self.culture,
            strings: self.strings,
            assets: self.assets.load(base_dir)?,
        })
    }
}

/// File paths for the 18 asset slots, keyed by slot name.
#[derive(Deserialize, Default)]
struct AssetPaths {
    icon: Option<PathBuf>,
    #[serde(rename = "icon@2x")]
    icon_2x: Option<PathBuf>,
    #[serde(rename = "icon@3x")]
    icon_3x: Option<PathBuf>,
    logo: Option<PathBuf>,
    #[serde(rename = "logo@2x")]
    logo_2x: Option<PathBuf>,
    #[serde(rename = "logo@3x")]
    logo_3x: Option<PathBuf>,
    background: Option<PathBuf>,
    #[serde(rename = "background@2x")]
    background_2x: Option<PathBuf>,
    #[serde(rename = "background@3x")]
    background_3x: Option<PathBuf>,
    footer: Option<PathBuf>,
    #[serde(rename = "footer@2x")]
    footer_2x: Option<PathBuf>,
    #[serde(rename = "footer@3x")]
    footer_3x: Option<PathBuf>,
    strip: Option<PathBuf>,
    #[serde(rename = "strip@2x")]
    strip_2x: Option<PathBuf>,
    #[serde(rename = "strip@3x")]
    strip_3x: Option<PathBuf>,
    thumbnail: Option<PathBuf>,
    #[serde(rename = "thumbnail@2x")]
    thumbnail_2x: Option<PathBuf>,
    #[serde(rename = "thumbnail@3x")]
    thumbnail_3x: Option<PathBuf>,
}

impl AssetPaths {
    fn load(self, base_dir: &Path) -> Result<AssetSet> {
        let read = |path: Option<PathBuf>| -> Result<Option<Asset>> {
            path.map(|p| Asset::from_file(base_dir.join(p))).transpose()
        };

        Ok(AssetSet {
            icon: read(self.icon)?,
            icon_2x: read(self.icon_2x)?,
            icon_3x: read(self.icon_3x)?,
            logo: read(self.logo)?,
            logo_2x: read(self.logo_2x)?,
            logo_3x: read(self.logo_3x)?,
            background: read(self.background)?,
            background_2x: read(self.background_2x)?,
            background_3x: read(self.background_3x)?,
            footer: read(self.footer)?,
            footer_2x: read(self.footer_2x)?,
            footer_3x: read(self.footer_3x)?,
            strip: read(self.strip)?,
            strip_2x: read(self.strip_2x)?,
            strip_3x: read(self.strip_3x)?,
            thumbnail: read(self.thumbnail)?,
            thumbnail_2x: read(self.thumbnail_2x)?,
            thumbnail_3x: read(self.thumbnail_3x)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkpass::PassKind;

    #[test]
    fn parses_definition_with_all_sections() {
        let def: Definition = serde_json::from_str(
            r#"{
                "pass": {
                    "type": "coupon",
                    "description": "20% off",
                    "organizationName": "Example",
                    "passTypeIdentifier": "pass.com.example.coupon",
                    "serialNumber": "0001",
                    "teamIdentifier": "ABCDE12345"
                },
                "assets": { "icon": "icon.png" },
                "localizations": [
                    { "culture": "fr", "strings": { "offer": "20 %" } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(def.pass.kind, PassKind::Coupon);
        assert_eq!(def.assets.icon, Some(PathBuf::from("icon.png")));
        assert_eq!(def.localizations.len(), 1);
        assert_eq!(def.localizations[0].strings["offer"], "20 %");
    }

    #[test]
    fn missing_asset_file_fails_loading() {
        let paths = AssetPaths {
            icon: Some(PathBuf::from("does-not-exist.png")),
            ..AssetPaths::default()
        };
        assert!(paths.load(Path::new("/nonexistent")).is_err());
    }
}
