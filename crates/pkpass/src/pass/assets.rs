//! Raster asset slots.
//!
//! A pass (and each of its localizations) carries up to 18 optional image
//! slots: icon, logo, background, footer, strip, and thumbnail, each at
//! 1x/2x/3x resolution. A slot that is unset contributes no archive member
//! at all.

use std::fs;
use std::path::Path;

use crate::Result;

/// Opaque image payload.
///
/// The bundler never inspects the bytes; it writes them verbatim as an
/// archive member named after the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    bytes: Vec<u8>,
}

impl Asset {
    pub fn new(bytes: Vec<u8>) -> Self {
        Asset { bytes }
    }

    /// Reads an asset payload from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Asset {
            bytes: fs::read(path)?,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for Asset {
    fn from(bytes: Vec<u8>) -> Self {
        Asset::new(bytes)
    }
}

/// The 18 named asset slots of a pass or localization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSet {
    pub icon: Option<Asset>,
    pub icon_2x: Option<Asset>,
    pub icon_3x: Option<Asset>,
    pub logo: Option<Asset>,
    pub logo_2x: Option<Asset>,
    pub logo_3x: Option<Asset>,
    pub background: Option<Asset>,
    pub background_2x: Option<Asset>,
    pub background_3x: Option<Asset>,
    pub footer: Option<Asset>,
    pub footer_2x: Option<Asset>,
    pub footer_3x: Option<Asset>,
    pub strip: Option<Asset>,
    pub strip_2x: Option<Asset>,
    pub strip_3x: Option<Asset>,
    pub thumbnail: Option<Asset>,
    pub thumbnail_2x: Option<Asset>,
    pub thumbnail_3x: Option<Asset>,
}

/// Fixed slot table: archive file name plus accessor, in emission order.
const SLOTS: &[(&str, fn(&AssetSet) -> Option<&Asset>)] = &[
    ("icon.png", |a| a.icon.as_ref()),
    ("icon@2x.png", |a| a.icon_2x.as_ref()),
    ("icon@3x.png", |a| a.icon_3x.as_ref()),
    ("logo.png", |a| a.logo.as_ref()),
    ("logo@2x.png", |a| a.logo_2x.as_ref()),
    ("logo@3x.png", |a| a.logo_3x.as_ref()),
    ("background.png", |a| a.background.as_ref()),
    ("background@2x.png", |a| a.background_2x.as_ref()),
    ("background@3x.png", |a| a.background_3x.as_ref()),
    ("footer.png", |a| a.footer.as_ref()),
    ("footer@2x.png", |a| a.footer_2x.as_ref()),
    ("footer@3x.png", |a| a.footer_3x.as_ref()),
    ("strip.png", |a| a.strip.as_ref()),
    ("strip@2x.png", |a| a.strip_2x.as_ref()),
    ("strip@3x.png", |a| a.strip_3x.as_ref()),
    ("thumbnail.png", |a| a.thumbnail.as_ref()),
    ("thumbnail@2x.png", |a| a.thumbnail_2x.as_ref()),
    ("thumbnail@3x.png", |a| a.thumbnail_3x.as_ref()),
];

impl AssetSet {
    /// Iterates the slots that hold a payload, as `(file name, asset)`
    /// pairs in the fixed slot order.
    pub fn present(&self) -> impl Iterator<Item = (&'static str, &Asset)> + '_ {
        SLOTS
            .iter()
            .filter_map(move |(name, get)| get(self).map(|asset| (*name, asset)))
    }
}
