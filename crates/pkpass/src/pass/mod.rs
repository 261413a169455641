//! Pass data model.
//!
//! A [`Pass`] is the in-memory record that gets packaged into a signed
//! `.pkpass` bundle: a typed set of top-level attributes, display fields
//! grouped by [`FieldType`], optional image [`assets`](AssetSet), and
//! per-locale [`Localization`] overrides.
//!
//! Serialization of the `pass.json` descriptor does not go through serde
//! derive; it uses the explicit attribute table in [`descriptor`] so that
//! inclusion and ordering rules stay visible in one place.

mod assets;
pub mod descriptor;
mod localization;

pub use assets::{Asset, AssetSet};
pub use localization::Localization;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pass style discriminant.
///
/// Selects the key the serialized field groups are nested under in
/// `pass.json` (e.g. `"boardingPass": { "primaryFields": [...] }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PassKind {
    #[serde(rename = "boardingPass")]
    BoardingPass,
    #[serde(rename = "coupon")]
    Coupon,
    #[serde(rename = "eventTicket")]
    EventTicket,
    #[default]
    #[serde(rename = "generic")]
    Generic,
    #[serde(rename = "storeCard")]
    StoreCard,
}

impl PassKind {
    /// JSON key the field groups are nested under.
    pub fn key(self) -> &'static str {
        match self {
            PassKind::BoardingPass => "boardingPass",
            PassKind::Coupon => "coupon",
            PassKind::EventTicket => "eventTicket",
            PassKind::Generic => "generic",
            PassKind::StoreCard => "storeCard",
        }
    }
}

/// Display-group classification for pass fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Header,
    Primary,
    Secondary,
    Auxiliary,
    Back,
}

impl FieldType {
    /// Emission order of the groups inside the pass-kind object.
    pub const ORDER: [FieldType; 5] = [
        FieldType::Header,
        FieldType::Primary,
        FieldType::Secondary,
        FieldType::Auxiliary,
        FieldType::Back,
    ];

    /// Fixed JSON key for this group.
    pub fn json_key(self) -> &'static str {
        match self {
            FieldType::Header => "headerFields",
            FieldType::Primary => "primaryFields",
            FieldType::Secondary => "secondaryFields",
            FieldType::Auxiliary => "auxiliaryFields",
            FieldType::Back => "backFields",
        }
    }
}

/// Text alignment for a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlignment {
    #[serde(rename = "PKTextAlignmentLeft")]
    Left,
    #[serde(rename = "PKTextAlignmentCenter")]
    Center,
    #[serde(rename = "PKTextAlignmentRight")]
    Right,
    #[serde(rename = "PKTextAlignmentNatural")]
    Natural,
}

/// Date or time rendering style for a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateStyle {
    #[serde(rename = "PKDateStyleNone")]
    None,
    #[serde(rename = "PKDateStyleShort")]
    Short,
    #[serde(rename = "PKDateStyleMedium")]
    Medium,
    #[serde(rename = "PKDateStyleLong")]
    Long,
    #[serde(rename = "PKDateStyleFull")]
    Full,
}

/// A single label/value entry belonging to one field group.
///
/// Insertion order within a group is display order and is preserved
/// through serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributed_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<TextAlignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_style: Option<DateStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_style: Option<DateStyle>,
}

impl Field {
    /// Creates a field with just a key, label, and value.
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: impl Into<Value>) -> Self {
        Field {
            key: key.into(),
            label: Some(label.into()),
            value: value.into(),
            attributed_value: None,
            change_message: None,
            text_alignment: None,
            currency_code: None,
            date_style: None,
            time_style: None,
        }
    }
}

/// The pass's field groups, one ordered list per [`FieldType`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fields {
    pub header: Vec<Field>,
    pub primary: Vec<Field>,
    pub secondary: Vec<Field>,
    pub auxiliary: Vec<Field>,
    pub back: Vec<Field>,
}

impl Fields {
    pub fn group(&self, kind: FieldType) -> &[Field] {
        match kind {
            FieldType::Header => &self.header,
            FieldType::Primary => &self.primary,
            FieldType::Secondary => &self.secondary,
            FieldType::Auxiliary => &self.auxiliary,
            FieldType::Back => &self.back,
        }
    }

    /// Appends a field to the given group, preserving insertion order.
    pub fn add(&mut self, kind: FieldType, field: Field) {
        let group = match kind {
            FieldType::Header => &mut self.header,
            FieldType::Primary => &mut self.primary,
            FieldType::Secondary => &mut self.secondary,
            FieldType::Auxiliary => &mut self.auxiliary,
            FieldType::Back => &mut self.back,
        };
        group.push(field);
    }

    pub fn is_empty(&self) -> bool {
        FieldType::ORDER.iter().all(|t| self.group(*t).is_empty())
    }
}

/// Barcode symbology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarcodeFormat {
    #[serde(rename = "PKBarcodeFormatQR")]
    Qr,
    #[serde(rename = "PKBarcodeFormatPDF417")]
    Pdf417,
    #[serde(rename = "PKBarcodeFormatAztec")]
    Aztec,
    #[serde(rename = "PKBarcodeFormatCode128")]
    Code128,
}

/// Barcode displayed on the pass front.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barcode {
    pub format: BarcodeFormat,
    pub message: String,
    #[serde(default = "Barcode::default_encoding")]
    pub message_encoding: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl Barcode {
    pub fn new(format: BarcodeFormat, message: impl Into<String>) -> Self {
        Barcode {
            format,
            message: message.into(),
            message_encoding: Self::default_encoding(),
            alt_text: None,
        }
    }

    fn default_encoding() -> String {
        "iso-8859-1".to_string()
    }
}

/// Geographic location where the pass is relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_text: Option<String>,
}

/// The record packaged into a signed bundle.
///
/// Attribute declaration order here is the emission order of `pass.json`;
/// see [`descriptor`] for the full inclusion rules. Assets and
/// localizations never appear in the descriptor, they become separate
/// archive members.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    pub description: String,
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub organization_name: String,
    pub pass_type_identifier: String,
    pub serial_number: String,
    pub team_identifier: String,
    #[serde(default, rename = "webServiceURL")]
    pub web_service_url: Option<String>,
    #[serde(default)]
    pub authentication_token: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub foreground_color: Option<String>,
    #[serde(default)]
    pub label_color: Option<String>,
    #[serde(default)]
    pub logo_text: Option<String>,
    #[serde(default)]
    pub relevant_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub voided: Option<bool>,
    #[serde(default)]
    pub barcode: Option<Barcode>,
    #[serde(default)]
    pub barcodes: Vec<Barcode>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(rename = "type", default)]
    pub kind: PassKind,
    #[serde(default)]
    pub fields: Fields,
    #[serde(skip)]
    pub assets: AssetSet,
    #[serde(skip)]
    pub localizations: Vec<Localization>,
}

fn default_format_version() -> u32 {
    1
}

impl Pass {
    /// Creates a pass of the given style with `formatVersion` 1 and all
    /// optional attributes unset.
    pub fn new(kind: PassKind) -> Self {
        Pass {
            kind,
            ..Pass::default()
        }
    }
}

/// `formatVersion` is pinned to 1 in every construction path; a pass
/// that emits 0 is rejected by Wallet.
impl Default for Pass {
    fn default() -> Self {
        Pass {
            description: String::new(),
            format_version: 1,
            organization_name: String::new(),
            pass_type_identifier: String::new(),
            serial_number: String::new(),
            team_identifier: String::new(),
            web_service_url: None,
            authentication_token: None,
            background_color: None,
            foreground_color: None,
            label_color: None,
            logo_text: None,
            relevant_date: None,
            expiration_date: None,
            voided: None,
            barcode: None,
            barcodes: Vec::new(),
            locations: Vec::new(),
            kind: PassKind::default(),
            fields: Fields::default(),
            assets: AssetSet::default(),
            localizations: Vec::new(),
        }
    }
}
