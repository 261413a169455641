//! `pass.json` descriptor serialization.
//!
//! The descriptor is built from an explicit, ordered attribute table
//! instead of reflecting over the record: each entry names its JSON key
//! and an extractor that returns `None` to omit the attribute. The rules
//! the table encodes:
//!
//! - the `type` discriminant and the localizations never appear as
//!   attributes of their own,
//! - unset optional attributes are omitted,
//! - assets are omitted (they become separate archive members),
//! - empty list attributes are omitted,
//! - the field groups are nested under the pass-kind key, each group
//!   renamed via [`FieldType::json_key`] and empty groups dropped.
//!
//! Output key order is the table order, which matches [`Pass`]'s declared
//! attribute order.

use serde_json::{json, Map, Value};

use super::{FieldType, Pass};
use crate::Result;

type Extract = fn(&Pass) -> Option<Value>;

enum Entry {
    /// Plain attribute emitted under its own key when the extractor
    /// returns a value.
    Attr(&'static str, Extract),
    /// The field groups, emitted under the pass-kind key in this
    /// position.
    FieldGroups,
}

const DESCRIPTOR: &[Entry] = &[
    Entry::Attr("description", |p| Some(json!(p.description))),
    Entry::Attr("formatVersion", |p| Some(json!(p.format_version))),
    Entry::Attr("organizationName", |p| Some(json!(p.organization_name))),
    Entry::Attr("passTypeIdentifier", |p| Some(json!(p.pass_type_identifier))),
    Entry::Attr("serialNumber", |p| Some(json!(p.serial_number))),
    Entry::Attr("teamIdentifier", |p| Some(json!(p.team_identifier))),
    Entry::Attr("webServiceURL", |p| p.web_service_url.as_ref().map(|v| json!(v))),
    Entry::Attr("authenticationToken", |p| {
        p.authentication_token.as_ref().map(|v| json!(v))
    }),
    Entry::Attr("backgroundColor", |p| p.background_color.as_ref().map(|v| json!(v))),
    Entry::Attr("foregroundColor", |p| p.foreground_color.as_ref().map(|v| json!(v))),
    Entry::Attr("labelColor", |p| p.label_color.as_ref().map(|v| json!(v))),
    Entry::Attr("logoText", |p| p.logo_text.as_ref().map(|v| json!(v))),
    Entry::Attr("relevantDate", |p| p.relevant_date.as_ref().map(|v| json!(v))),
    Entry::Attr("expirationDate", |p| p.expiration_date.as_ref().map(|v| json!(v))),
    Entry::Attr("voided", |p| p.voided.map(|v| json!(v))),
    Entry::Attr("barcode", |p| p.barcode.as_ref().map(|v| json!(v))),
    Entry::Attr("barcodes", |p| (!p.barcodes.is_empty()).then(|| json!(p.barcodes))),
    Entry::Attr("locations", |p| (!p.locations.is_empty()).then(|| json!(p.locations))),
    Entry::FieldGroups,
];

/// Serializes the pass descriptor to its `pass.json` bytes.
pub fn to_json(pass: &Pass) -> Result<Vec<u8>> {
    let mut root = Map::new();
    for entry in DESCRIPTOR {
        match entry {
            Entry::Attr(key, extract) => {
                if let Some(value) = extract(pass) {
                    root.insert((*key).to_string(), value);
                }
            }
            Entry::FieldGroups => {
                root.insert(pass.kind.key().to_string(), field_groups(pass));
            }
        }
    }
    Ok(serde_json::to_vec(&Value::Object(root))?)
}

fn field_groups(pass: &Pass) -> Value {
    let mut groups = Map::new();
    for kind in FieldType::ORDER {
        let fields = pass.fields.group(kind);
        if !fields.is_empty() {
            groups.insert(kind.json_key().to_string(), json!(fields));
        }
    }
    Value::Object(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::{Asset, Field, PassKind};

    fn sample_pass(kind: PassKind) -> Pass {
        Pass {
            description: "Test pass".into(),
            organization_name: "Example Org".into(),
            pass_type_identifier: "pass.com.example.test".into(),
            serial_number: "12345".into(),
            team_identifier: "ABCDE12345".into(),
            ..Pass::new(kind)
        }
    }

    fn parse(pass: &Pass) -> Value {
        serde_json::from_slice(&to_json(pass).unwrap()).unwrap()
    }

    #[test]
    fn minimal_pass_emits_required_attributes_only() {
        let json = parse(&sample_pass(PassKind::Generic));
        let obj = json.as_object().unwrap();

        assert_eq!(obj["description"], "Test pass");
        assert_eq!(obj["formatVersion"], 1);
        assert_eq!(obj["serialNumber"], "12345");
        assert!(obj.contains_key("generic"));
        // 6 required attributes plus the kind key
        assert_eq!(obj.len(), 7);
    }

    #[test]
    fn default_constructed_pass_emits_format_version_one() {
        let json = parse(&Pass::default());
        assert_eq!(json.as_object().unwrap()["formatVersion"], 1);
    }

    #[test]
    fn no_type_tag_or_localizations_attribute() {
        let mut pass = sample_pass(PassKind::Coupon);
        pass.localizations
            .push(crate::pass::Localization::new("fr").string("a", "b"));

        let json = parse(&pass);
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("type"));
        assert!(!obj.contains_key("kind"));
        assert!(!obj.contains_key("localizations"));
        assert!(obj.contains_key("coupon"));
    }

    #[test]
    fn omits_null_optionals_empty_lists_and_assets() {
        let mut pass = sample_pass(PassKind::Generic);
        pass.logo_text = None;
        pass.locations = Vec::new();
        pass.assets.icon = Some(Asset::new(b"PNG".to_vec()));

        let json = parse(&pass);
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("logoText"));
        assert!(!obj.contains_key("locations"));
        assert!(!obj.contains_key("icon"));
        assert!(!obj.contains_key("assets"));
    }

    #[test]
    fn present_optionals_are_emitted() {
        let mut pass = sample_pass(PassKind::StoreCard);
        pass.logo_text = Some("My Store".into());
        pass.voided = Some(false);
        pass.locations.push(crate::pass::Location {
            latitude: 52.37,
            longitude: 4.89,
            altitude: None,
            relevant_text: Some("Welcome".into()),
        });

        let json = parse(&pass);
        let obj = json.as_object().unwrap();
        assert_eq!(obj["logoText"], "My Store");
        assert_eq!(obj["voided"], false);
        assert_eq!(obj["locations"][0]["latitude"], 52.37);
        assert_eq!(obj["locations"][0]["relevantText"], "Welcome");
        assert!(!obj["locations"][0].as_object().unwrap().contains_key("altitude"));
    }

    #[test]
    fn boarding_pass_field_groups_nest_under_kind_key() {
        let mut pass = sample_pass(PassKind::BoardingPass);
        pass.fields.add(FieldType::Primary, Field::new("origin", "Origin", "AMS"));
        pass.fields.add(FieldType::Primary, Field::new("destination", "Destination", "SFO"));
        pass.fields.add(FieldType::Back, Field::new("terms", "Terms", "No refunds"));

        let json = parse(&pass);
        let groups = json["boardingPass"].as_object().unwrap();

        let primary = groups["primaryFields"].as_array().unwrap();
        assert_eq!(primary.len(), 2);
        assert_eq!(primary[0]["key"], "origin");
        assert_eq!(primary[1]["key"], "destination");
        assert_eq!(groups["backFields"].as_array().unwrap().len(), 1);
        assert!(!groups.contains_key("headerFields"));
        assert!(!groups.contains_key("secondaryFields"));
        assert!(!groups.contains_key("auxiliaryFields"));
    }

    #[test]
    fn attribute_order_matches_declared_order() {
        let mut pass = sample_pass(PassKind::Generic);
        pass.logo_text = Some("Logo".into());

        let json = parse(&pass);
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "description",
                "formatVersion",
                "organizationName",
                "passTypeIdentifier",
                "serialNumber",
                "teamIdentifier",
                "logoText",
                "generic",
            ]
        );
    }
}
