//! Entry data model and `details` normalization.

use serde::Deserialize;
use serde_json::Value;

/// A site address as stored by the backend: either free text to be
/// geocoded, or a structured object that may carry coordinates directly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Text(String),
    Structured(Value),
}

/// One historical site, normalized from the backend's wire shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub blurb: Option<String>,
    pub description: Option<String>,
    pub address: Option<Address>,
}

/// The raw `{id, name, details}` shape the backend serves.
#[derive(Debug, Deserialize)]
pub(crate) struct WireEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub details: Value,
}

impl Entry {
    pub(crate) fn from_wire(wire: WireEntry) -> Self {
        // Key precedence matches what the site pages already expect;
        // the first present key wins when several are set.
        let blurb = first_string(&wire.details, &["short_blurb", "blurb", "description"]);
        let description = first_string(&wire.details, &["description", "long_description"]);
        let address = wire.details.get("address").and_then(|value| match value {
            Value::String(text) => Some(Address::Text(text.clone())),
            Value::Object(_) => Some(Address::Structured(value.clone())),
            _ => None,
        });

        Self {
            id: wire.id,
            name: wire.name,
            blurb,
            description,
            address,
        }
    }
}

fn first_string(details: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| details.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(details: Value) -> WireEntry {
        WireEntry {
            id: 7,
            name: "Site".to_string(),
            details,
        }
    }

    #[test]
    fn short_blurb_wins_over_blurb_and_description() {
        let entry = Entry::from_wire(wire(json!({
            "short_blurb": "short",
            "blurb": "medium",
            "description": "long",
        })));
        assert_eq!(entry.blurb.as_deref(), Some("short"));
        assert_eq!(entry.description.as_deref(), Some("long"));
    }

    #[test]
    fn description_falls_back_to_long_description() {
        let entry = Entry::from_wire(wire(json!({ "long_description": "the long one" })));
        assert_eq!(entry.blurb, None);
        assert_eq!(entry.description.as_deref(), Some("the long one"));
    }

    #[test]
    fn blurb_falls_back_to_description() {
        let entry = Entry::from_wire(wire(json!({ "description": "only this" })));
        assert_eq!(entry.blurb.as_deref(), Some("only this"));
    }

    #[test]
    fn text_address_is_kept_as_text() {
        let entry = Entry::from_wire(wire(json!({ "address": "600 Peachtree St NE" })));
        assert_eq!(
            entry.address,
            Some(Address::Text("600 Peachtree St NE".to_string()))
        );
    }

    #[test]
    fn object_address_is_kept_structured() {
        let entry = Entry::from_wire(wire(json!({ "address": { "lat": 33.7, "lng": -84.4 } })));
        match entry.address {
            Some(Address::Structured(value)) => assert_eq!(value["lat"], json!(33.7)),
            other => panic!("unexpected address: {other:?}"),
        }
    }

    #[test]
    fn missing_details_produce_empty_entry() {
        let entry = Entry::from_wire(wire(Value::Null));
        assert_eq!(entry.blurb, None);
        assert_eq!(entry.description, None);
        assert_eq!(entry.address, None);
    }
}
