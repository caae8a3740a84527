use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A stored item, as returned by every `/items` endpoint.
///
/// Field names are camelCase on the wire (`createdAt`, `updatedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /items` and `PUT /items/{id}`.
///
/// Both fields are optional on the wire. A field holding anything other
/// than a JSON string deserializes as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// `{ "item": ... }`, returned by create and get.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEnvelope {
    pub item: Item,
}

/// `{ "items": [...] }`, returned by list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsEnvelope {
    #[serde(default)]
    pub items: Vec<Item>,
}

/// `{ "attributes": ... }`, returned by update with the full item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributesEnvelope {
    #[serde(default)]
    pub attributes: Option<Item>,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Health check response from `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Case-insensitive substring match of `term` against name or description.
///
/// `term` is trimmed first; an empty term matches everything.
pub fn matches_filter(item: &Item, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    item.name.to_lowercase().contains(&term)
        || item
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(&term)
}

/// Items passing [`matches_filter`], in their original order.
pub fn filter_items<'a>(items: &'a [Item], term: &str) -> Vec<&'a Item> {
    items.iter().filter(|item| matches_filter(item, term)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, description: Option<&str>) -> Item {
        let now = Utc::now();
        Item {
            id: format!("id-{}", name),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn item_serializes_camel_case_and_skips_missing_description() {
        let json = serde_json::to_value(item("A", None)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn item_timestamps_are_iso8601() {
        let json = r#"{
            "id": "abc",
            "name": "A",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z"
        }"#;
        let parsed: Item = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, "abc");
        assert_eq!(parsed.description, None);
        assert_eq!(parsed.created_at, parsed.updated_at);
    }

    #[test]
    fn payload_ignores_non_string_fields() {
        let parsed: ItemPayload =
            serde_json::from_str(r#"{"name": 42, "description": null, "extra": true}"#).unwrap();
        assert_eq!(parsed, ItemPayload::default());
    }

    #[test]
    fn payload_keeps_strings_untrimmed() {
        let parsed: ItemPayload =
            serde_json::from_str(r#"{"name": "  Lamp ", "description": ""}"#).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("  Lamp "));
        assert_eq!(parsed.description.as_deref(), Some(""));
    }

    #[test]
    fn payload_omits_absent_fields_when_serialized() {
        let payload = ItemPayload {
            name: Some("A".to_string()),
            description: None,
        };
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"name":"A"}"#);
    }

    #[test]
    fn items_envelope_defaults_to_empty() {
        let parsed: ItemsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn filter_matches_name_case_insensitively() {
        let items = vec![item("Apple", None), item("Banana", None)];
        let names: Vec<&str> = filter_items(&items, "an")
            .into_iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Banana"]);

        let names: Vec<&str> = filter_items(&items, "APP")
            .into_iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Apple"]);
    }

    #[test]
    fn filter_matches_description() {
        let items = vec![
            item("Lamp", Some("Brass desk lamp")),
            item("Chair", Some("Oak")),
        ];
        let matched = filter_items(&items, "brass");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Lamp");
    }

    #[test]
    fn blank_filter_keeps_everything() {
        let items = vec![item("Apple", None), item("Banana", None)];
        assert_eq!(filter_items(&items, "   ").len(), 2);
        assert_eq!(filter_items(&items, "").len(), 2);
    }
}
