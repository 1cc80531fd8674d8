//! Maps integration records onto the local cat shape.

use serde_json::Value;

use crate::models::{Cat, RemoteCat};

/// Builds the local [`Cat`] for one remote record.
///
/// Never fails. A record without a usable `id` gets an empty `external_id`,
/// which the repository rejects at write time.
pub fn transform(remote: &RemoteCat) -> Cat {
    Cat {
        external_id: identifier(remote.get("id")).unwrap_or_default(),
        name: text(remote.get("name")),
        breed: text(remote.get("breed")),
        color: text(remote.get("color")),
    }
}

pub fn transform_all(remote: &[RemoteCat]) -> Vec<Cat> {
    remote.iter().map(transform).collect()
}

// The integration sends ids as strings, but numeric ids show up in older tenants.
fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn remote(value: Value) -> RemoteCat {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_transform_selects_tracked_fields() {
        let cat = transform(&remote(json!({
            "id": "1",
            "name": "Tom",
            "breed": "Maine Coon",
            "color": "grey",
            "weight": 7.5,
            "owner": {"id": "9"}
        })));

        assert_eq!(
            cat,
            Cat::new("1")
                .with_name("Tom")
                .with_breed("Maine Coon")
                .with_color("grey")
        );
    }

    #[test]
    fn test_transform_missing_id_yields_empty_identifier() {
        let cat = transform(&remote(json!({"name": "Nameless"})));
        assert_eq!(cat.external_id, "");
        assert_eq!(cat.name.as_deref(), Some("Nameless"));
    }

    #[test]
    fn test_transform_null_and_missing_fields() {
        let cat = transform(&remote(json!({"id": "3", "name": null})));
        assert_eq!(cat.external_id, "3");
        assert!(cat.name.is_none());
        assert!(cat.breed.is_none());
        assert!(cat.color.is_none());
    }

    #[test]
    fn test_transform_numeric_id() {
        let cat = transform(&remote(json!({"id": 1024, "name": "Felix"})));
        assert_eq!(cat.external_id, "1024");
    }

    #[test]
    fn test_transform_ignores_non_string_attributes() {
        let cat = transform(&remote(json!({"id": "4", "name": 12, "color": ["black"]})));
        assert!(cat.name.is_none());
        assert!(cat.color.is_none());
    }

    #[test]
    fn test_transform_all_keeps_order() {
        let cats = transform_all(&[
            remote(json!({"id": "b"})),
            remote(json!({"id": "a"})),
        ]);
        let ids: Vec<_> = cats.iter().map(|c| c.external_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
