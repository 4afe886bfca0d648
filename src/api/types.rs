// Hub API response types.
// Defines structs for deserializing the JSON the hub serves to the page.

use serde::{Deserialize, Deserializer, Serialize};

/// A role or organization the signed-in user may switch into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOption {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

impl RoleOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Primary keys arrive as integers from some endpoints and strings from others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id() {
        let roles: Vec<RoleOption> =
            serde_json::from_str(r#"[{"id": "1", "name": "Org A"}]"#).unwrap();
        assert_eq!(roles, vec![RoleOption::new("1", "Org A")]);
    }

    #[test]
    fn test_integer_id_and_extra_fields() {
        let roles: Vec<RoleOption> = serde_json::from_str(
            r#"[{"id": 42, "name": "Jane Doe", "user_id": 3, "is_organization": false}]"#,
        )
        .unwrap();
        assert_eq!(roles[0].id, "42");
        assert_eq!(roles[0].name, "Jane Doe");
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let result: Result<Vec<RoleOption>, _> = serde_json::from_str(r#"[{"id": 1}]"#);
        assert!(result.is_err());
    }
}
