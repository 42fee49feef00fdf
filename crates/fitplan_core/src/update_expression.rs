use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::records::{CREATED_AT_ATTRIBUTE, UPDATED_AT_ATTRIBUTE};

/// Ordered `SET` assignments for a partial record update.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    assignments: Vec<(String, Value)>,
}

impl FieldUpdate {
    /// Collects every non-null field except the key and the server-managed
    /// timestamps, then appends `updatedAt`. Attribute names are not
    /// validated.
    pub fn from_fields(fields: &Map<String, Value>, key_attribute: &str, updated_at: &str) -> Self {
        let mut assignments: Vec<(String, Value)> = fields
            .iter()
            .filter(|(name, value)| {
                !value.is_null()
                    && name.as_str() != key_attribute
                    && name.as_str() != CREATED_AT_ATTRIBUTE
                    && name.as_str() != UPDATED_AT_ATTRIBUTE
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        assignments.push((
            UPDATED_AT_ATTRIBUTE.to_string(),
            Value::String(updated_at.to_string()),
        ));

        Self { assignments }
    }

    pub fn assignments(&self) -> &[(String, Value)] {
        &self.assignments
    }

    /// `SET #f0 = :v0, #f1 = :v1, ...`
    pub fn expression(&self) -> String {
        let clauses: Vec<String> = (0..self.assignments.len())
            .map(|index| format!("#f{index} = :v{index}"))
            .collect();
        format!("SET {}", clauses.join(", "))
    }

    pub fn attribute_names(&self) -> BTreeMap<String, String> {
        self.assignments
            .iter()
            .enumerate()
            .map(|(index, (name, _))| (format!("#f{index}"), name.clone()))
            .collect()
    }

    pub fn attribute_values(&self) -> BTreeMap<String, &Value> {
        self.assignments
            .iter()
            .enumerate()
            .map(|(index, (_, value))| (format!(":v{index}"), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("fields must be an object")
    }

    #[test]
    fn skips_key_nulls_and_managed_timestamps() {
        let update = FieldUpdate::from_fields(
            &fields(json!({
                "userId": "user-1",
                "age": 34,
                "name": null,
                "createdAt": "forged",
                "updatedAt": "forged"
            })),
            "userId",
            "2026-01-02T00:00:00Z",
        );

        assert_eq!(
            update.assignments(),
            &[
                ("age".to_string(), json!(34)),
                ("updatedAt".to_string(), json!("2026-01-02T00:00:00Z")),
            ]
        );
    }

    #[test]
    fn renders_placeholders_for_every_assignment() {
        let update = FieldUpdate::from_fields(
            &fields(json!({"gender": "f", "customGoal": "marathon"})),
            "userId",
            "t1",
        );

        assert_eq!(update.expression(), "SET #f0 = :v0, #f1 = :v1, #f2 = :v2");
        let names: Vec<String> = update.attribute_names().into_values().collect();
        assert!(names.contains(&"gender".to_string()));
        assert!(names.contains(&"customGoal".to_string()));
        assert_eq!(
            update.attribute_names().get("#f2").map(String::as_str),
            Some("updatedAt")
        );
        assert_eq!(update.attribute_values().get(":v2"), Some(&&json!("t1")));
    }

    #[test]
    fn empty_input_still_refreshes_updated_at() {
        let update = FieldUpdate::from_fields(&Map::new(), "userId", "t9");
        assert_eq!(update.expression(), "SET #f0 = :v0");
        assert_eq!(update.assignments()[0].0, "updatedAt");
    }
}
