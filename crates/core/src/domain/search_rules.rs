// Search Rules embedded in tenant tokens

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Index pattern that matches every index
pub const ALL_INDEXES: &str = "*";

/// Restriction applied to one index pattern
///
/// Serialized as `{}`, `{"filter": "..."}`, or the raw object for
/// server-defined extensions.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRule {
    Unrestricted,
    Filter(String),
    Custom(Map<String, Value>),
}

impl SearchRule {
    pub fn filter(expression: impl Into<String>) -> Self {
        SearchRule::Filter(expression.into())
    }
}

impl Serialize for SearchRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchRule::Unrestricted => serializer.serialize_map(Some(0))?.end(),
            SearchRule::Filter(expression) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("filter", expression)?;
                map.end()
            }
            SearchRule::Custom(object) => object.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SearchRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        if object.is_empty() {
            return Ok(SearchRule::Unrestricted);
        }
        if object.len() == 1 {
            if let Some(Value::String(expression)) = object.get("filter") {
                return Ok(SearchRule::Filter(expression.clone()));
            }
        }
        Ok(SearchRule::Custom(object))
    }
}

/// Mapping from index pattern to restriction
///
/// Keys serialize in sorted order so identical rules always produce the same
/// token payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchRules(BTreeMap<String, SearchRule>);

impl SearchRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules granting unrestricted search on every index
    pub fn all_indexes() -> Self {
        Self::new().with_index(ALL_INDEXES, SearchRule::Unrestricted)
    }

    pub fn with_index(mut self, pattern: impl Into<String>, rule: SearchRule) -> Self {
        self.0.insert(pattern.into(), rule);
        self
    }

    pub fn insert(&mut self, pattern: impl Into<String>, rule: SearchRule) {
        self.0.insert(pattern.into(), rule);
    }

    pub fn get(&self, pattern: &str) -> Option<&SearchRule> {
        self.0.get(pattern)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SearchRule)> {
        self.0.iter()
    }
}

impl FromIterator<(String, SearchRule)> for SearchRules {
    fn from_iter<T: IntoIterator<Item = (String, SearchRule)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_variants() {
        let mut custom = Map::new();
        custom.insert("filter".to_string(), json!("genre = horror"));
        custom.insert("limit".to_string(), json!(10));

        let rules = SearchRules::new()
            .with_index("*", SearchRule::Unrestricted)
            .with_index("books", SearchRule::filter("year > 2000"))
            .with_index("movies", SearchRule::Custom(custom));

        assert_eq!(
            serde_json::to_value(&rules).unwrap(),
            json!({
                "*": {},
                "books": {"filter": "year > 2000"},
                "movies": {"filter": "genre = horror", "limit": 10}
            })
        );
    }

    #[test]
    fn test_keys_are_sorted() {
        let rules = SearchRules::new()
            .with_index("zebra", SearchRule::Unrestricted)
            .with_index("alpha", SearchRule::Unrestricted);

        assert_eq!(
            serde_json::to_string(&rules).unwrap(),
            r#"{"alpha":{},"zebra":{}}"#
        );
    }

    #[test]
    fn test_deserialize_variants() {
        let rules: SearchRules = serde_json::from_value(json!({
            "*": {},
            "books": {"filter": "book_id > 1000"},
            "movies": {"filter": ["a", "b"]},
            "nulls": null
        }))
        .unwrap();

        assert_eq!(rules.len(), 4);
        assert_eq!(rules.get("*"), Some(&SearchRule::Unrestricted));
        assert_eq!(
            rules.get("books"),
            Some(&SearchRule::Filter("book_id > 1000".to_string()))
        );
        assert!(matches!(rules.get("movies"), Some(SearchRule::Custom(_))));
        assert_eq!(rules.get("nulls"), Some(&SearchRule::Unrestricted));
    }

    #[test]
    fn test_all_indexes() {
        let rules = SearchRules::all_indexes();
        assert!(!rules.is_empty());
        assert_eq!(rules.get(ALL_INDEXES), Some(&SearchRule::Unrestricted));
    }
}
