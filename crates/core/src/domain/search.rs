// Search Request/Response Model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How query terms must match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchingStrategy {
    All,
    Last,
}

/// Body of `POST /indexes/{uid}/search`
///
/// Every field is optional; unset fields are omitted so the server applies
/// its own defaults. Leaving `q` unset performs a placeholder search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// String expression or nested array form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_retrieve: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_crop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_marker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_highlight: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_pre_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_post_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_matches_position: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_strategy: Option<MatchingStrategy>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            q: Some(query.into()),
            ..Self::default()
        }
    }

    /// Placeholder search (no query string)
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<Value>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = Some(sort.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_facets<I, S>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets = Some(facets.into_iter().map(Into::into).collect());
        self
    }
}

/// Search results
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub hits: Vec<Value>,
    #[serde(default)]
    pub estimated_total_hits: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub processing_time_ms: i64,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub facet_distribution: Option<BTreeMap<String, BTreeMap<String, i64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_request_is_empty_object() {
        let body = serde_json::to_value(SearchRequest::placeholder().with_limit(1)).unwrap();
        assert_eq!(body, json!({"limit": 1}));
    }

    #[test]
    fn test_request_field_names() {
        let mut request = SearchRequest::new("prince")
            .with_filter("book_id > 10")
            .with_sort(["title:asc"])
            .with_facets(["genre"]);
        request.attributes_to_crop = Some(vec!["title".to_string()]);
        request.crop_length = Some(5);
        request.show_matches_position = Some(true);
        request.matching_strategy = Some(MatchingStrategy::Last);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "q": "prince",
                "filter": "book_id > 10",
                "sort": ["title:asc"],
                "facets": ["genre"],
                "attributesToCrop": ["title"],
                "cropLength": 5,
                "showMatchesPosition": true,
                "matchingStrategy": "last"
            })
        );
    }

    #[test]
    fn test_response_with_facets() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": [{"book_id": 456, "title": "Le Petit Prince"}],
            "estimatedTotalHits": 2,
            "offset": 0,
            "limit": 20,
            "processingTimeMs": 1,
            "query": "prince",
            "facetDistribution": {"genre": {"fantasy": 1}}
        }))
        .unwrap();

        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.estimated_total_hits, 2);
        assert_eq!(response.facet_distribution.unwrap()["genre"]["fantasy"], 1);
    }
}
