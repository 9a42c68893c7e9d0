//! Output Schemas and the Validation Gate
//!
//! Every task output passes through [`SchemaKind::validate`] exactly once
//! before it is placed into the result map. Validation is strict about the
//! declared fields and lenient about everything else:
//!
//! - required fields must be present and of the declared type
//! - unknown extra fields are ignored
//! - `total_results` must agree with the length of `results`
//!
//! ```ignore
//! let output = SchemaKind::SearchResult.validate(&raw)?;
//! assert_eq!(output.as_search().unwrap().total_results, 2);
//! ```

mod validate;

use crate::types::{NodeOutput, ResearchDocument, SearchResult, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The declared shape of a node's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    SearchResult,
    ResearchDocument,
}

impl SchemaKind {
    pub fn name(self) -> &'static str {
        match self {
            SchemaKind::SearchResult => "SearchResult",
            SchemaKind::ResearchDocument => "ResearchDocument",
        }
    }

    /// Check `raw` against this schema and coerce it into a typed output.
    pub fn validate(self, raw: &Value) -> Result<NodeOutput, ValidationError> {
        match self {
            SchemaKind::SearchResult => validate::search_result(raw).map(NodeOutput::Search),
            SchemaKind::ResearchDocument => {
                validate::research_document(raw).map(NodeOutput::Research)
            }
        }
    }

    /// JSON Schema for this output, used when asking an LLM for structured output.
    pub fn json_schema(self) -> Value {
        let schema = match self {
            SchemaKind::SearchResult => schemars::schema_for!(SearchResult),
            SchemaKind::ResearchDocument => schemars::schema_for!(ResearchDocument),
        };
        serde_json::to_value(schema).unwrap_or(Value::Null)
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn valid_search() -> Value {
        json!({
            "query": "rust async",
            "results": [
                {"title": "Tokio", "url": "https://tokio.rs", "snippet": "runtime"},
                {"title": "Async book", "url": "https://rust-lang.github.io/async-book", "snippet": "guide"}
            ],
            "total_results": 2
        })
    }

    fn valid_document() -> Value {
        json!({
            "title": "Async Rust",
            "sections": [{"heading": "Runtimes", "body": "Tokio dominates."}],
            "references": ["https://tokio.rs"],
            "summary": "Short summary."
        })
    }

    #[test]
    fn test_valid_search_result() {
        let output = SchemaKind::SearchResult.validate(&valid_search()).unwrap();
        let result = output.as_search().unwrap();
        assert_eq!(result.query, "rust async");
        assert_eq!(result.total_results, 2);
        assert_eq!(result.results[1].title, "Async book");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut raw = valid_search();
        raw["provider"] = json!("duckduckgo");
        raw["results"][0]["rank"] = json!(1);
        assert!(SchemaKind::SearchResult.validate(&raw).is_ok());
    }

    #[test]
    fn test_valid_research_document() {
        let output = SchemaKind::ResearchDocument
            .validate(&valid_document())
            .unwrap();
        let document = output.as_document().unwrap();
        assert_eq!(document.sections.len(), 1);
        assert_eq!(document.references, vec!["https://tokio.rs".to_string()]);
    }

    #[rstest]
    #[case::missing_query(json!({"results": [], "total_results": 0}), "query")]
    #[case::query_wrong_type(json!({"query": 7, "results": [], "total_results": 0}), "query")]
    #[case::results_not_array(json!({"query": "q", "results": {}, "total_results": 0}), "results")]
    #[case::hit_missing_url(
        json!({"query": "q", "results": [{"title": "t", "snippet": "s"}], "total_results": 1}),
        "results[0].url"
    )]
    #[case::hit_not_object(json!({"query": "q", "results": ["x"], "total_results": 1}), "results[0]")]
    #[case::negative_count(json!({"query": "q", "results": [], "total_results": -1}), "total_results")]
    #[case::count_mismatch(json!({"query": "q", "results": [], "total_results": 3}), "total_results")]
    #[case::root_not_object(json!("just text"), "$")]
    fn test_invalid_search_result(#[case] raw: Value, #[case] path: &str) {
        let err = SchemaKind::SearchResult.validate(&raw).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[rstest]
    #[case::missing_summary(json!({"title": "t", "sections": [], "references": []}), "summary")]
    #[case::section_missing_body(
        json!({"title": "t", "sections": [{"heading": "h"}], "references": [], "summary": "s"}),
        "sections[0].body"
    )]
    #[case::reference_not_string(
        json!({"title": "t", "sections": [], "references": ["a", 2], "summary": "s"}),
        "references[1]"
    )]
    #[case::title_null(json!({"title": null, "sections": [], "references": [], "summary": "s"}), "title")]
    fn test_invalid_research_document(#[case] raw: Value, #[case] path: &str) {
        let err = SchemaKind::ResearchDocument.validate(&raw).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn test_search_output_fails_document_schema() {
        let err = SchemaKind::ResearchDocument
            .validate(&valid_search())
            .unwrap_err();
        assert_eq!(err.path, "title");
        assert_eq!(err.message, "missing required field");
    }

    #[test]
    fn test_json_schema_lists_properties() {
        let schema = SchemaKind::ResearchDocument.json_schema();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["title", "sections", "references", "summary"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
    }
}
