//! Field-level validators for raw task output.
//!
//! Each helper takes the path of the value it inspects so errors can name the
//! exact field, e.g. `results[2].snippet`.

use crate::types::{
    ResearchDocument, ResearchSection, SearchHit, SearchResult, ValidationError,
};
use serde_json::{Map, Value};

type Fields = Map<String, Value>;

const ROOT: &str = "$";

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn field_path(parent: &str, key: &str) -> String {
    if parent == ROOT {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

fn mismatch(path: &str, expected: &str, found: &Value) -> ValidationError {
    ValidationError::new(
        path,
        format!("expected {}, found {}", expected, type_name(found)),
    )
}

fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Fields, ValidationError> {
    value.as_object().ok_or_else(|| mismatch(path, "object", value))
}

fn required<'a>(fields: &'a Fields, parent: &str, key: &str) -> Result<&'a Value, ValidationError> {
    fields
        .get(key)
        .ok_or_else(|| ValidationError::new(field_path(parent, key), "missing required field"))
}

fn string(fields: &Fields, parent: &str, key: &str) -> Result<String, ValidationError> {
    let value = required(fields, parent, key)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(&field_path(parent, key), "string", value))
}

fn array<'a>(fields: &'a Fields, parent: &str, key: &str) -> Result<&'a Vec<Value>, ValidationError> {
    let value = required(fields, parent, key)?;
    value
        .as_array()
        .ok_or_else(|| mismatch(&field_path(parent, key), "array", value))
}

fn count(fields: &Fields, parent: &str, key: &str) -> Result<usize, ValidationError> {
    let value = required(fields, parent, key)?;
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| mismatch(&field_path(parent, key), "non-negative integer", value))
}

fn search_hit(value: &Value, path: &str) -> Result<SearchHit, ValidationError> {
    let fields = object(value, path)?;
    Ok(SearchHit {
        title: string(fields, path, "title")?,
        url: string(fields, path, "url")?,
        snippet: string(fields, path, "snippet")?,
    })
}

fn section(value: &Value, path: &str) -> Result<ResearchSection, ValidationError> {
    let fields = object(value, path)?;
    Ok(ResearchSection {
        heading: string(fields, path, "heading")?,
        body: string(fields, path, "body")?,
    })
}

pub(crate) fn search_result(raw: &Value) -> Result<SearchResult, ValidationError> {
    let fields = object(raw, ROOT)?;
    let query = string(fields, ROOT, "query")?;

    let results = array(fields, ROOT, "results")?
        .iter()
        .enumerate()
        .map(|(i, hit)| search_hit(hit, &index_path("results", i)))
        .collect::<Result<Vec<_>, _>>()?;

    let total_results = count(fields, ROOT, "total_results")?;
    if total_results != results.len() {
        return Err(ValidationError::new(
            "total_results",
            format!(
                "expected {} to match the number of results, found {}",
                results.len(),
                total_results
            ),
        ));
    }

    Ok(SearchResult {
        query,
        results,
        total_results,
    })
}

pub(crate) fn research_document(raw: &Value) -> Result<ResearchDocument, ValidationError> {
    let fields = object(raw, ROOT)?;
    let title = string(fields, ROOT, "title")?;

    let sections = array(fields, ROOT, "sections")?
        .iter()
        .enumerate()
        .map(|(i, s)| section(s, &index_path("sections", i)))
        .collect::<Result<Vec<_>, _>>()?;

    let references = array(fields, ROOT, "references")?
        .iter()
        .enumerate()
        .map(|(i, r)| {
            r.as_str()
                .map(str::to_string)
                .ok_or_else(|| mismatch(&index_path("references", i), "string", r))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let summary = string(fields, ROOT, "summary")?;

    Ok(ResearchDocument {
        title,
        sections,
        references,
        summary,
    })
}
