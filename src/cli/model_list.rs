//! Model listing
//!
//! Turns the raw body of a model-listing request into display lines. OpenWebUI
//! answers with a `data` array of `{name, id}` entries, Ollama with a `models`
//! array of `{name, model}` entries.

use serde_json::Value;

use crate::api::ModelEntry;
use crate::utils::report::Reporter;

const MISSING_FIELD: &str = "??";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelListing {
    Available(Vec<String>),
    Unavailable,
}

impl ModelListing {
    pub fn render(&self) -> String {
        match self {
            ModelListing::Available(lines) => {
                let mut out = String::from("Available Models:\n");
                for line in lines {
                    out.push('\t');
                    out.push_str(line);
                    out.push('\n');
                }
                out
            }
            ModelListing::Unavailable => "Feature not available.".to_string(),
        }
    }
}

#[derive(Clone, Copy)]
enum ListingShape {
    OpenWebUi,
    Ollama,
}

impl ListingShape {
    fn detect(body: &Value) -> Option<(ListingShape, &Vec<Value>)> {
        if let Some(entries) = body.get("data").and_then(Value::as_array) {
            return Some((ListingShape::OpenWebUi, entries));
        }
        body.get("models")
            .and_then(Value::as_array)
            .map(|entries| (ListingShape::Ollama, entries))
    }

    fn line(self, entry: &ModelEntry) -> String {
        let identifier = match self {
            ListingShape::OpenWebUi => &entry.id,
            ListingShape::Ollama => &entry.model,
        };
        format!(
            "{} - {}",
            field_text(entry.name.as_ref()),
            field_text(identifier.as_ref())
        )
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_FIELD.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Lines for every parseable entry. Entries that fail to parse are reported
/// and skipped.
pub fn format_models(body: Option<&Value>, reporter: &dyn Reporter) -> ModelListing {
    let Some((shape, entries)) = body.and_then(ListingShape::detect) else {
        return ModelListing::Unavailable;
    };

    let mut lines = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<ModelEntry>(entry.clone()) {
            Ok(parsed) => lines.push(shape.line(&parsed)),
            Err(err) => reporter.error(&format!("Error parsing model entry {index}: {err}")),
        }
    }
    ModelListing::Available(lines)
}
