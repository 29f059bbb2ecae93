//! Combining several questions into one request and splitting the answer

use super::schema::OutputSchema;
use serde_json::Value;

/// Field of the combined answer holding one entry per question
pub const ANSWERS_FIELD: &str = "answers";

/// Number the questions into one prompt.
///
/// `item_schema` describes the shape each individual answer must have.
///
/// # Example
///
/// ```
/// use quorum_domain::request::batch::compose_batch_prompt;
///
/// let prompt = compose_batch_prompt(&["What is 2+2?", "Capital of Peru?"], None);
/// assert!(prompt.contains("1. What is 2+2?"));
/// assert!(prompt.contains("2. Capital of Peru?"));
/// ```
pub fn compose_batch_prompt<S: AsRef<str>>(
    questions: &[S],
    item_schema: Option<&OutputSchema>,
) -> String {
    let mut prompt = format!(
        "Answer each of the following {} questions independently.\n\
         Put the answer to question i at position i of the \"{}\" array, in the same order.\n\n",
        questions.len(),
        ANSWERS_FIELD
    );
    for (i, question) in questions.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, question.as_ref().trim()));
    }
    prompt.push_str(&format!(
        "\nReply with a JSON object of the form {{\"{}\": [...]}} holding exactly {} elements.\n",
        ANSWERS_FIELD,
        questions.len()
    ));

    if let Some(schema) = item_schema {
        prompt.push_str(&format!(
            "\nEach element of \"{}\" must be a JSON object with these fields:\n",
            ANSWERS_FIELD
        ));
        for field in &schema.fields {
            prompt.push_str(&format!(
                "- \"{}\" ({}, {})\n",
                field.name,
                field.field_type,
                if field.required { "required" } else { "optional" }
            ));
        }
    }
    prompt
}

/// Split a combined answer by position.
///
/// Accepts `{"answers": [...]}` or a bare array. Positions that are
/// missing or `null` come back as `None`.
pub fn split_batch_answer(payload: &Value, count: usize) -> Vec<Option<Value>> {
    let items = match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get(ANSWERS_FIELD).and_then(Value::as_array),
        _ => None,
    };

    (0..count)
        .map(|i| {
            items
                .and_then(|items| items.get(i))
                .filter(|v| !v.is_null())
                .cloned()
        })
        .collect()
}
