//! Decoding and validation of drink payloads
//!
//! Request bodies arrive as arbitrary JSON. [`decode`] checks every writable
//! field and either yields [`DrinkFields`] or collects one message per failing
//! field into [`ValidationErrors`], which is returned to clients verbatim.

use crate::drink::DrinkFields;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Maximum length of `name`, in characters
pub const NAME_MAX_LENGTH: usize = 200;
/// Maximum length of `description`, in characters
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

/// Key used for errors that are not tied to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

pub const REQUIRED: &str = "This field is required.";
pub const NULL: &str = "This field may not be null.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const BLANK: &str = "This field may not be blank.";

/// Field name to error messages, serialized as a JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of the failing fields, sorted
    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Decode a request body into validated drink fields
///
/// `id` and unknown keys are ignored.
pub fn decode(body: &Value) -> Result<DrinkFields, ValidationErrors> {
    let object = match body {
        Value::Object(object) => object,
        other => {
            let mut errors = ValidationErrors::new();
            errors.add(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected an object, but got {}.",
                    json_kind(other)
                ),
            );
            return Err(errors);
        }
    };

    let mut errors = ValidationErrors::new();
    let name = string_field(object, "name", NAME_MAX_LENGTH, &mut errors);
    let description = string_field(object, "description", DESCRIPTION_MAX_LENGTH, &mut errors);

    match (name, description) {
        (Some(name), Some(description)) if errors.is_empty() => {
            Ok(DrinkFields { name, description })
        }
        _ => Err(errors),
    }
}

/// Re-check fields that did not come through [`decode`], such as config seeds
pub fn validate(fields: &DrinkFields) -> Result<DrinkFields, ValidationErrors> {
    let mut object = Map::new();
    object.insert("name".to_string(), Value::String(fields.name.clone()));
    object.insert(
        "description".to_string(),
        Value::String(fields.description.clone()),
    );
    decode(&Value::Object(object))
}

fn string_field(
    object: &Map<String, Value>,
    field: &str,
    max_length: usize,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let raw = match object.get(field) {
        None => {
            errors.add(field, REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, NULL);
            return None;
        }
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.add(field, NOT_A_STRING);
            return None;
        }
    };

    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if value.chars().count() > max_length {
        errors.add(
            field,
            format!("Ensure this field has no more than {max_length} characters."),
        );
        return None;
    }

    Some(value.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
