use std::any::TypeId;

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{PlannerError, Result},
    schemas::{schema_type_name, CompletionSchema, SchemaHandle},
    types::ItineraryDocument,
};

const MAX_SCHEMA_ERRORS: usize = 3;
/// Repair never scans past this many bytes of backend output.
const MAX_REPAIR_SCAN_BYTES: usize = 512 * 1024;

/// Validates raw backend output against the itinerary schema.
///
/// Purely structural: a malformed payload gets one bounded repair attempt
/// (extracting the first balanced JSON object from surrounding prose), and
/// content is never invented or corrected.
#[derive(Debug, Clone)]
pub struct DocumentValidator {
    schema: &'static SchemaHandle,
    expected_days: Option<u32>,
}

impl Default for DocumentValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentValidator {
    pub fn new() -> Self {
        Self {
            schema: ItineraryDocument::schema(),
            expected_days: None,
        }
    }

    /// Require `days` to cover exactly `1..=days` in order.
    pub fn with_expected_days(mut self, days: u32) -> Self {
        self.expected_days = Some(days);
        self
    }

    pub fn schema(&self) -> &'static SchemaHandle {
        self.schema
    }

    /// Validate a raw backend payload, repairing once if it is not directly
    /// parseable JSON.
    pub fn validate_str(&self, raw: &str) -> Result<ItineraryDocument> {
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(parse_err) => {
                debug!(
                    target: "nile::validator",
                    error = %parse_err,
                    "payload not directly parseable, attempting balanced-object extraction"
                );
                let candidate = extract_balanced_object(raw).ok_or_else(|| {
                    PlannerError::SchemaViolation(format!(
                        "response is not JSON and contains no balanced object: {parse_err}"
                    ))
                })?;
                serde_json::from_str::<Value>(candidate).map_err(|err| {
                    PlannerError::SchemaViolation(format!(
                        "extracted object is still unparseable: {err}"
                    ))
                })?
            }
        };
        self.validate_value(&value)
    }

    /// Validate an already-parsed payload.
    pub fn validate_value(&self, value: &Value) -> Result<ItineraryDocument> {
        self.check_schema(value)?;
        self.check_days(value)?;
        deserialize_document(value, self.schema)
    }

    fn check_schema(&self, payload: &Value) -> Result<()> {
        let validator = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(self.schema.schema_json())
            .map_err(|err| {
                PlannerError::Config(format!(
                    "failed to prepare `{}` schema for validation: {}",
                    self.schema.schema_name(),
                    err
                ))
            })?;

        if let Err(errors) = validator.validate(payload) {
            let mut details = Vec::new();
            let mut truncated = false;

            for (idx, error) in errors.enumerate() {
                if idx < MAX_SCHEMA_ERRORS {
                    let mut path = error.instance_path.to_string();
                    if path.is_empty() {
                        path = "<root>".to_string();
                    }
                    details.push(format!("{}: {}", path, error));
                } else {
                    truncated = true;
                    break;
                }
            }

            let mut detail_str = if details.is_empty() {
                "payload failed schema validation".to_string()
            } else {
                details.join("; ")
            };

            if truncated {
                detail_str.push_str("; additional errors truncated");
            }

            return Err(PlannerError::SchemaViolation(format!(
                "payload does not match `{}` schema: {}",
                self.schema.schema_name(),
                detail_str
            )));
        }

        Ok(())
    }

    /// Day entries must be non-empty, each with at least one activity, and
    /// numbered 1..N in order. A wrong count is a failure, never patched.
    fn check_days(&self, payload: &Value) -> Result<()> {
        let days = payload
            .get("days")
            .and_then(Value::as_array)
            .ok_or_else(|| PlannerError::SchemaViolation("`days` is missing".to_string()))?;

        if days.is_empty() {
            return Err(PlannerError::SchemaViolation(
                "`days` must contain at least one entry".to_string(),
            ));
        }

        for (idx, entry) in days.iter().enumerate() {
            let number = entry.get("day").and_then(Value::as_u64).ok_or_else(|| {
                PlannerError::SchemaViolation(format!("days[{idx}] has no integer `day`"))
            })?;
            if number != idx as u64 + 1 {
                return Err(PlannerError::SchemaViolation(format!(
                    "day numbers must ascend from 1; days[{idx}] is numbered {number}"
                )));
            }
            let activities = entry.get("activities").and_then(Value::as_array);
            if activities.map_or(true, |a| a.is_empty()) {
                return Err(PlannerError::SchemaViolation(format!(
                    "days[{idx}] must list at least one activity"
                )));
            }
        }

        if let Some(expected) = self.expected_days {
            if days.len() as u32 != expected {
                return Err(PlannerError::SchemaViolation(format!(
                    "itinerary covers {} days, expected {expected}",
                    days.len()
                )));
            }
        }

        Ok(())
    }
}

/// Deserialize a schema-checked payload, reporting the exact failing path.
/// The handle's type identity must match the target type; a handle built for
/// some other type is a wiring error, not a backend failure.
fn deserialize_document(payload: &Value, schema: &SchemaHandle) -> Result<ItineraryDocument> {
    if schema.type_id() != TypeId::of::<ItineraryDocument>() {
        return Err(PlannerError::Config(format!(
            "schema `{}` describes `{}`, not `{}`",
            schema.schema_name(),
            schema.type_name(),
            schema_type_name::<ItineraryDocument>()
        )));
    }
    let raw = payload.to_string();
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::SchemaViolation(format!(
            "failed to deserialize `{}` at {}: {}",
            schema.schema_name(),
            location,
            err
        ))
    })
}

/// Find the first balanced top-level `{...}` in `raw`, honouring strings and
/// escapes. Returns `None` when no complete object exists in the scanned
/// window.
fn extract_balanced_object(raw: &str) -> Option<&str> {
    let window = if raw.len() > MAX_REPAIR_SCAN_BYTES {
        // Cut on a char boundary so the scan below stays valid UTF-8.
        let mut end = MAX_REPAIR_SCAN_BYTES;
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        &raw[..end]
    } else {
        raw
    };

    let start = window.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in window[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&window[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
