//! Tool Parameter Schema
//!
//! Hand-rolled JSON-schema subset used to describe and validate tool
//! inputs. Providers receive the serialized schema alongside the tool name
//! and description; the executor validates raw LLM-supplied arguments
//! against it before any handler runs.
//!
//! Whether a tool mutates canvas state is part of its definition
//! (`modifies_canvas`), so the broadcast decision is a data property of the
//! registry rather than a second hand-maintained set of tool names.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// JSON schema fragment for a tool parameter (or the whole input object).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, ParameterSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterSchema>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParameterSchema {
    /// Create a string schema
    pub fn string(description: Option<&str>) -> Self {
        Self {
            schema_type: "string".to_string(),
            description: description.map(|s| s.to_string()),
            properties: None,
            required: None,
            items: None,
            enum_values: None,
            default: None,
        }
    }

    /// Create a string schema restricted to a fixed set of values
    pub fn string_enum(description: Option<&str>, values: &[&str]) -> Self {
        let mut schema = Self::string(description);
        schema.enum_values = Some(values.iter().map(|s| s.to_string()).collect());
        schema
    }

    /// Create an integer schema
    pub fn integer(description: Option<&str>) -> Self {
        Self {
            schema_type: "integer".to_string(),
            description: description.map(|s| s.to_string()),
            properties: None,
            required: None,
            items: None,
            enum_values: None,
            default: None,
        }
    }

    /// Create a number schema
    pub fn number(description: Option<&str>) -> Self {
        Self {
            schema_type: "number".to_string(),
            description: description.map(|s| s.to_string()),
            properties: None,
            required: None,
            items: None,
            enum_values: None,
            default: None,
        }
    }

    /// Create a boolean schema
    pub fn boolean(description: Option<&str>) -> Self {
        Self {
            schema_type: "boolean".to_string(),
            description: description.map(|s| s.to_string()),
            properties: None,
            required: None,
            items: None,
            enum_values: None,
            default: None,
        }
    }

    /// Create an object schema
    pub fn object(
        description: Option<&str>,
        properties: HashMap<String, ParameterSchema>,
        required: Vec<String>,
    ) -> Self {
        Self {
            schema_type: "object".to_string(),
            description: description.map(|s| s.to_string()),
            properties: Some(properties),
            required: Some(required),
            items: None,
            enum_values: None,
            default: None,
        }
    }

    /// Create an array schema
    pub fn array(description: Option<&str>, items: ParameterSchema) -> Self {
        Self {
            schema_type: "array".to_string(),
            description: description.map(|s| s.to_string()),
            properties: None,
            required: None,
            items: Some(Box::new(items)),
            enum_values: None,
            default: None,
        }
    }

    /// Validate raw arguments against this schema.
    ///
    /// Checks that the input is an object (for object schemas), that every
    /// required field is present, and that each supplied field matches its
    /// declared primitive type and enum restriction. Every offending field
    /// is reported; the caller gets the full list in one pass.
    pub fn validate(&self, args: &Value) -> Result<(), Vec<SchemaViolation>> {
        let mut violations = Vec::new();

        if self.schema_type == "object" {
            let obj = match args.as_object() {
                Some(obj) => obj,
                None => {
                    violations.push(SchemaViolation {
                        field: "(input)".to_string(),
                        message: "expected a JSON object".to_string(),
                    });
                    return Err(violations);
                }
            };

            if let Some(required) = &self.required {
                for field in required {
                    if !obj.contains_key(field) {
                        violations.push(SchemaViolation {
                            field: field.clone(),
                            message: "missing required field".to_string(),
                        });
                    }
                }
            }

            if let Some(properties) = &self.properties {
                for (field, value) in obj {
                    if let Some(prop_schema) = properties.get(field) {
                        if let Some(message) = prop_schema.check_value(value) {
                            violations.push(SchemaViolation {
                                field: field.clone(),
                                message,
                            });
                        }
                    }
                    // Unknown fields are tolerated; providers sometimes add extras.
                }
            }
        } else if let Some(message) = self.check_value(args) {
            violations.push(SchemaViolation {
                field: "(input)".to_string(),
                message,
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Check a single value against this schema's type and enum restriction.
    fn check_value(&self, value: &Value) -> Option<String> {
        let type_ok = match self.schema_type.as_str() {
            "string" => value.is_string(),
            "integer" => value.is_i64() || value.is_u64(),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "array" => value.is_array(),
            "object" => value.is_object(),
            _ => true,
        };
        if !type_ok {
            return Some(format!("expected {}", self.schema_type));
        }

        if let Some(allowed) = &self.enum_values {
            if let Some(s) = value.as_str() {
                if !allowed.iter().any(|v| v == s) {
                    return Some(format!("must be one of: {}", allowed.join(", ")));
                }
            }
        }

        if self.schema_type == "array" {
            if let (Some(item_schema), Some(items)) = (&self.items, value.as_array()) {
                for item in items {
                    if let Some(message) = item_schema.check_value(item) {
                        return Some(format!("array item: {}", message));
                    }
                }
            }
        }

        None
    }
}

/// A single schema validation failure, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// Field that failed validation (`(input)` for the top-level value)
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Definition of a tool exposed to the external agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name (e.g. "update_purpose")
    pub name: String,
    /// Human-readable description sent to the LLM
    pub description: String,
    /// Schema the raw input must satisfy before execution
    pub input_schema: ParameterSchema,
    /// Whether a successful execution changes canvas state and therefore
    /// requires a snapshot broadcast to connected clients
    pub modifies_canvas: bool,
}
