//! The tagged success/failure payload every tool returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single tool execution.
///
/// Tools never let errors cross their `execute` boundary; every failure mode
/// is translated into the `Failure` variant and fed back to the model as a
/// tool-role message, same as a success.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Success(ToolSuccess),
    Failure(ToolFailure),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSuccess {
    pub success: bool,
    pub action: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolFailure {
    pub success: bool,
    pub action: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_error: Option<String>,
    /// Extra structured context a caller may need (e.g. `availableTables` on
    /// a `table_not_found` failure). Flattened into the top level so the
    /// wire shape stays `{success, action, error, ...extra}`.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl ToolOutput {
    pub fn success(action: impl Into<String>, data: Value) -> Self {
        ToolOutput::Success(ToolSuccess {
            success: true,
            action: action.into(),
            data,
        })
    }

    pub fn failure(action: impl Into<String>, error: impl Into<String>) -> Self {
        ToolOutput::Failure(ToolFailure {
            success: false,
            action: action.into(),
            error: error.into(),
            original_error: None,
            extra: None,
        })
    }

    pub fn with_original_error(mut self, original: impl Into<String>) -> Self {
        if let ToolOutput::Failure(ref mut f) = self {
            f.original_error = Some(original.into());
        }
        self
    }

    /// Attaches extra structured fields to a failure (e.g. `availableTables`).
    /// `extra` must be a JSON object; it is merged at the top level on serialization.
    pub fn with_extra(mut self, extra: Value) -> Self {
        if let ToolOutput::Failure(ref mut f) = self {
            f.extra = Some(extra);
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutput::Success(_))
    }

    pub fn action(&self) -> &str {
        match self {
            ToolOutput::Success(s) => &s.action,
            ToolOutput::Failure(f) => &f.action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_with_data() {
        let out = ToolOutput::success("schema_info", serde_json::json!({"tables": []}));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["action"], "schema_info");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_serializes_without_original_error_when_absent() {
        let out = ToolOutput::failure("tool_error", "Tool 'foo' not found");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("originalError").is_none());
        assert!(json.get("original_error").is_none());
    }

    #[test]
    fn is_success_reflects_variant() {
        assert!(ToolOutput::success("x", serde_json::json!({})).is_success());
        assert!(!ToolOutput::failure("x", "e").is_success());
    }

    #[test]
    fn with_extra_flattens_into_top_level() {
        let out = ToolOutput::failure("table_not_found", "Table 'foo' does not exist.")
            .with_extra(serde_json::json!({"availableTables": ["users", "orders"]}));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["availableTables"], serde_json::json!(["users", "orders"]));
        assert_eq!(json["action"], "table_not_found");
    }
}
