//! Props validation seam.
//!
//! Full schema validation is an external collaborator: the core only needs
//! `validate(props) -> Ok | Err`. [`BasicPropsValidator`] is the default and
//! enforces the structural minimum every addon must satisfy; hosts with a
//! real schema plug in their own [`PropsValidator`] via
//! [`Addon::set_validator`](crate::addon::Addon::set_validator).

use serde_json::Value;

use crate::addon::AddonType;
use crate::error::{AddonError, AddonResult};

// ─── PropsValidator trait ─────────────────────────────────────────────────────

/// Validates an addon's declared props.
///
/// Implementations report the **first** violated constraint in the error
/// message and must be invocable at any time.
pub trait PropsValidator: Send + Sync {
    /// Returns `Ok(())` when `props` satisfies every constraint.
    fn validate(&self, props: &Value) -> AddonResult<()>;
}

// ─── BasicPropsValidator ──────────────────────────────────────────────────────

/// Default validator checking the structural minimum: props is an object
/// with non-empty string `id` and `version` fields and a known `type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicPropsValidator;

impl PropsValidator for BasicPropsValidator {
    fn validate(&self, props: &Value) -> AddonResult<()> {
        let obj = props
            .as_object()
            .ok_or_else(|| AddonError::validation("props must be an object"))?;

        match obj.get("id").and_then(Value::as_str) {
            None => return Err(AddonError::validation("'id' must be a string")),
            Some("") => return Err(AddonError::validation("'id' must not be empty")),
            Some(_) => {}
        }

        match obj.get("type").and_then(Value::as_str) {
            None => return Err(AddonError::validation("'type' must be a string")),
            Some(kind) if kind.parse::<AddonType>().is_err() => {
                return Err(AddonError::validation(format!(
                    "'type' is not a known addon type: '{kind}'"
                )));
            }
            Some(_) => {}
        }

        match obj.get("version").and_then(Value::as_str) {
            None => return Err(AddonError::validation("'version' must be a string")),
            Some("") => return Err(AddonError::validation("'version' must not be empty")),
            Some(_) => {}
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_minimal_props() {
        let props = json!({ "id": "demo", "type": "worker", "version": "1.0.0" });
        assert!(BasicPropsValidator.validate(&props).is_ok());
    }

    #[test]
    fn test_rejects_non_object() {
        let err = BasicPropsValidator.validate(&json!("nope")).unwrap_err();
        assert!(matches!(err, AddonError::Validation(_)));
    }

    #[test]
    fn test_reports_first_violation() {
        // Both id and version are broken; only id is reported.
        let props = json!({ "id": "", "type": "worker", "version": 3 });
        let err = BasicPropsValidator.validate(&props).unwrap_err();
        assert_eq!(
            err.to_string(),
            "addon props validation failed: 'id' must not be empty"
        );
    }

    #[test]
    fn test_rejects_unknown_type() {
        let props = json!({ "id": "demo", "type": "toaster", "version": "1.0.0" });
        let err = BasicPropsValidator.validate(&props).unwrap_err();
        assert!(err.to_string().contains("toaster"));
    }
}
