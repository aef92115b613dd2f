//! The recursive schema engine.
//!
//! Processes a raw input bag against an action's declared inputs and
//! produces a normalized tree, applying a fixed order per node:
//! missing check → default substitution → required check → formatter
//! chain → validator chain. Schema-shaped specs run the container
//! through the same order first, then recurse into every declared
//! child, extending the dotted path for error messages.
//!
//! The engine reports exactly one failure per call — the first one
//! encountered in declaration order.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ParameterError;
use crate::policy::MissingPolicy;
use crate::spec::ParameterSpec;
use crate::steps::{StepContext, StepRegistry, run_formatters, run_validators};

/// Transient per-invocation state threaded through the recursive walk.
struct ValidationContext<'a> {
    action: &'a str,
    policy: &'a MissingPolicy,
    steps: &'a StepRegistry,
}

/// Validate and normalize a raw input bag against declared inputs.
///
/// Raw keys with no declared spec are dropped. Declared optional inputs
/// that are absent (and have no default) are omitted from the output
/// tree. Returns the first failure in declaration order.
pub fn normalize(
    action: &str,
    inputs: &IndexMap<String, ParameterSpec>,
    raw: &Map<String, Value>,
    policy: &MissingPolicy,
    steps: &StepRegistry,
) -> Result<Map<String, Value>, ParameterError> {
    let ctx = ValidationContext {
        action,
        policy,
        steps,
    };

    let mut out = Map::new();
    for (key, spec) in inputs {
        if let Some(value) = ctx.process(key, spec, raw.get(key))? {
            out.insert(key.clone(), value);
        }
    }
    Ok(out)
}

impl ValidationContext<'_> {
    /// Process one spec node against one raw value.
    ///
    /// `Ok(None)` means the input was optional and absent — it is left
    /// out of the normalized tree entirely.
    fn process(
        &self,
        path: &str,
        spec: &ParameterSpec,
        raw: Option<&Value>,
    ) -> Result<Option<Value>, ParameterError> {
        let missing = match raw {
            None => true,
            Some(value) => self.policy.treats_as_missing(value),
        };

        let value = if missing {
            match spec.default() {
                Some(default) => default.produce(),
                None if spec.is_required() => {
                    return Err(ParameterError::missing_required(path));
                }
                None => return Ok(None),
            }
        } else {
            raw.cloned().unwrap_or(Value::Null)
        };

        match spec {
            ParameterSpec::Leaf(leaf) => {
                let step_ctx = StepContext {
                    action: self.action,
                    path,
                };
                let value = run_formatters(&leaf.formatters, value, self.steps, &step_ctx)?;
                run_validators(&leaf.validators, &value, self.steps, &step_ctx)?;
                Ok(Some(value))
            }
            ParameterSpec::Schema(schema) => {
                // A non-object container contributes nothing; its
                // required children then fail with their dotted paths.
                let container = match value {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };

                let mut out = Map::new();
                for (child_key, child_spec) in &schema.children {
                    let child_path = format!("{path}.{child_key}");
                    if let Some(child_value) =
                        self.process(&child_path, child_spec, container.get(child_key))?
                    {
                        out.insert(child_key.clone(), child_value);
                    }
                }
                Ok(Some(Value::Object(out)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{LeafSpec, SchemaSpec};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn run(
        inputs: &IndexMap<String, ParameterSpec>,
        bag: Value,
    ) -> Result<Map<String, Value>, ParameterError> {
        normalize(
            "test_action",
            inputs,
            &raw(bag),
            &MissingPolicy::default(),
            &StepRegistry::new(),
        )
    }

    fn inputs(entries: Vec<(&str, ParameterSpec)>) -> IndexMap<String, ParameterSpec> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect()
    }

    #[test]
    fn missing_required_leaf_fails_with_message() {
        let decl = inputs(vec![("name", LeafSpec::new().required().into())]);
        let err = run(&decl, json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "name is a required parameter for this action"
        );
    }

    #[rstest]
    #[case(json!(""))]
    #[case(json!(null))]
    fn policy_values_count_as_missing(#[case] supplied: Value) {
        let decl = inputs(vec![("name", LeafSpec::new().required().into())]);
        let err = run(&decl, json!({ "name": supplied })).unwrap_err();
        assert!(matches!(err, ParameterError::MissingRequired { .. }));
    }

    #[rstest]
    #[case(json!(false))]
    #[case(json!([]))]
    fn false_and_empty_collection_are_never_missing(#[case] supplied: Value) {
        let decl = inputs(vec![("flag", LeafSpec::new().required().into())]);
        let out = run(&decl, json!({ "flag": supplied.clone() })).unwrap();
        assert_eq!(out["flag"], supplied);
    }

    #[test]
    fn relaxed_policy_accepts_empty_string_verbatim() {
        let decl = inputs(vec![("name", LeafSpec::new().required().into())]);
        let policy = MissingPolicy::default().without(&json!(""));
        let out = normalize(
            "test_action",
            &decl,
            &raw(json!({"name": ""})),
            &policy,
            &StepRegistry::new(),
        )
        .unwrap();
        assert_eq!(out["name"], json!(""));
    }

    #[test]
    fn default_substituted_for_absent_value() {
        let decl = inputs(vec![(
            "limit",
            LeafSpec::new().default_value(json!(100)).into(),
        )]);
        let out = run(&decl, json!({})).unwrap();
        assert_eq!(out["limit"], json!(100));
    }

    #[test]
    fn producer_default_used_when_absent() {
        let decl = inputs(vec![(
            "token",
            LeafSpec::new().default_with(|| json!("fresh")).into(),
        )]);
        let out = run(&decl, json!({})).unwrap();
        assert_eq!(out["token"], json!("fresh"));
    }

    #[test]
    fn supplied_value_wins_over_default() {
        let decl = inputs(vec![(
            "limit",
            LeafSpec::new().default_value(json!(100)).into(),
        )]);
        let out = run(&decl, json!({"limit": 5})).unwrap();
        assert_eq!(out["limit"], json!(5));
    }

    #[test]
    fn default_also_covers_policy_missing_values() {
        // Empty string counts as missing, so the default replaces it.
        let decl = inputs(vec![(
            "name",
            LeafSpec::new().default_value(json!("anon")).into(),
        )]);
        let out = run(&decl, json!({"name": ""})).unwrap();
        assert_eq!(out["name"], json!("anon"));
    }

    #[test]
    fn optional_absent_input_is_omitted() {
        let decl = inputs(vec![("note", LeafSpec::new().into())]);
        let out = run(&decl, json!({})).unwrap();
        assert!(!out.contains_key("note"));
    }

    #[test]
    fn undeclared_raw_keys_are_dropped() {
        let decl = inputs(vec![("known", LeafSpec::new().into())]);
        let out = run(&decl, json!({"known": 1, "unknown": 2})).unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out.contains_key("unknown"));
    }

    #[test]
    fn formatted_value_reaches_validators() {
        let decl = inputs(vec![(
            "count",
            LeafSpec::new()
                .format(|v, _| json!(v.as_i64().unwrap_or(0) * 2))
                .validate(|v, _| {
                    if v.as_i64().unwrap_or(0) >= 10 {
                        Ok(())
                    } else {
                        Err(json!("too small after formatting"))
                    }
                })
                .into(),
        )]);

        let out = run(&decl, json!({"count": 5})).unwrap();
        assert_eq!(out["count"], json!(10));

        let err = run(&decl, json!({"count": 4})).unwrap_err();
        assert_eq!(err.into_error_value(), json!("too small after formatting"));
    }

    #[test]
    fn defaults_run_through_formatters() {
        let decl = inputs(vec![(
            "name",
            LeafSpec::new()
                .default_value(json!("guest"))
                .format(|v, _| json!(v.as_str().unwrap_or_default().to_uppercase()))
                .into(),
        )]);
        let out = run(&decl, json!({})).unwrap();
        assert_eq!(out["name"], json!("GUEST"));
    }

    #[test]
    fn first_declared_input_fails_first() {
        let decl = inputs(vec![
            ("first", LeafSpec::new().required().into()),
            ("second", LeafSpec::new().required().into()),
        ]);
        let err = run(&decl, json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "first is a required parameter for this action"
        );
    }

    #[test]
    fn nested_required_failure_names_dotted_path() {
        let decl = inputs(vec![(
            "schemaParam",
            SchemaSpec::new()
                .child("requiredParam", LeafSpec::new().required())
                .into(),
        )]);
        let err = run(&decl, json!({"schemaParam": {}})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "schemaParam.requiredParam is a required parameter for this action"
        );
    }

    #[test]
    fn absent_optional_schema_is_omitted() {
        let decl = inputs(vec![(
            "opts",
            SchemaSpec::new()
                .child("inner", LeafSpec::new().required())
                .into(),
        )]);
        // The container itself is optional and absent, so its required
        // child is never reached.
        let out = run(&decl, json!({})).unwrap();
        assert!(!out.contains_key("opts"));
    }

    #[test]
    fn required_schema_container_fails_at_container_path() {
        let decl = inputs(vec![(
            "opts",
            SchemaSpec::new()
                .required()
                .child("inner", LeafSpec::new())
                .into(),
        )]);
        let err = run(&decl, json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "opts is a required parameter for this action"
        );
    }

    #[test]
    fn schema_default_feeds_children() {
        let decl = inputs(vec![(
            "opts",
            SchemaSpec::new()
                .default_value(json!({"mode": "fast"}))
                .child("mode", LeafSpec::new().required())
                .child("retries", LeafSpec::new().default_value(json!(3)))
                .into(),
        )]);
        let out = run(&decl, json!({})).unwrap();
        assert_eq!(out["opts"], json!({"mode": "fast", "retries": 3}));
    }

    #[test]
    fn scalar_for_schema_param_fails_required_children() {
        let decl = inputs(vec![(
            "opts",
            SchemaSpec::new()
                .child("inner", LeafSpec::new().required())
                .into(),
        )]);
        let err = run(&decl, json!({"opts": "not an object"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "opts.inner is a required parameter for this action"
        );
    }

    #[test]
    fn deeply_nested_path_accumulates() {
        let decl = inputs(vec![(
            "a",
            SchemaSpec::new()
                .child(
                    "b",
                    SchemaSpec::new().child("c", LeafSpec::new().required()),
                )
                .into(),
        )]);
        let err = run(&decl, json!({"a": {"b": {}}})).unwrap_err();
        assert_eq!(err.to_string(), "a.b.c is a required parameter for this action");
    }

    #[test]
    fn nested_children_validate_and_format() {
        let decl = inputs(vec![(
            "user",
            SchemaSpec::new()
                .child(
                    "email",
                    LeafSpec::new()
                        .required()
                        .format(|v, _| json!(v.as_str().unwrap_or_default().to_lowercase()))
                        .validate(|v, _| {
                            if v.as_str().unwrap_or_default().contains('@') {
                                Ok(())
                            } else {
                                Err(json!("invalid email"))
                            }
                        }),
                )
                .into(),
        )]);

        let out = run(&decl, json!({"user": {"email": "A@B.COM"}})).unwrap();
        assert_eq!(out["user"], json!({"email": "a@b.com"}));

        let err = run(&decl, json!({"user": {"email": "nope"}})).unwrap_err();
        assert_eq!(err.into_error_value(), json!("invalid email"));
    }

    #[test]
    fn undeclared_nested_keys_are_dropped() {
        let decl = inputs(vec![(
            "user",
            SchemaSpec::new().child("name", LeafSpec::new()).into(),
        )]);
        let out = run(&decl, json!({"user": {"name": "ada", "extra": true}})).unwrap();
        assert_eq!(out["user"], json!({"name": "ada"}));
    }
}
