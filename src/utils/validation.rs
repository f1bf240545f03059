use jsonschema::JSONSchema;
use serde_json::Value as JsonValue;
use validator::Validate;

pub fn validate<T: Validate>(val: &T) -> Result<(), validator::ValidationErrors> {
    val.validate()
}

pub fn compile_schema(schema: &JsonValue) -> Result<JSONSchema, String> {
    JSONSchema::compile(schema).map_err(|err| err.to_string())
}

/// Every violation of `schema` found in `instance`, as readable strings.
pub fn schema_violations(schema: &JSONSchema, instance: &JsonValue) -> Vec<String> {
    match schema.validate(instance) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|err| format!("{} at {}", err, err.instance_path))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reports_each_violation() {
        let schema = compile_schema(&json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": { "a": { "type": "string" } }
        }))
        .unwrap();

        assert!(schema_violations(&schema, &json!({"a": "x", "b": 1})).is_empty());

        let errors = schema_violations(&schema, &json!({"a": 3}));
        assert_eq!(errors.len(), 2);
    }
}
