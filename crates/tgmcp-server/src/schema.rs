//! Declarative parameter schemas for tools.
//!
//! Each tool declares its arguments once as a `ParamSchema`; the registry
//! validates inbound arguments against it before the tool runs, and the same
//! declaration is projected into the JSON Schema advertised by `tools/list`.

use serde_json::{json, Map, Value};

/// Field type plus constraints.
#[derive(Clone, Debug)]
pub enum ParamKind {
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
        one_of: Option<Vec<&'static str>>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Number,
    Boolean,
    /// Chat addressing: integer id or string username. The caller's original
    /// type is preserved downstream.
    ChatId,
    Array {
        items: Box<ParamKind>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    /// Nested object with its own schema; unknown keys inside are rejected.
    Object(ParamSchema),
    /// Escape hatch: any object, keys unchecked. Used for pass-through
    /// parameter bags and `reply_markup`-style shapes.
    FreeForm,
    /// Anything goes (entity lists and other opaque wire shapes).
    Any,
}

impl ParamKind {
    pub fn string() -> Self {
        ParamKind::String {
            min_len: None,
            max_len: None,
            one_of: None,
        }
    }

    pub fn string_bounded(min_len: usize, max_len: usize) -> Self {
        ParamKind::String {
            min_len: Some(min_len),
            max_len: Some(max_len),
            one_of: None,
        }
    }

    pub fn string_max(max_len: usize) -> Self {
        ParamKind::String {
            min_len: None,
            max_len: Some(max_len),
            one_of: None,
        }
    }

    pub fn string_enum(values: &[&'static str]) -> Self {
        ParamKind::String {
            min_len: None,
            max_len: None,
            one_of: Some(values.to_vec()),
        }
    }

    pub fn integer() -> Self {
        ParamKind::Integer {
            min: None,
            max: None,
        }
    }

    pub fn integer_bounded(min: i64, max: i64) -> Self {
        ParamKind::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn array(items: ParamKind) -> Self {
        ParamKind::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }
    }

    pub fn array_bounded(items: ParamKind, min_items: usize, max_items: usize) -> Self {
        ParamKind::Array {
            items: Box::new(items),
            min_items: Some(min_items),
            max_items: Some(max_items),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Param {
    name: &'static str,
    description: &'static str,
    kind: ParamKind,
    required: bool,
}

/// Ordered field declarations for one tool.
#[derive(Clone, Debug, Default)]
pub struct ParamSchema {
    params: Vec<Param>,
}

impl ParamSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        self.params.push(Param {
            name,
            description,
            kind,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        self.params.push(Param {
            name,
            description,
            kind,
            required: false,
        });
        self
    }

    /// Check `args` against the declaration. Absent arguments count as an
    /// empty object. Unknown keys are rejected; the only untyped data allowed
    /// through is a field explicitly declared `FreeForm`/`Any`.
    pub fn validate(&self, args: &Value) -> Result<(), String> {
        let empty = Map::new();
        let obj = match args {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(format!(
                    "arguments must be an object, got {}",
                    type_name(other)
                ))
            }
        };

        for key in obj.keys() {
            if !self.params.iter().any(|p| p.name == key) {
                return Err(format!("unexpected argument `{key}`"));
            }
        }

        for param in &self.params {
            match obj.get(param.name) {
                Some(value) => check_kind(param.name, &param.kind, value)?,
                None if param.required => {
                    return Err(format!("missing required argument `{}`", param.name))
                }
                None => {}
            }
        }

        Ok(())
    }

    /// JSON Schema projection for `tools/list`.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.params {
            let mut schema = kind_schema(&param.kind);
            if !param.description.is_empty() {
                if let Value::Object(map) = &mut schema {
                    map.insert("description".to_string(), json!(param.description));
                }
            }
            properties.insert(param.name.to_string(), schema);
            if param.required {
                required.push(json!(param.name));
            }
        }

        let mut out = Map::new();
        out.insert("type".to_string(), json!("object"));
        out.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            out.insert("required".to_string(), Value::Array(required));
        }
        Value::Object(out)
    }
}

fn check_kind(path: &str, kind: &ParamKind, value: &Value) -> Result<(), String> {
    match kind {
        ParamKind::String {
            min_len,
            max_len,
            one_of,
        } => {
            let Some(s) = value.as_str() else {
                return Err(format!("`{path}` must be a string"));
            };
            let len = s.chars().count();
            if let Some(min) = min_len {
                if len < *min {
                    return Err(format!("`{path}` must be at least {min} characters"));
                }
            }
            if let Some(max) = max_len {
                if len > *max {
                    return Err(format!("`{path}` must be at most {max} characters"));
                }
            }
            if let Some(allowed) = one_of {
                if !allowed.contains(&s) {
                    return Err(format!("`{path}` must be one of {allowed:?}"));
                }
            }
            Ok(())
        }
        ParamKind::Integer { min, max } => {
            let Some(n) = value.as_i64() else {
                return Err(format!("`{path}` must be an integer"));
            };
            if let Some(min) = min {
                if n < *min {
                    return Err(format!("`{path}` must be >= {min}"));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    return Err(format!("`{path}` must be <= {max}"));
                }
            }
            Ok(())
        }
        ParamKind::Number => {
            if value.is_number() {
                Ok(())
            } else {
                Err(format!("`{path}` must be a number"))
            }
        }
        ParamKind::Boolean => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err(format!("`{path}` must be a boolean"))
            }
        }
        ParamKind::ChatId => {
            if value.is_string() || value.as_i64().is_some() {
                Ok(())
            } else {
                Err(format!("`{path}` must be an integer id or a string username"))
            }
        }
        ParamKind::Array {
            items,
            min_items,
            max_items,
        } => {
            let Some(arr) = value.as_array() else {
                return Err(format!("`{path}` must be an array"));
            };
            if let Some(min) = min_items {
                if arr.len() < *min {
                    return Err(format!("`{path}` must have at least {min} items"));
                }
            }
            if let Some(max) = max_items {
                if arr.len() > *max {
                    return Err(format!("`{path}` must have at most {max} items"));
                }
            }
            for (i, item) in arr.iter().enumerate() {
                check_kind(&format!("{path}[{i}]"), items, item)?;
            }
            Ok(())
        }
        ParamKind::Object(schema) => {
            if !value.is_object() {
                return Err(format!("`{path}` must be an object"));
            }
            schema
                .validate(value)
                .map_err(|e| format!("`{path}`: {e}"))
        }
        ParamKind::FreeForm => {
            if value.is_object() {
                Ok(())
            } else {
                Err(format!("`{path}` must be an object"))
            }
        }
        ParamKind::Any => Ok(()),
    }
}

fn kind_schema(kind: &ParamKind) -> Value {
    match kind {
        ParamKind::String {
            min_len,
            max_len,
            one_of,
        } => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("string"));
            if let Some(min) = min_len {
                map.insert("minLength".to_string(), json!(min));
            }
            if let Some(max) = max_len {
                map.insert("maxLength".to_string(), json!(max));
            }
            if let Some(allowed) = one_of {
                map.insert("enum".to_string(), json!(allowed));
            }
            Value::Object(map)
        }
        ParamKind::Integer { min, max } => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("integer"));
            if let Some(min) = min {
                map.insert("minimum".to_string(), json!(min));
            }
            if let Some(max) = max {
                map.insert("maximum".to_string(), json!(max));
            }
            Value::Object(map)
        }
        ParamKind::Number => json!({"type": "number"}),
        ParamKind::Boolean => json!({"type": "boolean"}),
        ParamKind::ChatId => json!({"anyOf": [{"type": "integer"}, {"type": "string"}]}),
        ParamKind::Array {
            items,
            min_items,
            max_items,
        } => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("array"));
            map.insert("items".to_string(), kind_schema(items));
            if let Some(min) = min_items {
                map.insert("minItems".to_string(), json!(min));
            }
            if let Some(max) = max_items {
                map.insert("maxItems".to_string(), json!(max));
            }
            Value::Object(map)
        }
        ParamKind::Object(schema) => schema.to_json_schema(),
        ParamKind::FreeForm => json!({"type": "object", "additionalProperties": true}),
        ParamKind::Any => json!({}),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send_message_like() -> ParamSchema {
        ParamSchema::new()
            .required("chatId", ParamKind::ChatId, "target chat")
            .required("text", ParamKind::string(), "message text")
            .optional("params", ParamKind::FreeForm, "extra parameters")
    }

    #[test]
    fn accepts_valid_arguments_and_null_for_empty() {
        let schema = send_message_like();
        assert!(schema
            .validate(&json!({"chatId": 1, "text": "hi"}))
            .is_ok());
        assert!(schema
            .validate(&json!({"chatId": "@c", "text": "hi", "params": {"parse_mode": "HTML"}}))
            .is_ok());

        let empty = ParamSchema::new();
        assert!(empty.validate(&Value::Null).is_ok());
        assert!(empty.validate(&json!({})).is_ok());
    }

    #[test]
    fn rejects_missing_required_and_unknown_keys() {
        let schema = send_message_like();
        let err = schema.validate(&json!({"text": "hi"})).unwrap_err();
        assert!(err.contains("chatId"), "{err}");

        let err = schema
            .validate(&json!({"chatId": 1, "text": "hi", "nope": true}))
            .unwrap_err();
        assert!(err.contains("nope"), "{err}");
    }

    #[test]
    fn rejects_wrong_types() {
        let schema = send_message_like();
        let err = schema
            .validate(&json!({"chatId": true, "text": "hi"}))
            .unwrap_err();
        assert!(err.contains("chatId"), "{err}");

        let err = schema
            .validate(&json!({"chatId": 1, "text": 5}))
            .unwrap_err();
        assert!(err.contains("text"), "{err}");

        let err = schema
            .validate(&json!({"chatId": 1, "text": "hi", "params": []}))
            .unwrap_err();
        assert!(err.contains("params"), "{err}");
    }

    #[test]
    fn enforces_numeric_and_array_bounds() {
        let schema = ParamSchema::new()
            .optional("limit", ParamKind::integer_bounded(1, 100), "")
            .optional(
                "options",
                ParamKind::array_bounded(ParamKind::string_bounded(1, 100), 2, 10),
                "",
            );

        assert!(schema.validate(&json!({"limit": 1})).is_ok());
        assert!(schema.validate(&json!({"limit": 100})).is_ok());
        assert!(schema.validate(&json!({"limit": 0})).is_err());
        assert!(schema.validate(&json!({"limit": 101})).is_err());

        assert!(schema.validate(&json!({"options": ["a", "b"]})).is_ok());
        assert!(schema.validate(&json!({"options": ["a"]})).is_err());
        let eleven: Vec<_> = (0..11).map(|i| i.to_string()).collect();
        assert!(schema.validate(&json!({"options": eleven})).is_err());
        assert!(schema.validate(&json!({"options": ["a", ""]})).is_err());
    }

    #[test]
    fn nested_objects_validate_recursively() {
        let schema = ParamSchema::new().optional(
            "params",
            ParamKind::Object(
                ParamSchema::new()
                    .optional("offset", ParamKind::integer(), "")
                    .optional("limit", ParamKind::integer_bounded(1, 100), ""),
            ),
            "",
        );

        assert!(schema.validate(&json!({"params": {"offset": 5}})).is_ok());
        let err = schema
            .validate(&json!({"params": {"bogus": 5}}))
            .unwrap_err();
        assert!(err.contains("bogus"), "{err}");
        let err = schema
            .validate(&json!({"params": {"limit": 500}}))
            .unwrap_err();
        assert!(err.contains("limit"), "{err}");
    }

    #[test]
    fn string_enum_is_enforced() {
        let schema =
            ParamSchema::new().optional("type", ParamKind::string_enum(&["quiz", "regular"]), "");
        assert!(schema.validate(&json!({"type": "quiz"})).is_ok());
        assert!(schema.validate(&json!({"type": "ranked"})).is_err());
    }

    #[test]
    fn json_schema_projection_matches_declaration() {
        let schema = send_message_like();
        let v = schema.to_json_schema();
        assert_eq!(v["type"], json!("object"));
        assert_eq!(
            v["properties"]["chatId"]["anyOf"],
            json!([{"type": "integer"}, {"type": "string"}])
        );
        assert_eq!(v["properties"]["text"]["type"], json!("string"));
        assert_eq!(v["required"], json!(["chatId", "text"]));
    }
}
