use serde_json::{Map, Value};

pub fn parse(text: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(text).map_err(|e| e.to_string())? {
        Value::Object(map) => Ok(map),
        _ => Err("top-level value must be an object".to_string()),
    }
}
