//! Explicit tree form of a raw intake record.

use serde_json::{Number, Value};

use crate::error::{IngestError, json_kind};

/// A scalar leaf of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    Null,
    Bool(bool),
    /// Decimal text of the number. Integral values never carry a fraction.
    Number(String),
    Text(String),
}

impl LeafValue {
    /// The value as text. `Null` becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            LeafValue::Null => String::new(),
            LeafValue::Bool(value) => value.to_string(),
            LeafValue::Number(text) | LeafValue::Text(text) => text.clone(),
        }
    }
}

/// A record: nested objects of scalar leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordNode {
    Leaf(LeafValue),
    /// Children in document order.
    Branch(Vec<(String, RecordNode)>),
}

impl RecordNode {
    /// Converts a JSON document. The root must be an object and no value
    /// may be an array.
    pub fn from_value(value: &Value) -> Result<Self, IngestError> {
        if !value.is_object() {
            return Err(IngestError::RootNotObject {
                found: json_kind(value),
            });
        }
        convert(value, &mut Vec::new())
    }

    /// Parses and converts JSON text.
    pub fn from_json(json: &str, what: &str) -> Result<Self, IngestError> {
        let value: Value = serde_json::from_str(json).map_err(|source| IngestError::Json {
            what: what.to_string(),
            source,
        })?;
        Self::from_value(&value)
    }

    /// Number of leaves below this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            RecordNode::Leaf(_) => 1,
            RecordNode::Branch(children) => children.iter().map(|(_, c)| c.leaf_count()).sum(),
        }
    }
}

fn convert<'a>(value: &'a Value, path: &mut Vec<&'a str>) -> Result<RecordNode, IngestError> {
    let leaf = match value {
        Value::Null => LeafValue::Null,
        Value::Bool(flag) => LeafValue::Bool(*flag),
        Value::Number(number) => LeafValue::Number(number_text(number)),
        Value::String(text) => LeafValue::Text(text.clone()),
        Value::Array(_) => {
            return Err(IngestError::UnsupportedArray {
                path: path.join("."),
            });
        }
        Value::Object(map) => {
            let mut children = Vec::with_capacity(map.len());
            for (key, child) in map {
                path.push(key);
                let node = convert(child, path)?;
                path.pop();
                children.push((key.clone(), node));
            }
            return Ok(RecordNode::Branch(children));
        }
    };
    Ok(RecordNode::Leaf(leaf))
}

/// Text of a JSON number. Integral floats print like integers, so `65000.0`
/// reads as `65000` and has length 5.
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e21 => {
            if float == 0.0 {
                "0".to_string()
            } else {
                format!("{float:.0}")
            }
        }
        _ => number.to_string(),
    }
}
