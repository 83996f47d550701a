//! Input signature the dygraph model is traced against

use serde::{Deserialize, Serialize};

/// Element type of a traced input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int32,
    Int64,
    Float32,
}

/// One named input of the traced graph. `None` dimensions are variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub shape: Vec<Option<i64>>,
    pub dtype: DType,
}

impl InputSpec {
    pub fn new(name: impl Into<String>, shape: Vec<Option<i64>>, dtype: DType) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype,
        }
    }
}

/// `token_ids: int64[batch, seq]` and `length: int64[batch]`
pub fn lac_input_spec() -> Vec<InputSpec> {
    vec![
        InputSpec::new("token_ids", vec![None, None], DType::Int64),
        InputSpec::new("length", vec![None], DType::Int64),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lac_input_spec_serializes_variable_dims_as_null() {
        let json = serde_json::to_value(lac_input_spec()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "token_ids", "shape": [null, null], "dtype": "int64"},
                {"name": "length", "shape": [null], "dtype": "int64"},
            ])
        );
    }
}
