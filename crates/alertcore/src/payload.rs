use serde::{Deserialize, Serialize};

/// Caller supplied input for one execution, independent of the graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutePayload {
    #[serde(default)]
    pub form_data: FormData,
    #[serde(default)]
    pub condition: Condition,
}

impl ExecutePayload {
    pub fn new(form_data: FormData, condition: Condition) -> Self {
        Self {
            form_data,
            condition,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: String,
    /// Editors may echo the condition into the form; `condition` wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl FormData {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            city: city.into(),
            operator: None,
            threshold: None,
        }
    }
}

/// Comparison applied by the condition node. The operator stays a string so
/// an unknown value surfaces as a handler failure rather than a decode error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub threshold: f64,
}

impl Condition {
    pub fn new(operator: impl Into<String>, threshold: f64) -> Self {
        Self {
            operator: operator.into(),
            threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_request_body() {
        let json = r#"{
            "formData": {"name": "Jane", "email": "jane@example.com", "city": "Melbourne"},
            "condition": {"operator": "greater_than", "threshold": 25}
        }"#;
        let payload: ExecutePayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.form_data.city, "Melbourne");
        assert_eq!(payload.condition.operator, "greater_than");
        assert_eq!(payload.condition.threshold, 25.0);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let payload: ExecutePayload = serde_json::from_str("{}").unwrap();
        assert!(payload.form_data.name.is_empty());
        assert!(payload.condition.operator.is_empty());
    }
}
