use alertcore::{
    ExecutePayload, ExecutionContext, FormData, Node, NodeError, NodeHandler, NodeKind, NodeOutput,
};
use async_trait::async_trait;

/// Validates the user supplied form fields
pub struct FormNode;

/// Checks name, email and city in that order; the first empty one wins
pub fn validate_form(form: &FormData) -> Result<(), NodeError> {
    if form.name.is_empty() {
        return Err(NodeError::MissingName);
    }
    if form.email.is_empty() {
        return Err(NodeError::MissingEmail);
    }
    if form.city.is_empty() {
        return Err(NodeError::MissingCity);
    }
    Ok(())
}

#[async_trait]
impl NodeHandler for FormNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Form
    }

    fn description(&self) -> &str {
        "Validates that name, email and city were provided"
    }

    async fn handle(
        &self,
        node: &Node,
        payload: &ExecutePayload,
        _ctx: &mut ExecutionContext,
    ) -> Result<NodeOutput, NodeError> {
        let form = &payload.form_data;
        tracing::debug!("Validating form input for node {}", node.id);
        validate_form(form)?;

        Ok(NodeOutput::new()
            .with_output("name", form.name.clone())
            .with_output("email", form.email.clone())
            .with_output("city", form.city.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_missing_field_has_its_own_error() {
        let cases = [
            (FormData::new("", "alice@example.com", "Sydney"), NodeError::MissingName),
            (FormData::new("Alice", "", "Sydney"), NodeError::MissingEmail),
            (FormData::new("Alice", "alice@example.com", ""), NodeError::MissingCity),
        ];
        for (form, expected) in cases {
            assert_eq!(validate_form(&form), Err(expected));
        }
    }

    #[test]
    fn complete_form_is_valid() {
        assert!(validate_form(&FormData::new("Alice", "alice@example.com", "Sydney")).is_ok());
    }

    #[test]
    fn name_is_checked_first() {
        assert_eq!(validate_form(&FormData::default()), Err(NodeError::MissingName));
    }
}
