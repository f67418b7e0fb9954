use alertcore::{
    ExecutePayload, ExecutionContext, Node, NodeError, NodeHandler, NodeKind, NodeOutput,
};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub const CONDITION_MET_TEXT: &str = "condition met";
pub const CONDITION_NOT_MET_TEXT: &str = "condition not met";

/// Comparison between the measured temperature and the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    GreaterThan,
    LessThan,
    Equals,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::Equals => "equals",
            Operator::GreaterThanOrEqual => "greater_than_or_equal",
            Operator::LessThanOrEqual => "less_than_or_equal",
        }
    }

    /// `value <op> threshold`
    pub fn evaluate(&self, value: f64, threshold: f64) -> bool {
        match self {
            Operator::GreaterThan => value > threshold,
            Operator::LessThan => value < threshold,
            Operator::Equals => value == threshold,
            Operator::GreaterThanOrEqual => value >= threshold,
            Operator::LessThanOrEqual => value <= threshold,
        }
    }
}

impl FromStr for Operator {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greater_than" => Ok(Operator::GreaterThan),
            "less_than" => Ok(Operator::LessThan),
            "equals" => Ok(Operator::Equals),
            "greater_than_or_equal" => Ok(Operator::GreaterThanOrEqual),
            "less_than_or_equal" => Ok(Operator::LessThanOrEqual),
            other => Err(NodeError::UnsupportedOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate a condition from its raw parts
pub fn evaluate_condition(operator: &str, threshold: f64, temperature: f64) -> Result<bool, NodeError> {
    Ok(operator.parse::<Operator>()?.evaluate(temperature, threshold))
}

/// Human readable summary stored in the step output
pub fn condition_message(operator: Operator, threshold: f64, temperature: f64, met: bool) -> String {
    format!(
        "Temperature {:.1}°C is {} {:.1}°C - {}",
        temperature,
        operator.as_str().replace('_', " "),
        threshold,
        if met { CONDITION_MET_TEXT } else { CONDITION_NOT_MET_TEXT }
    )
}

/// Compares the looked-up temperature with the payload threshold and
/// reports which branch to take
pub struct ConditionNode;

#[async_trait]
impl NodeHandler for ConditionNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Condition
    }

    fn description(&self) -> &str {
        "Compares the current temperature against a threshold"
    }

    async fn handle(
        &self,
        node: &Node,
        payload: &ExecutePayload,
        ctx: &mut ExecutionContext,
    ) -> Result<NodeOutput, NodeError> {
        let temperature = ctx.require_temperature()?;
        let condition = &payload.condition;
        let operator: Operator = condition.operator.parse()?;
        let met = operator.evaluate(temperature, condition.threshold);

        tracing::debug!(
            "Condition {}: {} {} {} -> {}",
            node.id,
            temperature,
            operator,
            condition.threshold,
            met
        );

        Ok(NodeOutput::new()
            .with_output("conditionMet", met)
            .with_output("threshold", condition.threshold)
            .with_output("operator", operator.as_str())
            .with_output("actualValue", temperature)
            .with_output(
                "message",
                condition_message(operator, condition.threshold, temperature, met),
            )
            .with_branch(met))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertcore::{Condition, ContextKey};

    #[test]
    fn truth_table() {
        let cases = [
            ("greater_than", 10.0, true),
            ("greater_than", 20.0, false),
            ("less_than", 20.0, true),
            ("less_than", 10.0, false),
            ("equals", 15.5, true),
            ("equals", 10.0, false),
            ("greater_than_or_equal", 15.5, true),
            ("greater_than_or_equal", 10.0, true),
            ("greater_than_or_equal", 20.0, false),
            ("less_than_or_equal", 15.5, true),
            ("less_than_or_equal", 20.0, true),
            ("less_than_or_equal", 10.0, false),
        ];
        for (op, threshold, expected) in cases {
            assert_eq!(
                evaluate_condition(op, threshold, 15.5).unwrap(),
                expected,
                "{} {}",
                op,
                threshold
            );
        }
        assert!(evaluate_condition("equals", 21.0, 21.0).unwrap());
    }

    #[test]
    fn unsupported_operator_is_rejected() {
        let err = evaluate_condition("between", 10.0, 15.5).unwrap_err();
        assert_eq!(err, NodeError::UnsupportedOperator("between".into()));
        assert!(err.to_string().contains("unsupported operator"));
    }

    #[test]
    fn message_reads_naturally() {
        assert_eq!(
            condition_message(Operator::GreaterThanOrEqual, 20.0, 21.04, true),
            "Temperature 21.0°C is greater than or equal 20.0°C - condition met"
        );
    }

    #[tokio::test]
    async fn handler_requires_temperature() {
        let node = Node::new("condition", NodeKind::Condition);
        let payload = ExecutePayload {
            condition: Condition::new("equals", 1.0),
            ..Default::default()
        };
        let mut ctx = ExecutionContext::new();
        let err = ConditionNode.handle(&node, &payload, &mut ctx).await.unwrap_err();
        assert_eq!(err, NodeError::MissingContext(ContextKey::Temperature));
    }

    #[tokio::test]
    async fn handler_reports_branch_and_fields() {
        let node = Node::new("condition", NodeKind::Condition);
        let payload = ExecutePayload {
            condition: Condition::new("less_than", 10.0),
            ..Default::default()
        };
        let mut ctx = ExecutionContext::new();
        ctx.set_temperature(15.5);

        let output = ConditionNode.handle(&node, &payload, &mut ctx).await.unwrap();
        assert_eq!(output.branch, Some(false));
        assert_eq!(output.get("conditionMet").unwrap(), false);
        assert_eq!(output.get("actualValue").unwrap(), 15.5);
        assert_eq!(output.get("operator").and_then(|v| v.as_str()), Some("less_than"));
        assert_eq!(
            output.get("message").and_then(|v| v.as_str()),
            Some("Temperature 15.5°C is less than 10.0°C - condition not met")
        );
    }
}
