use alertcore::{
    EmailTemplate, ExecutePayload, ExecutionContext, Node, NodeError, NodeHandler, NodeKind,
    NodeOutput,
};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use uuid::Uuid;

pub const DEFAULT_SENDER: &str = "weather-alerts@example.com";

/// Renders the alert email and simulates delivery. No mail leaves the
/// process.
pub struct EmailNode {
    sender: String,
}

impl EmailNode {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl Default for EmailNode {
    fn default() -> Self {
        Self::new(DEFAULT_SENDER)
    }
}

/// Subject and body with `{{city}}` and `{{temperature}}` filled in
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

pub fn render_template(template: &EmailTemplate, city: &str, temperature: f64) -> RenderedEmail {
    let temperature = format!("{:.1}", temperature);
    let fill = |text: &str| {
        text.replace("{{city}}", city)
            .replace("{{temperature}}", &temperature)
    };
    RenderedEmail {
        subject: fill(&template.subject),
        body: fill(&template.body),
    }
}

#[async_trait]
impl NodeHandler for EmailNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Email
    }

    fn description(&self) -> &str {
        "Renders the alert email and records a simulated send"
    }

    async fn handle(
        &self,
        node: &Node,
        payload: &ExecutePayload,
        ctx: &mut ExecutionContext,
    ) -> Result<NodeOutput, NodeError> {
        let template = node.data.metadata.email_template.as_ref().ok_or_else(|| {
            NodeError::Configuration(format!("node {} has no emailTemplate", node.id))
        })?;
        let temperature = ctx.require_temperature()?;
        let form = &payload.form_data;

        let email = render_template(template, &form.city, temperature);
        let message_id = format!("msg_{}", &Uuid::new_v4().simple().to_string()[..12]);
        tracing::info!("Sending email {} to {}", message_id, form.email);

        Ok(NodeOutput::new()
            .with_output(
                "emailDraft",
                json!({
                    "to": form.email,
                    "from": self.sender,
                    "subject": email.subject,
                    "body": email.body,
                    "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
                }),
            )
            .with_output("deliveryStatus", "sent")
            .with_output("messageId", message_id)
            .with_output("emailSent", true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertcore::{FormData, NodeMetadata};

    fn template() -> EmailTemplate {
        EmailTemplate {
            subject: "Weather alert for {{city}}".into(),
            body: "Hello, the temperature in {{city}} is {{temperature}}°C.".into(),
        }
    }

    #[test]
    fn fills_both_placeholders() {
        let email = render_template(&template(), "Melbourne", 21.0);
        assert_eq!(email.subject, "Weather alert for Melbourne");
        assert_eq!(email.body, "Hello, the temperature in Melbourne is 21.0°C.");
    }

    #[tokio::test]
    async fn missing_template_is_a_configuration_error() {
        let node = Node::new("email", NodeKind::Email);
        let mut ctx = ExecutionContext::new();
        ctx.set_temperature(20.0);
        let err = EmailNode::default()
            .handle(&node, &ExecutePayload::default(), &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::Configuration(_)));
    }

    #[tokio::test]
    async fn draft_is_addressed_to_the_form_email() {
        let node = Node::new("email", NodeKind::Email).with_metadata(NodeMetadata {
            email_template: Some(template()),
            ..Default::default()
        });
        let payload = ExecutePayload {
            form_data: FormData::new("Jane", "jane@example.com", "Hobart"),
            ..Default::default()
        };
        let mut ctx = ExecutionContext::new();
        ctx.set_temperature(9.24);

        let output = EmailNode::default()
            .handle(&node, &payload, &mut ctx)
            .await
            .unwrap();
        let draft = output.get("emailDraft").unwrap();
        assert_eq!(draft["to"], "jane@example.com");
        assert_eq!(draft["from"], DEFAULT_SENDER);
        assert_eq!(draft["body"], "Hello, the temperature in Hobart is 9.2°C.");
        assert_eq!(output.get("emailSent").unwrap(), true);
        assert!(output
            .get("messageId")
            .and_then(|v| v.as_str())
            .unwrap()
            .starts_with("msg_"));
    }
}
