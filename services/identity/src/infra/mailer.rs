use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::repository::Mailer;
use crate::domain::types::MailMessage;

#[derive(Debug, Clone)]
pub struct Sender {
    pub name: String,
    pub email: String,
}

/// Transactional email through the Brevo SMTP API.
#[derive(Clone)]
pub struct BrevoMailer {
    pub client: reqwest::Client,
    pub api_url: String,
    pub api_key: String,
    pub sender: Sender,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    template_id: i64,
    sender: Contact<'a>,
    to: [Contact<'a>; 1],
    subject: &'a str,
    params: &'a serde_json::Value,
}

#[derive(Serialize)]
struct Contact<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

impl BrevoMailer {
    fn body<'a>(&'a self, message: &'a MailMessage) -> SendRequest<'a> {
        SendRequest {
            template_id: message.template_id,
            sender: Contact {
                name: Some(&self.sender.name),
                email: &self.sender.email,
            },
            to: [Contact {
                name: None,
                email: &message.to,
            }],
            subject: &message.subject,
            params: &message.params,
        }
    }
}

impl Mailer for BrevoMailer {
    async fn send(&self, message: MailMessage) -> bool {
        let result = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .json(&self.body(&message))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(template_id = message.template_id, "mail sent");
                true
            }
            Ok(response) => {
                warn!(
                    template_id = message.template_id,
                    status = %response.status(),
                    "mail provider rejected message"
                );
                false
            }
            Err(e) => {
                warn!(template_id = message.template_id, error = %e, "mail delivery failed");
                false
            }
        }
    }
}
