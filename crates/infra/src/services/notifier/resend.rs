use super::INotifier;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

pub const RESEND_API_BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    html: String,
}

/// Sends reminder emails through the Resend REST API
pub struct ResendNotifier {
    client: Client,
    api_key: String,
    from_email: String,
    base_url: String,
}

impl ResendNotifier {
    pub fn new(api_key: String, from_email: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            from_email,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl INotifier for ResendNotifier {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let request = SendEmailRequest {
            from: &self.from_email,
            to: vec![destination],
            subject: format!("Wedding Reminder: {}", subject),
            html: format!(
                "<h2>{}</h2><p>{}</p>",
                escape_html(subject),
                escape_html(body)
            ),
        };

        let res = match self
            .client
            .post(&format!("{}/emails", self.base_url))
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                error!(
                    "[Network Error] Resend API POST error. Error message: {:?}",
                    e
                );
                return Err(anyhow::Error::new(e));
            }
        };

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            error!(
                "[Unexpected Response] Resend API responded with status: {}. Body: {}",
                status, text
            );
            return Err(anyhow::anyhow!("Resend API responded with status {}", status));
        }

        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
