use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::EmailConfig,
    error::{AppError, Result},
};

/// Sends the certificate-delivery email. One send per issuance; delivery
/// failure never rolls back the issued certificate.
#[async_trait]
pub trait CertificateMailer: Send + Sync {
    async fn send_certificate(
        &self,
        to: &str,
        student_name: &str,
        event_title: &str,
        certificate_url: &str,
    ) -> Result<()>;
}

/// Fixed HTML template with the three substitutions the workflow needs.
pub fn certificate_email_html(student_name: &str, event_title: &str, certificate_url: &str) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 600px;">
  <h2>Congratulations, {student_name}!</h2>
  <p>Thank you for attending <strong>{event_title}</strong>.</p>
  <p>Your certificate of attendance is ready:</p>
  <p><a href="{certificate_url}">Download your certificate</a></p>
  <p>See you at the next event!</p>
</div>"#
    )
}

pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Credentials are checked here rather than at startup, so a
    /// misconfigured deployment fails on the first send, not on boot.
    fn transport(&self) -> Result<(AsyncSmtpTransport<Tokio1Executor>, String)> {
        let host = self.config.smtp_host.as_deref().ok_or_else(|| {
            AppError::Email("SMTP host not configured".to_string())
        })?;
        let username = self.config.smtp_username.clone().ok_or_else(|| {
            AppError::Email("SMTP username not configured".to_string())
        })?;
        let password = self.config.smtp_password.clone().ok_or_else(|| {
            AppError::Email("SMTP password not configured".to_string())
        })?;
        let from_address = self.config.from_address.clone().ok_or_else(|| {
            AppError::Email("Sender address not configured".to_string())
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::Email(format!("Invalid SMTP relay: {}", e)))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(username, password))
            .build();

        let from = match self.config.from_name.as_deref() {
            Some(name) => format!("{} <{}>", name, from_address),
            None => from_address,
        };

        Ok((transport, from))
    }
}

#[async_trait]
impl CertificateMailer for SmtpMailer {
    async fn send_certificate(
        &self,
        to: &str,
        student_name: &str,
        event_title: &str,
        certificate_url: &str,
    ) -> Result<()> {
        let (transport, from) = self.transport()?;

        let message = Message::builder()
            .from(from.parse().map_err(|e| {
                AppError::Email(format!("Invalid sender address: {}", e))
            })?)
            .to(to.parse().map_err(|e| {
                AppError::Email(format!("Invalid recipient address: {}", e))
            })?)
            .subject(format!("Your certificate for {}", event_title))
            .header(ContentType::TEXT_HTML)
            .body(certificate_email_html(student_name, event_title, certificate_url))
            .map_err(|e| AppError::Email(format!("Failed to build message: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod fake {
    use std::sync::Mutex;
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub struct SentCertificate {
        pub to: String,
        pub student_name: String,
        pub event_title: String,
        pub certificate_url: String,
    }

    pub struct FakeMailer {
        pub fail: bool,
        pub sent: Mutex<Vec<SentCertificate>>,
    }

    impl FakeMailer {
        pub fn new() -> Self {
            Self { fail: false, sent: Mutex::new(Vec::new()) }
        }

        pub fn failing() -> Self {
            Self { fail: true, sent: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl CertificateMailer for FakeMailer {
        async fn send_certificate(
            &self,
            to: &str,
            student_name: &str,
            event_title: &str,
            certificate_url: &str,
        ) -> Result<()> {
            if self.fail {
                return Err(AppError::Email("SMTP send failed".to_string()));
            }
            self.sent.lock().unwrap().push(SentCertificate {
                to: to.to_string(),
                student_name: student_name.to_string(),
                event_title: event_title.to_string(),
                certificate_url: certificate_url.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitutes_all_three_fields() {
        let html = certificate_email_html("Jane Doe", "SEO Workshop", "https://x/cert.png");
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("SEO Workshop"));
        assert!(html.contains(r#"href="https://x/cert.png""#));
    }

    #[tokio::test]
    async fn missing_credentials_fail_at_send_time() {
        let mailer = SmtpMailer::new(EmailConfig::default());
        let err = mailer
            .send_certificate("jane@x.edu", "Jane", "Event", "https://x/c.png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Email(_)));
    }
}
