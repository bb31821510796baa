use derive_more::Display;
use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::settings::AppConfig;

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Invalid mail address: {_0}")]
    InvalidAddress(String),

    #[display("Failed to build mail transport: {_0}")]
    Transport(String),

    #[display("Failed to build message: {_0}")]
    Message(String),

    #[display("Failed to send mail: {_0}")]
    Send(String),
}

/// Outbound SMTP mailer. Optional: when no mail server is configured the
/// application runs without one and callers degrade to a logged warning.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Builds a mailer from configuration; `None` when mail is not configured.
    pub fn from_config(config: &AppConfig) -> Option<Result<Self, MailError>> {
        let server = config.mail_server.as_deref()?;
        Some(Self::build(config, server))
    }

    fn build(config: &AppConfig, server: &str) -> Result<Self, MailError> {
        let from = config
            .mail_from
            .as_deref()
            .unwrap_or_default()
            .parse::<Mailbox>()
            .map_err(|e| MailError::InvalidAddress(e.to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.mail_port);

        if let (Some(username), Some(password)) =
            (config.mail_username.clone(), config.mail_password.clone())
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Mailer {
            transport: builder.build(),
            from,
        })
    }

    pub async fn send_verification(&self, to: &str, verify_url: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()
                .map_err(|e| MailError::InvalidAddress(e.to_string()))?)
            .subject("Confirm Your Email")
            .body(format!("Click to verify your email: {}", verify_url))
            .map_err(|e| MailError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Send(e.to_string()))
    }

    pub async fn send_contact_notification(
        &self,
        to: &str,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()
                .map_err(|e| MailError::InvalidAddress(e.to_string()))?)
            .subject("New Contact Message")
            .body(format!(
                "New message from the resume app:\n\nName: {}\nEmail: {}\n\nMessage:\n{}\n",
                name, email, body
            ))
            .map_err(|e| MailError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Send(e.to_string()))
    }
}
