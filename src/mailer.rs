use crate::config;
use crate::error::{AnalyzerError, AnalyzerResult};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// SMTP credentials and recipients, read from the environment
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub sender: String,
    pub password: String,
    pub recipients: Vec<String>,
    pub smtp_host: String,
}

impl MailConfig {
    pub fn from_env() -> AnalyzerResult<Self> {
        let env = |key: &str| std::env::var(key).ok();

        Self::from_values(
            env(config::ENV_EMAIL_SENDER),
            env(config::ENV_EMAIL_PASSWORD),
            config::ENV_EMAIL_RECIPIENTS.iter().map(|key| env(*key)).collect(),
            config::get_smtp_host(),
        )
    }

    /// Blank values count as missing; at least one recipient is required
    pub fn from_values(
        sender: Option<String>,
        password: Option<String>,
        recipients: Vec<Option<String>>,
        smtp_host: String,
    ) -> AnalyzerResult<Self> {
        let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let sender = non_blank(sender).ok_or(AnalyzerError::MissingConfig(config::ENV_EMAIL_SENDER))?;
        let password =
            non_blank(password).ok_or(AnalyzerError::MissingConfig(config::ENV_EMAIL_PASSWORD))?;
        let recipients: Vec<String> = recipients.into_iter().filter_map(non_blank).collect();

        if recipients.is_empty() {
            return Err(AnalyzerError::MissingConfig("NSE_EMAIL_RECIPIENT_1"));
        }

        Ok(Self {
            sender,
            password,
            recipients,
            smtp_host,
        })
    }

    pub fn recipient_list(&self) -> String {
        self.recipients.join(", ")
    }
}

/// Single HTML-only message addressed to every configured recipient
pub fn build_message(mail: &MailConfig, subject: &str, html: &str) -> AnalyzerResult<Message> {
    let from: Mailbox = mail.sender.parse()?;

    let mut builder = Message::builder().from(from).subject(subject);
    for recipient in &mail.recipients {
        builder = builder.to(recipient.parse()?);
    }

    Ok(builder.header(ContentType::TEXT_HTML).body(html.to_string())?)
}

/// Submit the report over SMTP with implicit TLS
pub async fn send_report(mail: &MailConfig, subject: &str, html: &str) -> AnalyzerResult<()> {
    let message = build_message(mail, subject, html)?;

    let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&mail.smtp_host)?
        .credentials(Credentials::new(mail.sender.clone(), mail.password.clone()))
        .timeout(Some(config::HTTP_TIMEOUT))
        .build();

    let response = transport.send(message).await?;
    info!(
        recipients = %mail.recipient_list(),
        code = %response.code(),
        "Report email accepted"
    );

    Ok(())
}
