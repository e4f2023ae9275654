//! Remark notifications by email.
//!
//! [`SmtpNotifier`] wraps the `lettre` async SMTP transport. When `SMTP_HOST`
//! is unset, [`EmailConfig::from_env`] returns `None` and the service runs
//! without a notifier.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

pub const REMARK_SUBJECT: &str = "New Remark Added to Your Project";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

/// Best-effort delivery of "a remark was added" messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_remark_notification(
        &self,
        to: &str,
        project_title: &str,
        remark: &str,
    ) -> Result<(), NotifyError>;
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "noreply@uapp.local";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// | Variable        | Required | Default              |
    /// |-----------------|----------|----------------------|
    /// | `SMTP_HOST`     | yes      | -                    |
    /// | `SMTP_PORT`     | no       | `587`                |
    /// | `SMTP_FROM`     | no       | `noreply@uapp.local` |
    /// | `SMTP_USER`     | no       | -                    |
    /// | `SMTP_PASSWORD` | no       | -                    |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let smtp_host = lookup("SMTP_HOST")?;
        Some(Self {
            smtp_host,
            smtp_port: lookup("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: lookup("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: lookup("SMTP_USER"),
            smtp_password: lookup("SMTP_PASSWORD"),
        })
    }
}

pub struct SmtpNotifier {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from: config.from_address.parse()?,
            mailer: builder.build(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_remark_notification(
        &self,
        to: &str,
        project_title: &str,
        remark: &str,
    ) -> Result<(), NotifyError> {
        let email = remark_message(self.from.clone(), to, project_title, remark)?;
        self.mailer.send(email).await?;

        tracing::info!(to, project_title, "Remark notification sent");
        Ok(())
    }
}

pub fn remark_body(project_title: &str, remark: &str) -> String {
    format!(
        "Hello Team Lead,\n\n\
         A new remark has been added to your project: {project_title}\n\n\
         Remark: {remark}\n\n\
         Please check the portal for more details.\n\n\
         Regards,\nAdmin"
    )
}

pub fn remark_message(
    from: Mailbox,
    to: &str,
    project_title: &str,
    remark: &str,
) -> Result<Message, NotifyError> {
    Message::builder()
        .from(from)
        .to(to.parse()?)
        .subject(REMARK_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(remark_body(project_title, remark))
        .map_err(|e| NotifyError::Build(e.to_string()))
}
