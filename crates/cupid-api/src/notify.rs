//! Outbound notifications. Sending is fire-and-forget: the triggering
//! request never waits on it, and failures only reach the logs.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use cupid_types::models::Answer;

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Welcome {
        to_email: String,
        name: String,
    },
    ResponseReceived {
        to_email: String,
        owner_name: String,
        to_name: String,
        answer: Answer,
        valentine_id: String,
    },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::Welcome { to_email, .. } => to_email,
            Notification::ResponseReceived { to_email, .. } => to_email,
        }
    }

    /// Plain-text subject and body. `app_url` is the frontend base for links.
    pub fn render(&self, app_url: &str) -> (String, String) {
        match self {
            Notification::Welcome { name, .. } => (
                "Welcome to Cupid's Prank!".to_string(),
                format!(
                    "Hey {name}!\n\n\
                     You can now pick one of five interactive templates, add your own \
                     message and share the link with someone special.\n\n\
                     Your dashboard: {app_url}/dashboard\n"
                ),
            ),
            Notification::ResponseReceived {
                owner_name,
                to_name,
                answer,
                valentine_id,
                ..
            } => {
                let (subject, verdict) = match answer {
                    Answer::Yes => (format!("{to_name} said YES!"), "said YES!"),
                    Answer::No => (
                        format!("{to_name} responded to your valentine"),
                        "clicked No (they might still change their mind)",
                    ),
                };
                let body = format!(
                    "Hey {owner_name}!\n\n\
                     {to_name} {verdict}\n\n\
                     View the valentine: {app_url}/v/{valentine_id}\n\
                     Your dashboard: {app_url}/dashboard\n"
                );
                (subject, body)
            }
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Spawn delivery on the runtime and return immediately.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send(&notification).await {
            warn!(
                "Notification to {} failed: {:#}",
                notification.recipient(),
                e
            );
        }
    });
}

/// Used when no SMTP relay is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        info!("Notification (not sent, no SMTP): {:?}", notification);
        Ok(())
    }
}

pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    app_url: String,
}

impl SmtpNotifier {
    pub fn new(
        host: &str,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        from_address: &str,
        app_url: &str,
    ) -> Result<Self> {
        let mailer = match username {
            Some(user) => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
                .port(port)
                .credentials(Credentials::new(user, password.unwrap_or_default()))
                .build(),
            None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(port)
                .build(),
        };

        Ok(Self {
            mailer,
            from: Mailbox::new(Some("Cupid's Prank".to_string()), from_address.parse()?),
            app_url: app_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let (subject, body) = notification.render(&self.app_url);

        let email = Message::builder()
            .from(self.from.clone())
            .to(notification.recipient().parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;
        info!("Sent notification to {}", notification.recipient());
        Ok(())
    }
}
