use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::EmailConfig;

/// Outbound notification channel to the site owner.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends an HTML mail from `from` to the configured receiver.
    async fn notify(&self, from: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    receiver: String,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        if !config.is_tls {
            warn!("SMTP TLS is disabled");
        }
        let builder = if config.is_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .context("create SMTP transport")?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        let builder = builder.port(config.port);
        let builder = if config.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
        };

        Ok(Self {
            transport: builder.build(),
            receiver: config.receiver.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn notify(&self, from: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let from: Mailbox = from.parse().context("parse from address")?;
        let to: Mailbox = self.receiver.parse().context("parse receiver address")?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .context("build email message")?;

        self.transport
            .send(message)
            .await
            .context("send SMTP email")?;
        info!(receiver = %self.receiver, %subject, "email sent");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use super::*;

    /// Records every mail instead of sending it.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<(String, String, String)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn notify(&self, from: &str, subject: &str, body: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("smtp unavailable");
            }
            self.sent
                .lock()
                .unwrap()
                .push((from.into(), subject.into(), body.into()));
            Ok(())
        }
    }
}
