// src/notify/email.rs
use anyhow::{Context, Result};
use chrono::Utc;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use crate::contact::{ist_timestamp, render_email_html, ContactSubmission};

pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSender {
    /// Build from SMTP_HOST / SMTP_USER / SMTP_PASS / CONTACT_EMAIL_FROM /
    /// CONTACT_EMAIL_TO. Missing or invalid settings are an `Err`, not a
    /// panic: the contact endpoint degrades to a "not configured" response.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SMTP_HOST").context("SMTP_HOST missing")?;
        let user = std::env::var("SMTP_USER").context("SMTP_USER missing")?;
        let pass = std::env::var("SMTP_PASS").context("SMTP_PASS missing")?;
        let from_addr = std::env::var("CONTACT_EMAIL_FROM").context("CONTACT_EMAIL_FROM missing")?;
        // Receiver defaults to the sending account, like most small
        // community inboxes.
        let to_addr = std::env::var("CONTACT_EMAIL_TO").unwrap_or_else(|_| from_addr.clone());

        let creds = Credentials::new(user, pass);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .context("invalid SMTP_HOST")?
            .credentials(creds)
            .build();

        let from = format!("\"D4 Community\" <{from_addr}>")
            .parse()
            .context("invalid CONTACT_EMAIL_FROM")?;
        let to = to_addr.parse().context("invalid CONTACT_EMAIL_TO")?;

        Ok(Self { mailer, from, to })
    }

    /// Render and send one application email; replies go straight to the
    /// applicant.
    pub async fn send_application(&self, sub: &ContactSubmission) -> Result<()> {
        let reply_to: Mailbox = sub.email.parse().context("invalid applicant email")?;
        let html = render_email_html(sub, &ist_timestamp(Utc::now()));

        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .subject(sub.subject_line())
            .header(header::ContentType::TEXT_HTML)
            .body(html)
            .context("build email")?;

        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}
