//! Demo that renders a sample application email to stdout and, when SMTP
//! env vars are present, sends it to the configured inbox.

use chrono::Utc;
use d4_community_site::contact::{ist_timestamp, render_email_html, ContactSubmission};
use d4_community_site::notify::EmailSender;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();
    let _ = dotenvy::dotenv();

    let sample = ContactSubmission {
        name: "Asha Verma".to_string(),
        email: "asha@example.com".to_string(),
        phone: Some("+91 98765 43210".to_string()),
        role: Some("Student".to_string()),
        interest: vec!["Web Dev".to_string(), "AI/ML".to_string()],
        experience: Some("Beginner (0-1 years)".to_string()),
        subject: Some("Volunteering at the next hackathon".to_string()),
        other: None,
        message: "Hi! I'd love to help organize Hack-N-Win 3.0.\nWhere do I sign up?".to_string(),
    };

    println!("{}", render_email_html(&sample, &ist_timestamp(Utc::now())));

    match EmailSender::from_env() {
        Ok(mailer) => match mailer.send_application(&sample).await {
            Ok(()) => println!("contact-demo: email sent"),
            Err(e) => println!("contact-demo: send failed: {e:#}"),
        },
        Err(e) => println!("contact-demo: SMTP not configured ({e:#}), rendered only"),
    }
}
