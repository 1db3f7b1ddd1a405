// src/contact.rs
//! Contact/application form: submission shape, validation, and the HTML
//! email rendered for the community inbox. Every interpolated field is
//! escaped; optional fields render only when actually provided.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

pub const VALIDATION_ERROR: &str = "Name, email, and message are required";
pub const NOT_CONFIGURED_ERROR: &str =
    "Email service is not configured. Please contact the administrator.";
pub const SEND_FAILED_ERROR: &str = "Failed to send email. Please try again later.";
pub const SUCCESS_MESSAGE: &str = "Form submitted successfully! We'll contact you soon.";

const BANNER_IMAGE_URL: &str =
    "https://media.licdn.com/dms/image/v2/D4D3DAQEWfoiP69F5Mw/image-scale_191_1128/0/1736758649950/d4community_cover";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub interest: Vec<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub other: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ContactSubmission {
    /// Name, email and message are the required trio; everything else is
    /// optional decoration on the email.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(VALIDATION_ERROR);
        }
        Ok(())
    }

    pub fn subject_line(&self) -> String {
        match self.subject.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => format!("D4 Community: {s}"),
            None => "New D4 Community Application".to_string(),
        }
    }
}

/// Escape the five HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escaped text with newlines turned into `<br>` for the message block.
fn escape_multiline(s: &str) -> String {
    escape_html(s).replace('\n', "<br>")
}

/// Submission timestamp in IST, the community's home timezone.
pub fn ist_timestamp(now: DateTime<Utc>) -> String {
    let ist = FixedOffset::east_opt(5 * 3600 + 1800).expect("valid IST offset");
    now.with_timezone(&ist)
        .format("%b %-d, %Y, %-I:%M %p")
        .to_string()
}

fn info_row(label: &str, value: &str) -> String {
    format!(
        "<tr class=\"info-row\"><td class=\"info-label\">{label}</td>\
         <td class=\"info-value\">{value}</td></tr>"
    )
}

/// Render the application email. `submitted_at` is a preformatted display
/// string so tests stay deterministic.
pub fn render_email_html(sub: &ContactSubmission, submitted_at: &str) -> String {
    let name = escape_html(&sub.name);
    let email = escape_html(&sub.email);
    let role = escape_html(sub.role.as_deref().unwrap_or("Not provided"));
    let message = escape_multiline(&sub.message);

    let mut rows = String::new();
    rows.push_str(&info_row(
        "Email:",
        &format!("<a href=\"mailto:{email}\">{email}</a>"),
    ));
    if let Some(phone) = sub.phone.as_deref().filter(|v| !v.trim().is_empty()) {
        rows.push_str(&info_row("Phone:", &escape_html(phone)));
    }
    if let Some(exp) = sub.experience.as_deref().filter(|v| !v.trim().is_empty()) {
        rows.push_str(&info_row("Experience:", &escape_html(exp)));
    }
    if let Some(subject) = sub.subject.as_deref().filter(|v| !v.trim().is_empty()) {
        rows.push_str(&info_row("Subject:", &escape_html(subject)));
    }
    if let Some(other) = sub.other.as_deref().filter(|v| !v.trim().is_empty()) {
        rows.push_str(&info_row("Additional Info:", &escape_html(other)));
    }

    let interests = if sub.interest.is_empty() {
        String::new()
    } else {
        let tags: String = sub
            .interest
            .iter()
            .map(|i| format!("<span class=\"interest-tag\">{}</span>", escape_html(i)))
            .collect();
        format!(
            "<div class=\"interests-container\">\
             <div class=\"info-label\">Areas of Interest:</div>\
             <div class=\"interests\">{tags}</div></div>"
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>New D4 Community Application</title>
  <style>
    body {{ font-family: -apple-system, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
           line-height: 1.6; color: #333; background-color: #000; margin: 0; }}
    .email-wrapper {{ max-width: 600px; margin: 0 auto; background: #000; }}
    .banner-img {{ display: block; width: 100%; max-width: 600px; height: auto; border: 0; }}
    .content-container {{ padding: 30px 20px; }}
    .email-title {{ font-size: 22px; font-weight: 700; color: #fff; text-align: center; }}
    .email-subtitle {{ font-size: 14px; color: #e5c377; text-align: center; }}
    .info-card, .message-section {{ background: #fff; border-radius: 12px; padding: 20px;
           margin-top: 20px; border: 1px solid #e5e7eb; }}
    .applicant-name {{ font-size: 18px; font-weight: 600; color: #111827; }}
    .applicant-role {{ font-size: 14px; color: #6b7280; margin-bottom: 20px; }}
    .info-grid {{ width: 100%; border-collapse: collapse; }}
    .info-label {{ padding: 10px 8px 10px 0; font-size: 13px; font-weight: 600; color: #4b5563;
           text-transform: uppercase; letter-spacing: 0.5px; width: 35%; vertical-align: top; }}
    .info-value {{ padding: 10px 0; font-size: 15px; color: #111827; word-break: break-word; }}
    .info-value a {{ color: #3b82f6; text-decoration: none; }}
    .message-content {{ font-size: 15px; color: #4b5563; background: #f9fafb; padding: 18px;
           border-radius: 8px; border: 1px solid #e5e7eb; word-wrap: break-word; }}
    .interests {{ display: flex; flex-wrap: wrap; gap: 6px; margin-top: 8px; }}
    .interest-tag {{ background: #e0e7ff; color: #3730a3; padding: 5px 10px; border-radius: 12px;
           font-size: 12px; border: 1px solid #c7d2fe; }}
    .action-card {{ background: #f0f9ff; border-radius: 12px; padding: 18px; margin-top: 20px;
           border: 1px solid #bae6fd; }}
    .action-title {{ color: #0369a1; font-size: 15px; font-weight: 600; }}
    .action-text {{ color: #0c4a6e; font-size: 14px; }}
    .footer {{ margin-top: 30px; padding-top: 20px; border-top: 1px solid #374151;
           text-align: center; color: #9ca3af; font-size: 14px; }}
    .footer-logo {{ color: #fff; font-weight: 700; font-size: 16px; }}
    .footer-tagline {{ color: #e5c377; font-size: 13px; margin-bottom: 12px; }}
    .footer a {{ color: #60a5fa; text-decoration: none; }}
    .timestamp {{ margin-top: 12px; font-size: 12px; font-style: italic; }}
  </style>
</head>
<body>
  <div class="email-wrapper">
    <div class="banner-section">
      <img src="{BANNER_IMAGE_URL}" alt="D4 Community" class="banner-img" width="600">
    </div>
    <div class="content-container">
      <div class="email-header">
        <h1 class="email-title">New Community Application</h1>
        <p class="email-subtitle">Someone wants to join D4 Community</p>
      </div>
      <div class="info-card">
        <h2 class="applicant-name">{name}</h2>
        <p class="applicant-role">{role}</p>
        <table class="info-grid">{rows}</table>
        {interests}
      </div>
      <div class="message-section">
        <h3 class="section-title">Message:</h3>
        <div class="message-content">{message}</div>
      </div>
      <div class="action-card">
        <h4 class="action-title">Action Required</h4>
        <p class="action-text">This applicant is excited to join D4 Community!
        Please respond within 24 hours to welcome them and provide next steps.</p>
      </div>
      <div class="footer">
        <div class="footer-logo">D4 Community</div>
        <div class="footer-tagline">Discite &bull; Develop &bull; Debug &bull; Deploy</div>
        <div class="footer-email"><a href="mailto:help.d4community@gmail.com">help.d4community@gmail.com</a></div>
        <div class="timestamp">Submitted on {submitted_at}</div>
      </div>
    </div>
  </div>
</body>
</html>"#
    )
}
