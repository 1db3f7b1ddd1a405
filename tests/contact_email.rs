// tests/contact_email.rs
//
// The rendered application email is the one artifact the team actually
// reads; pin down its structure and escaping end to end.

use d4_community_site::contact::{render_email_html, ContactSubmission};

fn full_submission() -> ContactSubmission {
    ContactSubmission {
        name: "Asha Verma".to_string(),
        email: "asha@example.com".to_string(),
        phone: Some("+91 98765 43210".to_string()),
        role: Some("Student".to_string()),
        interest: vec!["Web Dev".to_string(), "Cloud & DevOps".to_string()],
        experience: Some("Beginner (0-1 years)".to_string()),
        subject: Some("Volunteering".to_string()),
        other: None,
        message: "Hi team,\nI'd love to volunteer at the next hackathon.".to_string(),
    }
}

#[test]
fn template_carries_every_provided_section() {
    let html = render_email_html(&full_submission(), "Jan 5, 2026, 7:15 PM");

    assert!(html.contains("New Community Application"));
    assert!(html.contains("Asha Verma"));
    assert!(html.contains("mailto:asha@example.com"));
    assert!(html.contains("Phone:"));
    assert!(html.contains("+91 98765 43210"));
    assert!(html.contains("Experience:"));
    assert!(html.contains("Subject:"));
    assert!(html.contains("Areas of Interest:"));
    assert!(html.contains("Cloud &amp; DevOps"));
    assert!(html.contains("I&#39;d love to volunteer"));
    assert!(html.contains("<br>"));
    assert!(html.contains("Submitted on Jan 5, 2026, 7:15 PM"));
    // Footer identity.
    assert!(html.contains("help.d4community@gmail.com"));
    assert!(html.contains("Discite"));
}

#[test]
fn omitted_sections_leave_no_empty_rows() {
    let bare = ContactSubmission {
        name: "Ravi".to_string(),
        email: "ravi@example.com".to_string(),
        message: "Hello!".to_string(),
        ..Default::default()
    };
    let html = render_email_html(&bare, "now");

    assert!(!html.contains("Phone:"));
    assert!(!html.contains("Experience:"));
    assert!(!html.contains("Subject:"));
    assert!(!html.contains("Additional Info:"));
    assert!(!html.contains("Areas of Interest:"));
    assert!(html.contains("Not provided")); // role placeholder only
}

#[test]
fn hostile_input_is_neutralized_everywhere() {
    let mut s = full_submission();
    s.name = "<img src=x onerror=alert(1)>".to_string();
    s.subject = Some("\"quoted\" & <bold>".to_string());
    s.interest = vec!["<svg>".to_string()];
    s.message = "<script>steal()</script>".to_string();

    let html = render_email_html(&s, "now");
    assert!(!html.contains("<img src=x"));
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<svg>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("&quot;quoted&quot; &amp; &lt;bold&gt;"));
}
