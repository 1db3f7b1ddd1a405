// src/notify/mod.rs
//! Outbound notification channels. Email is the only one this product
//! needs: every contact form submission becomes one message to the
//! community inbox.

pub mod email;

pub use email::EmailSender;
