use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ExtractionError;

/// Raw message content as handed over by the mail retrieval side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub subject: String,
    pub content_type: String,
    pub body: String,
}

impl RawMessage {
    pub fn html(subject: &str, body: &str) -> Self {
        Self {
            subject: subject.to_string(),
            content_type: "text/html".to_string(),
            body: body.to_string(),
        }
    }

    pub fn plain(subject: &str, body: &str) -> Self {
        Self {
            subject: subject.to_string(),
            content_type: "text/plain".to_string(),
            body: body.to_string(),
        }
    }

    /// True when the content type is `text/html`, ignoring case and parameters
    pub fn is_html(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("text/html")
    }
}

/// Kinds of emails the client sends that the suite knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentClass {
    GiftSent,
    GiftReceived,
    NewSubscription,
    OrderConfirmation,
    EmailVerification,
    PasswordReset,
}

impl DocumentClass {
    pub const ALL: [DocumentClass; 6] = [
        DocumentClass::GiftSent,
        DocumentClass::GiftReceived,
        DocumentClass::NewSubscription,
        DocumentClass::OrderConfirmation,
        DocumentClass::EmailVerification,
        DocumentClass::PasswordReset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentClass::GiftSent => "gift-sent",
            DocumentClass::GiftReceived => "gift-received",
            DocumentClass::NewSubscription => "new-subscription",
            DocumentClass::OrderConfirmation => "order-confirmation",
            DocumentClass::EmailVerification => "email-verification",
            DocumentClass::PasswordReset => "password-reset",
        }
    }
}

impl fmt::Display for DocumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentClass {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DocumentClass::ALL
            .into_iter()
            .find(|class| class.as_str() == wanted)
            .ok_or_else(|| ExtractionError::UnknownDocumentClass(s.to_string()))
    }
}
