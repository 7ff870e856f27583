//! Localized label text used by the email templates.
//!
//! A [`LocalizationContext`] is an explicit value handed to whatever needs a
//! translated keyword. Bundles are layered over the built-in English labels, so
//! a partial translation still yields a usable context.

use shared_types::ExtractionError;
use std::collections::HashMap;

pub const DEFAULT_LOCALE: &str = "en_US";

const ENGLISH_MESSAGES: &[(&str, &str)] = &[
    ("order.number", "Order Number:"),
    ("order.date", "Order Date:"),
    ("order.payment_method", "Payment Method:"),
    ("order.subtotal", "Subtotal:"),
    ("order.tax", "Tax:"),
    ("order.total", "Order Total:"),
    ("gift.recipient", "Gift sent to:"),
    ("gift.sender", "Gift from:"),
    ("gift.product", "Product:"),
    ("gift.message", "Message:"),
    ("gift.price", "Price:"),
    ("gift.redeem", "Redeem"),
    ("subscription.plan", "Plan:"),
    ("subscription.start_date", "Start Date:"),
    ("subscription.next_billing_date", "Next Billing Date:"),
    ("subscription.price", "Price:"),
    ("verification.link", "Verify"),
    ("verification.subject_code", "code"),
    ("password_reset.link", "Reset Password"),
];

#[derive(Debug, Clone)]
pub struct LocalizationContext {
    locale: String,
    messages: HashMap<String, String>,
}

impl LocalizationContext {
    pub fn english() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            messages: ENGLISH_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Load a bundle of `key = "text"` entries over the English defaults.
    ///
    /// Dotted keys and nested tables are flattened, so `[order] total = "..."`
    /// and `order.total = "..."` are equivalent.
    pub fn from_toml_str(locale: &str, bundle: &str) -> Result<Self, ExtractionError> {
        let table: toml::Table = bundle.parse().map_err(|e: toml::de::Error| {
            ExtractionError::ConfigError(format!("Invalid localization bundle for {locale}: {e}"))
        })?;

        let mut context = Self::english();
        context.locale = locale.to_string();
        flatten_into(&mut context.messages, "", &table)?;
        Ok(context)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Translated text for `key`, or the key itself when it is unknown
    pub fn get_message<'a>(&'a self, key: &'a str) -> &'a str {
        self.messages.get(key).map(String::as_str).unwrap_or(key)
    }
}

impl Default for LocalizationContext {
    fn default() -> Self {
        Self::english()
    }
}

fn flatten_into(
    messages: &mut HashMap<String, String>,
    prefix: &str,
    table: &toml::Table,
) -> Result<(), ExtractionError> {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            toml::Value::String(text) => {
                messages.insert(full_key, text.clone());
            }
            toml::Value::Table(nested) => flatten_into(messages, &full_key, nested)?,
            other => {
                return Err(ExtractionError::ConfigError(format!(
                    "Message {full_key} must be a string, found {}",
                    other.type_str()
                )))
            }
        }
    }
    Ok(())
}
