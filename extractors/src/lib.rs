//! Extractors Crate
//!
//! Text normalization and structured field extraction for the emails the
//! game client sends (order confirmations, gifts, subscriptions, account
//! verification).
//!
//! # Architecture
//!
//! - **Types**: field queries, field maps and the `Extractor` trait live in the `shared-types` crate
//! - **Normalizer**: pure helpers turning localized text into comparable forms
//! - **Email fields**: selector + keyword queries over parsed HTML bodies, composed per document class
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{extractor_for, LocalizationContext};
//! use shared_types::{DocumentClass, Extractor, RawMessage};
//!
//! let extractor = extractor_for(DocumentClass::OrderConfirmation, &LocalizationContext::english());
//! let fields = extractor.extract(&RawMessage::html("Your order", body))?;
//! println!("{:?}", fields.get("total"));
//! ```

pub mod email_fields;
pub mod localization;
pub mod normalizer;

// Re-export commonly used types
pub use email_fields::{extract_document, extractor_for, EmailDocument, TemplateExtractor};
pub use localization::LocalizationContext;

// Re-export the Extractor trait from shared-types for convenience
pub use shared_types::Extractor;
