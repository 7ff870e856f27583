//! Field layouts of the emails the client sends.
//!
//! Every document class is a fixed, ordered list of queries. Label keywords
//! are looked up in a [`LocalizationContext`] so localized emails read the
//! same way as English ones.

use shared_types::{
    DocumentClass, ExtractionError, Extractor, FieldMap, FieldQuery, KeywordSet, RawMessage,
    ValueRule,
};

use super::{extract_fields, EmailDocument};
use crate::localization::LocalizationContext;
use crate::normalizer::{contains_ignore_case, remove_non_digits};

/// A field read from the subject line: present when the subject holds the
/// keywords, value is the digits in the subject
#[derive(Debug, Clone)]
struct SubjectCode {
    name: String,
    keywords: KeywordSet,
}

/// Extractor for one document class, driven by its query list
#[derive(Debug, Clone)]
pub struct TemplateExtractor {
    class: DocumentClass,
    queries: Vec<FieldQuery>,
    subject_code: Option<SubjectCode>,
}

impl TemplateExtractor {
    pub fn new(class: DocumentClass, queries: Vec<FieldQuery>) -> Self {
        Self {
            class,
            queries,
            subject_code: None,
        }
    }

    fn with_subject_code(mut self, name: &str, keywords: KeywordSet) -> Self {
        self.subject_code = Some(SubjectCode {
            name: name.to_string(),
            keywords,
        });
        self
    }

    fn subject_fields(&self, subject: &str) -> FieldMap {
        let mut fields = FieldMap::new();

        if let Some(code) = &self.subject_code {
            if contains_ignore_case(subject, code.keywords.as_slice()) {
                let digits = remove_non_digits(subject);
                if !digits.is_empty() {
                    fields.insert(code.name.clone(), digits);
                }
            }
        }

        fields
    }
}

impl Extractor for TemplateExtractor {
    fn document_class(&self) -> DocumentClass {
        self.class
    }

    fn queries(&self) -> &[FieldQuery] {
        &self.queries
    }

    fn extract(&self, message: &RawMessage) -> Result<FieldMap, ExtractionError> {
        if !message.is_html() {
            return Ok(FieldMap::new());
        }

        let document = EmailDocument::from_message(message);
        let mut fields = extract_fields(&document, &self.queries)?;
        fields.extend(self.subject_fields(&message.subject));

        Ok(fields)
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

fn label(context: &LocalizationContext, key: &str) -> KeywordSet {
    KeywordSet::new([context.get_message(key)])
}

fn cell(name: &str, keywords: KeywordSet, value: ValueRule) -> FieldQuery {
    FieldQuery::new(name, "td", keywords, value)
}

fn link(name: &str, keywords: KeywordSet) -> FieldQuery {
    FieldQuery::new(name, "a[href]", keywords, ValueRule::Attribute("href".to_string()))
}

/// Build the extractor for a document class
pub fn extractor_for(class: DocumentClass, context: &LocalizationContext) -> TemplateExtractor {
    let l = |key: &str| label(context, key);

    match class {
        DocumentClass::OrderConfirmation => TemplateExtractor::new(
            class,
            vec![
                cell("order_number", l("order.number"), ValueRule::LastToken),
                cell("order_date", l("order.date"), ValueRule::NextElement),
                cell("payment_method", l("order.payment_method"), ValueRule::NextElement),
                cell("subtotal", l("order.subtotal"), ValueRule::NextElementAmount),
                cell("tax", l("order.tax"), ValueRule::NextElementAmount),
                cell("total", l("order.total"), ValueRule::NextElementAmount),
            ],
        ),
        DocumentClass::GiftSent => TemplateExtractor::new(
            class,
            vec![
                cell("recipient", l("gift.recipient"), ValueRule::AfterLabel),
                cell("product_name", l("gift.product"), ValueRule::NextElement),
                cell("order_number", l("order.number"), ValueRule::LastToken),
                cell("gift_message", l("gift.message"), ValueRule::NextElement),
                cell("price", l("gift.price"), ValueRule::NextElementAmount),
            ],
        ),
        DocumentClass::GiftReceived => TemplateExtractor::new(
            class,
            vec![
                cell("sender", l("gift.sender"), ValueRule::AfterLabel),
                cell("product_name", l("gift.product"), ValueRule::NextElement),
                cell("gift_message", l("gift.message"), ValueRule::NextElement),
                link("redeem_link", l("gift.redeem")),
            ],
        ),
        DocumentClass::NewSubscription => TemplateExtractor::new(
            class,
            vec![
                cell("plan", l("subscription.plan"), ValueRule::NextElement),
                cell("order_number", l("order.number"), ValueRule::LastToken),
                cell("start_date", l("subscription.start_date"), ValueRule::NextElement),
                cell(
                    "next_billing_date",
                    l("subscription.next_billing_date"),
                    ValueRule::NextElement,
                ),
                cell("payment_method", l("order.payment_method"), ValueRule::NextElement),
                cell("price", l("subscription.price"), ValueRule::NextElementAmount),
            ],
        ),
        DocumentClass::EmailVerification => TemplateExtractor::new(
            class,
            vec![link("verification_link", l("verification.link"))],
        )
        .with_subject_code("verification_code", l("verification.subject_code")),
        DocumentClass::PasswordReset => TemplateExtractor::new(
            class,
            vec![link("reset_link", l("password_reset.link"))],
        ),
    }
}

/// Extract every field of `class` from a message
pub fn extract_document(
    class: DocumentClass,
    message: &RawMessage,
    context: &LocalizationContext,
) -> Result<FieldMap, ExtractionError> {
    extractor_for(class, context).extract(message)
}
