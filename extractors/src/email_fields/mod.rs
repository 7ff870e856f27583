//! Selector and keyword based field extraction from HTML email bodies.
//!
//! A [`FieldQuery`] picks elements with a CSS selector, narrows them to the
//! ones whose text contains every keyword, and derives a value according to
//! its [`ValueRule`]. Queries that find nothing contribute no field.

mod document;
pub mod templates;

pub use document::{element_text, parse_selector, EmailDocument};
pub use templates::{extract_document, extractor_for, TemplateExtractor};

use regex::Regex;
use scraper::ElementRef;
use shared_types::{ExtractionError, FieldMap, FieldQuery, KeywordSet, ValueRule};

use crate::normalizer::{contains_ignore_case, normalize_amount};

/// First element matching `selector` whose text contains every keyword.
///
/// A layout cell wrapping the real label also contains the keywords, so only
/// matches with no matching element inside them are considered.
pub fn get_element_matching_keywords<'a>(
    document: &'a EmailDocument,
    selector: &str,
    keywords: &KeywordSet,
) -> Result<Option<ElementRef<'a>>, ExtractionError> {
    Ok(get_elements_matching_selector(document, selector, Some(keywords))?
        .into_iter()
        .next())
}

/// All elements matching `selector` in document order, optionally narrowed to
/// the innermost ones whose text contains every keyword
pub fn get_elements_matching_selector<'a>(
    document: &'a EmailDocument,
    selector: &str,
    keywords: Option<&KeywordSet>,
) -> Result<Vec<ElementRef<'a>>, ExtractionError> {
    let selector = parse_selector(selector)?;
    let elements = document.select(&selector);

    Ok(match keywords {
        Some(keywords) => innermost(
            elements
                .into_iter()
                .filter(|element| {
                    contains_ignore_case(&element_text(element), keywords.as_slice())
                })
                .collect(),
        ),
        None => elements,
    })
}

/// Text of the element right after the first label in `elements`.
///
/// Only innermost labels count: an element that holds another label from
/// `elements` is skipped. Returns `None` when no element is a label, when the
/// label is the last element, or when the following element has no text.
pub fn value_following_label<F>(elements: &[ElementRef<'_>], is_label: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let labels: Vec<usize> = elements
        .iter()
        .enumerate()
        .filter(|(_, element)| is_label(&element_text(element)))
        .map(|(index, _)| index)
        .collect();

    let index = labels.iter().copied().find(|&outer| {
        !labels
            .iter()
            .any(|&inner| is_inside(&elements[inner], &elements[outer]))
    })?;
    let value = element_text(elements.get(index + 1)?);

    (!value.is_empty()).then_some(value)
}

/// Drop every element that has another element of the list inside it
fn innermost<'a>(elements: Vec<ElementRef<'a>>) -> Vec<ElementRef<'a>> {
    elements
        .iter()
        .filter(|outer| !elements.iter().any(|inner| is_inside(inner, outer)))
        .copied()
        .collect()
}

/// Whether `inner` is a strict descendant of `outer`
fn is_inside(inner: &ElementRef<'_>, outer: &ElementRef<'_>) -> bool {
    inner.ancestors().any(|ancestor| ancestor.id() == outer.id())
}

/// Run every query against the document, in order.
///
/// A query without a match, or whose value comes out empty, adds no key.
pub fn extract_fields(
    document: &EmailDocument,
    queries: &[FieldQuery],
) -> Result<FieldMap, ExtractionError> {
    let mut fields = FieldMap::new();

    for query in queries {
        if let Some(value) = extract_value(document, query)? {
            fields.insert(query.name.clone(), value);
        }
    }

    Ok(fields)
}

/// Value for a single query, or `None` when it matches nothing
pub fn extract_value(
    document: &EmailDocument,
    query: &FieldQuery,
) -> Result<Option<String>, ExtractionError> {
    let value = match &query.value {
        ValueRule::NextElement | ValueRule::NextElementAmount => {
            let elements = get_elements_matching_selector(document, &query.selector, None)?;
            let value = value_following_label(&elements, |text| {
                contains_ignore_case(text, query.keywords.as_slice())
            });
            match query.value {
                ValueRule::NextElementAmount => value.map(|v| normalize_amount(&v)),
                _ => value,
            }
        }
        rule => {
            let Some(element) =
                get_element_matching_keywords(document, &query.selector, &query.keywords)?
            else {
                return Ok(None);
            };

            match rule {
                ValueRule::Text => Some(element_text(&element)),
                ValueRule::LastToken => element_text(&element)
                    .split(' ')
                    .last()
                    .map(str::to_string),
                ValueRule::AfterLabel => {
                    text_after_keyword(&element_text(&element), &query.keywords)?
                }
                ValueRule::Attribute(name) => {
                    element.value().attr(name).map(|v| v.trim().to_string())
                }
                ValueRule::NextElement | ValueRule::NextElementAmount => None,
            }
        }
    };

    Ok(value.filter(|v| !v.is_empty()))
}

/// Text following the first keyword, matched case-insensitively
fn text_after_keyword(
    text: &str,
    keywords: &KeywordSet,
) -> Result<Option<String>, ExtractionError> {
    let Some(label) = keywords.first() else {
        return Ok(Some(text.to_string()));
    };

    let pattern = format!("(?i){}", regex::escape(label));
    let regex = Regex::new(&pattern).map_err(|e| ExtractionError::InvalidPattern {
        pattern,
        reason: e.to_string(),
    })?;

    Ok(regex
        .find(text)
        .map(|m| text[m.end()..].trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEIPT: &str = r#"<html><body>
<table>
  <tr><td align=right>Order Number: 1010341341828</td></tr>
  <tr><td>Order Date:</td><td>Oct 18, 2026</td></tr>
  <tr><td>Payment Method:</td><td>PayPal</td></tr>
  <tr><td>Order Total:</td><td>$1,234.56</td></tr>
  <tr><td>Gift from: Alice Example</td></tr>
</table>
<a href="https://example.com/redeem?code=XYZ">Redeem your gift</a>
</body></html>"#;

    fn keywords(words: &[&str]) -> KeywordSet {
        KeywordSet::new(words.iter().copied())
    }

    #[test]
    fn test_element_matching_keywords_uses_and() {
        let document = EmailDocument::parse_html(RECEIPT);

        let found =
            get_element_matching_keywords(&document, "td", &keywords(&["order", "number"]))
                .unwrap()
                .unwrap();
        assert_eq!(element_text(&found), "Order Number: 1010341341828");

        let missing =
            get_element_matching_keywords(&document, "td", &keywords(&["order", "refund"])).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_elements_matching_selector_keeps_document_order() {
        let document = EmailDocument::parse_html(RECEIPT);

        let all = get_elements_matching_selector(&document, "td", None).unwrap();
        assert_eq!(all.len(), 8);

        let orders =
            get_elements_matching_selector(&document, "td", Some(&keywords(&["order"]))).unwrap();
        let texts: Vec<String> = orders.iter().map(element_text).collect();
        assert_eq!(
            texts,
            vec!["Order Number: 1010341341828", "Order Date:", "Order Total:"]
        );
    }

    #[test]
    fn test_invalid_selector_propagates() {
        let document = EmailDocument::parse_html(RECEIPT);
        assert!(get_elements_matching_selector(&document, "td[", None).is_err());
        assert!(get_element_matching_keywords(&document, ":::", &KeywordSet::empty()).is_err());
    }

    #[test]
    fn test_non_html_document_matches_nothing() {
        let message = shared_types::RawMessage::plain("Receipt", RECEIPT);
        let document = EmailDocument::from_message(&message);

        assert!(get_elements_matching_selector(&document, "td", None)
            .unwrap()
            .is_empty());
        assert!(get_element_matching_keywords(&document, "td", &keywords(&["order"]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_value_following_label() {
        let document = EmailDocument::parse_html(RECEIPT);
        let cells = get_elements_matching_selector(&document, "td", None).unwrap();

        let value = value_following_label(&cells, |text| text.contains("Payment Method:"));
        assert_eq!(value.as_deref(), Some("PayPal"));
    }

    #[test]
    fn test_value_following_label_at_end_is_none() {
        let document = EmailDocument::parse_html(RECEIPT);
        let cells = get_elements_matching_selector(&document, "td", None).unwrap();

        assert!(value_following_label(&cells, |text| text.starts_with("Gift from")).is_none());
        assert!(value_following_label(&cells, |text| text == "Nothing").is_none());
        assert!(value_following_label(&[], |_| true).is_none());
    }

    const NESTED_RECEIPT: &str = r#"<html><body>
<table width="100%"><tr><td align="center">
  <table>
    <tr><td>Order Number: 1010341341828</td></tr>
    <tr><td>Payment Method:</td><td>PayPal</td></tr>
    <tr><td>Order Total:</td><td>$1,234.56</td></tr>
  </table>
</td></tr></table>
</body></html>"#;

    #[test]
    fn test_layout_cell_is_not_a_label() {
        let document = EmailDocument::parse_html(NESTED_RECEIPT);
        let cells = get_elements_matching_selector(&document, "td", None).unwrap();
        assert_eq!(cells.len(), 6);

        let value = value_following_label(&cells, |text| text.contains("Payment Method:"));
        assert_eq!(value.as_deref(), Some("PayPal"));

        let found =
            get_element_matching_keywords(&document, "td", &keywords(&["Order Number:"]))
                .unwrap()
                .unwrap();
        assert_eq!(element_text(&found), "Order Number: 1010341341828");

        let orders =
            get_elements_matching_selector(&document, "td", Some(&keywords(&["order"]))).unwrap();
        let texts: Vec<String> = orders.iter().map(element_text).collect();
        assert_eq!(texts, vec!["Order Number: 1010341341828", "Order Total:"]);
    }

    #[test]
    fn test_value_following_label_empty_next_cell() {
        let document =
            EmailDocument::parse_html("<table><tr><td>Tax:</td><td>  </td></tr></table>");
        let cells = get_elements_matching_selector(&document, "td", None).unwrap();
        assert!(value_following_label(&cells, |text| text == "Tax:").is_none());
    }

    #[test]
    fn test_order_number_last_token() {
        let document = EmailDocument::parse_html(
            "<table><tr><td align=right>Order Number: 1010341341828</td></tr></table>",
        );
        let query = FieldQuery::new(
            "order_number",
            "td",
            keywords(&["Order Number:"]),
            ValueRule::LastToken,
        );

        let fields = extract_fields(&document, &[query]).unwrap();
        assert_eq!(fields.get("order_number"), Some("1010341341828"));
    }

    #[test]
    fn test_extract_fields_all_rules() {
        let document = EmailDocument::parse_html(RECEIPT);
        let queries = vec![
            FieldQuery::new(
                "order_number",
                "td",
                keywords(&["Order Number:"]),
                ValueRule::LastToken,
            ),
            FieldQuery::new(
                "payment_method",
                "td",
                keywords(&["Payment Method:"]),
                ValueRule::NextElement,
            ),
            FieldQuery::new(
                "total",
                "td",
                keywords(&["Order Total:"]),
                ValueRule::NextElementAmount,
            ),
            FieldQuery::new("sender", "td", keywords(&["gift FROM:"]), ValueRule::AfterLabel),
            FieldQuery::new(
                "redeem_link",
                "a[href]",
                keywords(&["Redeem"]),
                ValueRule::Attribute("href".to_string()),
            ),
            FieldQuery::new("date_cell", "td", keywords(&["Oct"]), ValueRule::Text),
        ];

        let fields = extract_fields(&document, &queries).unwrap();
        assert_eq!(
            fields.iter().collect::<Vec<_>>(),
            vec![
                ("order_number", "1010341341828"),
                ("payment_method", "PayPal"),
                ("total", "1234.56"),
                ("sender", "Alice Example"),
                ("redeem_link", "https://example.com/redeem?code=XYZ"),
                ("date_cell", "Oct 18, 2026"),
            ]
        );
    }

    #[test]
    fn test_missing_field_is_absent_not_empty() {
        let document = EmailDocument::parse_html(RECEIPT);
        let queries = vec![
            FieldQuery::new(
                "order_number",
                "td",
                keywords(&["Order Number:"]),
                ValueRule::LastToken,
            ),
            FieldQuery::new("tax", "td", keywords(&["Tax:"]), ValueRule::NextElementAmount),
            FieldQuery::new("coupon", "td", keywords(&["Coupon"]), ValueRule::Text),
        ];

        let fields = extract_fields(&document, &queries).unwrap();
        assert_eq!(fields.len(), 1);
        assert!(!fields.contains_key("tax"));
        assert!(!fields.contains_key("coupon"));
    }

    #[test]
    fn test_later_query_overwrites_same_key() {
        let document = EmailDocument::parse_html(RECEIPT);
        let queries = vec![
            FieldQuery::new("value", "td", keywords(&["Order Date:"]), ValueRule::NextElement),
            FieldQuery::new("value", "td", keywords(&["Payment Method:"]), ValueRule::NextElement),
        ];

        let fields = extract_fields(&document, &queries).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("value"), Some("PayPal"));
    }
}
