use scraper::{ElementRef, Html, Selector};
use shared_types::{ExtractionError, RawMessage};

/// A parsed email body, owned by a single extraction call.
///
/// Non-HTML messages produce a document without a tree; every selection on
/// it comes back empty.
pub struct EmailDocument {
    html: Option<Html>,
}

impl EmailDocument {
    pub fn from_message(message: &RawMessage) -> Self {
        if message.is_html() {
            Self::parse_html(&message.body)
        } else {
            Self { html: None }
        }
    }

    pub fn parse_html(body: &str) -> Self {
        Self {
            html: Some(Html::parse_document(body)),
        }
    }

    pub fn is_html(&self) -> bool {
        self.html.is_some()
    }

    /// All elements matching `selector`, in document order
    pub fn select<'a>(&'a self, selector: &Selector) -> Vec<ElementRef<'a>> {
        match &self.html {
            Some(html) => html.select(selector).collect(),
            None => Vec::new(),
        }
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Text of an element with runs of whitespace collapsed to single spaces
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
