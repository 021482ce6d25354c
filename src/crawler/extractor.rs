//! Record extraction from listing pages
//!
//! Pure HTML-to-records extraction for the quote listing layout: each
//! `div.quote` element yields one record with its text, author, and tag
//! list, and `li.next a` advertises the next page. Extraction never fails;
//! missing sub-elements degrade to empty fields and a page without record
//! elements yields an empty batch.

use scraper::{ElementRef, Html, Selector};

/// One extracted listing item
///
/// Field order is fixed (text, author, tags) and preserved verbatim into
/// every sink. Fields may be empty strings; the record itself is never
/// omitted when its container element was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Primary quote text
    pub text: String,

    /// Attribution
    pub author: String,

    /// Comma-joined tag list
    pub tags: String,
}

impl Record {
    /// Column names, in record field order
    pub const FIELD_NAMES: [&'static str; 3] = ["quote", "author", "tags"];

    /// Field values, in the same order as [`Record::FIELD_NAMES`]
    pub fn field_values(&self) -> [&str; 3] {
        [&self.text, &self.author, &self.tags]
    }
}

/// Result of extracting one fetched page
#[derive(Debug, Clone, Default)]
pub struct PageExtract {
    /// Records in document order
    pub records: Vec<Record>,

    /// Href of the next-page link, verbatim (absolute or relative).
    /// `None` means the listing has no further page.
    pub next_href: Option<String>,
}

/// Extracts all records and the next-page reference from raw HTML
///
/// The extractor performs no I/O and no URL resolution; relative
/// `next_href` values are resolved by the controller against the URL the
/// page was fetched from.
pub fn extract_records(html: &str) -> PageExtract {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    if let Ok(quote_selector) = Selector::parse("div.quote") {
        for element in document.select(&quote_selector) {
            records.push(extract_record(&element));
        }
    }

    let next_href = Selector::parse("li.next a")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr("href"))
                .map(str::to_string)
        });

    PageExtract { records, next_href }
}

/// Extracts one record from a quote container element
fn extract_record(element: &ElementRef) -> Record {
    let text = select_text(element, "span.text");
    let author = select_text(element, "small.author");

    let tags = Selector::parse("div.tags a.tag")
        .ok()
        .map(|selector| {
            element
                .select(&selector)
                .map(|tag| collect_text(&tag))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    Record { text, author, tags }
}

/// Text of the first descendant matching `selector`, or empty string
fn select_text(element: &ElementRef, selector: &str) -> String {
    Selector::parse(selector)
        .ok()
        .and_then(|selector| element.select(&selector).next())
        .map(|found| collect_text(&found))
        .unwrap_or_default()
}

/// Concatenated, trimmed text content of an element
fn collect_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
