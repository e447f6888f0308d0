//! HTML parser for results pages
//!
//! This module handles reading a fetched results page:
//! - The total page count from the pagination text
//! - One journal record per name block, with affiliation and accreditation
//!   aligned by position

use crate::config::{parse_selector, LayoutConfig};
use crate::record::JournalRecord;
use crate::{ConfigError, HarvestError};
use scraper::{ElementRef, Html, Selector};

/// A fetched and parsed results page
pub struct ResultsPage {
    url: String,
    document: Html,
}

impl ResultsPage {
    /// Parses an HTML body fetched from `url`
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

/// Compiled selectors for every field of a results page
#[derive(Debug, Clone)]
pub struct PageLayout {
    pagination: Selector,
    name: Selector,
    affiliation: Selector,
    accreditation: Selector,
    link: Selector,
}

impl PageLayout {
    /// Compiles the selectors of a layout configuration
    pub fn compile(config: &LayoutConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            pagination: parse_selector("pagination", &config.pagination)?,
            name: parse_selector("name", &config.name)?,
            affiliation: parse_selector("affiliation", &config.affiliation)?,
            accreditation: parse_selector("accreditation", &config.accreditation)?,
            link: parse_selector("link", &config.link)?,
        })
    }
}

/// Reads the total number of result pages from the pagination text
///
/// The text looks like `Page 1 of 56 | Total Records : 1109`; the page count
/// is the integer right after the first `of` token. Thousands separators are
/// ignored.
///
/// # Errors
///
/// Returns `HarvestError::NotFound` when the pagination container is missing
/// or its text has no page count. Both mean the keyword produced no results.
pub fn read_total_pages(page: &ResultsPage, layout: &PageLayout) -> Result<u32, HarvestError> {
    let element = page
        .document
        .select(&layout.pagination)
        .next()
        .ok_or_else(|| HarvestError::not_found(format!("no pagination text on {}", page.url)))?;

    let text = element_text(&element);
    parse_page_count(&text).ok_or_else(|| {
        HarvestError::not_found(format!("unrecognised pagination text '{}'", text))
    })
}

/// Extracts the page count from a pagination summary
fn parse_page_count(text: &str) -> Option<u32> {
    let mut tokens = text.split_whitespace();
    tokens.find(|token| token.eq_ignore_ascii_case("of"))?;

    let count: String = tokens
        .next()?
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();

    count.parse().ok()
}

/// Extracts one record per name block on the page
///
/// Affiliation and accreditation blocks are matched to name blocks by
/// position. When a page has fewer of them than name blocks, the trailing
/// records get an empty string for that field.
///
/// # Errors
///
/// Returns `HarvestError::NotFound` when the page has no name blocks at all.
pub fn extract_records(
    page: &ResultsPage,
    layout: &PageLayout,
) -> Result<Vec<JournalRecord>, HarvestError> {
    let names: Vec<ElementRef> = page.document.select(&layout.name).collect();
    if names.is_empty() {
        return Err(HarvestError::not_found(format!(
            "no journal entries on {}",
            page.url
        )));
    }

    let affiliations: Vec<String> = page
        .document
        .select(&layout.affiliation)
        .map(|el| element_text(&el))
        .collect();
    let accreditations: Vec<String> = page
        .document
        .select(&layout.accreditation)
        .map(|el| element_text(&el))
        .collect();

    let records = names
        .iter()
        .enumerate()
        .map(|(i, name)| JournalRecord {
            name: element_text(name),
            link: first_link(name, &layout.link),
            affiliation: affiliations.get(i).cloned().unwrap_or_default(),
            accreditation: accreditations.get(i).cloned().unwrap_or_default(),
        })
        .collect();

    Ok(records)
}

/// Trimmed text content of an element and all its descendants
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// `href` of the first matching anchor inside `element`, or empty
fn first_link(element: &ElementRef, link: &Selector) -> String {
    element
        .select(link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .unwrap_or_default()
}
