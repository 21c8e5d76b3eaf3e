//! Field extractors for grant web pages.
//!
//! Locating the right block on a page happens upstream; these functions receive a
//! [`FieldFragment`] (a heading plus the HTML that follows it) and turn it into a
//! typed value for a [`GrantRecord`].

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::models::{FieldFragment, GrantRecord, GrantSource, WebGrantPage};

/// Characters searched for a date after each deadline keyword
const DEADLINE_WINDOW_CHARS: usize = 100;

static RE_AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\s*(\d[\d,]*)").unwrap());
static RE_DEADLINE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:deadline|due|closes|close date)\b").unwrap());
static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").unwrap());

static SEL_LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static SEL_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// First `$` amount in `text`, commas stripped and cents dropped; 0 when absent
pub fn extract_amount(text: &str) -> u64 {
    RE_AMOUNT
        .captures(text)
        .and_then(|caps| caps[1].replace(',', "").parse().ok())
        .unwrap_or(0)
}

/// First `M/D/YYYY`-style date within the window after a deadline keyword
pub fn extract_deadline(text: &str) -> String {
    RE_DEADLINE_KEYWORD
        .find_iter(text)
        .find_map(|keyword| {
            let rest = &text[keyword.end()..];
            let window_end = rest
                .char_indices()
                .nth(DEADLINE_WINDOW_CHARS)
                .map(|(idx, _)| idx)
                .unwrap_or(rest.len());
            RE_DATE.find(&rest[..window_end]).map(|d| d.as_str().to_string())
        })
        .unwrap_or_default()
}

/// Visible text of the fragment body with whitespace collapsed
pub fn extract_text(fragment: &FieldFragment) -> String {
    let html = Html::parse_fragment(&fragment.html);
    collapse_whitespace(html.root_element().text())
}

/// Flatten the fragment body into list entries
///
/// List items become entries. Without list items, each paragraph (or the whole body)
/// is split on commas when it has any, else kept whole.
pub fn extract_list(fragment: &FieldFragment) -> Vec<String> {
    let html = Html::parse_fragment(&fragment.html);

    let items: Vec<String> = html
        .select(&SEL_LIST_ITEM)
        .map(|li| collapse_whitespace(li.text()))
        .filter(|item| !item.is_empty())
        .collect();
    if !items.is_empty() {
        return items;
    }

    let mut paragraphs: Vec<String> = html
        .select(&SEL_PARAGRAPH)
        .map(|p| collapse_whitespace(p.text()))
        .collect();
    if paragraphs.is_empty() {
        paragraphs.push(collapse_whitespace(html.root_element().text()));
    }

    paragraphs
        .into_iter()
        .flat_map(|paragraph| {
            if paragraph.contains(',') {
                paragraph
                    .split(',')
                    .map(|part| part.trim().to_string())
                    .collect::<Vec<_>>()
            } else {
                vec![paragraph]
            }
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Assemble a grant record from the per-field fragments of a web page
pub fn build_web_grant(page: &WebGrantPage) -> GrantRecord {
    let text_of = |fragment: &Option<FieldFragment>| {
        fragment.as_ref().map(extract_text).unwrap_or_default()
    };
    let list_of = |fragment: &Option<FieldFragment>| {
        fragment.as_ref().map(extract_list).unwrap_or_default()
    };

    let description = text_of(&page.description);

    let amount = page
        .amount
        .as_ref()
        .map(|f| extract_amount(&format!("{} {}", f.heading, extract_text(f))))
        .filter(|amount| *amount > 0)
        .unwrap_or_else(|| extract_amount(&description));

    let deadline = page
        .deadline
        .as_ref()
        .map(|f| extract_deadline(&format!("{} {}", f.heading, extract_text(f))))
        .unwrap_or_default();

    let grant = GrantRecord {
        title: page.title.trim().to_string(),
        funder: text_of(&page.funder),
        amount,
        deadline,
        description,
        url: page.url.clone(),
        eligibility: list_of(&page.eligibility),
        requirements: list_of(&page.requirements),
        focus_areas: list_of(&page.focus_areas),
        geography: list_of(&page.geography),
        source: GrantSource::DirectUrl,
    };

    tracing::debug!(
        "Built web grant '{}' (amount: {}, deadline: '{}', {} focus areas)",
        grant.title,
        grant.amount,
        grant.deadline,
        grant.focus_areas.len()
    );

    grant
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
