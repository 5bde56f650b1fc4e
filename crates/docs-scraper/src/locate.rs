//! Tag lookup over parsed HTML with a fail-fast contract.
//!
//! A [`TagQuery`] names a tag and optional attribute filters. Searches walk
//! the descendants of a root element depth-first in document order; the root
//! itself never matches.

use std::backtrace::Backtrace;
use std::fmt;

use regex::Regex;
use scraper::ElementRef;

use crate::types::{ScrapeError, ScrapeResult};

/// How an attribute value must look for a query to match.
#[derive(Debug, Clone)]
pub enum AttrFilter {
    /// Value equals the string exactly.
    Equals(String),
    /// Whitespace-separated token list contains the string (for `class`).
    HasToken(String),
    /// Value matches the regular expression.
    Matches(Regex),
}

impl AttrFilter {
    fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Equals(expected) => value == expected,
            Self::HasToken(token) => value.split_whitespace().any(|t| t == token),
            Self::Matches(re) => re.is_match(value),
        }
    }
}

/// Tag name plus attribute filters, all of which must hold.
#[derive(Debug, Clone)]
pub struct TagQuery {
    tag: String,
    attrs: Vec<(String, AttrFilter)>,
}

impl TagQuery {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .push((name.to_string(), AttrFilter::Equals(value.to_string())));
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.attrs
            .push(("class".to_string(), AttrFilter::HasToken(class.to_string())));
        self
    }

    pub fn attr_matches(mut self, name: &str, pattern: Regex) -> Self {
        self.attrs
            .push((name.to_string(), AttrFilter::Matches(pattern)));
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        let el = element.value();
        el.name().eq_ignore_ascii_case(&self.tag)
            && self.attrs.iter().all(|(name, filter)| {
                el.attr(name).map(|v| filter.accepts(v)).unwrap_or(false)
            })
    }

    /// Attribute filters as `{name: value, ...}`, empty braces when none.
    pub fn describe_filter(&self) -> String {
        let parts: Vec<String> = self
            .attrs
            .iter()
            .map(|(name, filter)| match filter {
                AttrFilter::Equals(v) | AttrFilter::HasToken(v) => format!("'{name}': '{v}'"),
                AttrFilter::Matches(re) => format!("'{name}': /{}/", re.as_str()),
            })
            .collect();
        format!("{{{}}}", parts.join(", "))
    }
}

impl fmt::Display for TagQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}", self.tag, self.describe_filter())
    }
}

/// Descendant search over a document tree.
pub trait TagTree<'a> {
    /// First descendant matching `query`, in document order.
    fn find_first(&self, query: &TagQuery) -> Option<ElementRef<'a>>;

    /// Every descendant matching `query`, in document order.
    fn find_all(&self, query: &TagQuery) -> Vec<ElementRef<'a>>;
}

impl<'a> TagTree<'a> for ElementRef<'a> {
    fn find_first(&self, query: &TagQuery) -> Option<ElementRef<'a>> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| query.matches(el))
    }

    fn find_all(&self, query: &TagQuery) -> Vec<ElementRef<'a>> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|el| query.matches(el))
            .collect()
    }
}

/// Find the first descendant matching `query` or fail with `TagNotFound`.
pub fn locate<'a, T: TagTree<'a>>(root: &T, query: &TagQuery) -> ScrapeResult<ElementRef<'a>> {
    root.find_first(query).ok_or_else(|| {
        let filter = query.describe_filter();
        tracing::error!(
            "Tag not found: <{}> {filter}\n{}",
            query.tag(),
            Backtrace::force_capture()
        );
        ScrapeError::TagNotFound {
            tag: query.tag().to_string(),
            filter,
        }
    })
}

/// All text under `element`, concatenated.
pub fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect()
}
