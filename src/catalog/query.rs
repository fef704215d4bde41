//! URL query parsing into a navigation selection
//!
//! Listing state lives in the query string (`?section=data-ai&category=LLM`).
//! Everything that reads it goes through [`parse_navigation_selection`].

use indexmap::IndexMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use super::section::{Sections, ALL_CATEGORIES, ALL_SECTIONS};

/// Characters escaped when writing query values
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>');

/// Which section, category and series a listing shows
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NavigationSelection {
    pub section: String,
    pub category: String,
    pub series: Option<String>,
}

impl Default for NavigationSelection {
    fn default() -> Self {
        Self {
            section: ALL_SECTIONS.to_string(),
            category: ALL_CATEGORIES.to_string(),
            series: None,
        }
    }
}

impl NavigationSelection {
    /// The unfiltered selection
    pub fn all() -> Self {
        Self::default()
    }

    /// Every category of one section
    pub fn for_section(section: &str) -> Self {
        Self {
            section: section.to_string(),
            ..Self::default()
        }
    }

    /// A single category, with its section derived from the section list
    pub fn for_category(category: &str, sections: &Sections) -> Self {
        Self {
            section: sections.section_for_category(category).to_string(),
            category: category.to_string(),
            series: None,
        }
    }

    /// All posts of a series
    pub fn for_series(series: &str) -> Self {
        Self {
            series: Some(series.to_string()),
            ..Self::default()
        }
    }

    /// Same selection restricted to a series
    pub fn with_series(mut self, series: Option<&str>) -> Self {
        self.series = series.map(|s| s.to_string());
        self
    }

    pub fn has_section(&self) -> bool {
        self.section != ALL_SECTIONS
    }

    pub fn has_category(&self) -> bool {
        self.category != ALL_CATEGORIES
    }

    /// True when no filter is active
    pub fn is_all(&self) -> bool {
        !self.has_section() && !self.has_category() && self.series.is_none()
    }

    /// Canonical query string, empty for the unfiltered selection
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        if self.has_section() {
            pairs.push(format!("section={}", encode(&self.section)));
        }
        if self.has_category() {
            pairs.push(format!("category={}", encode(&self.category)));
        }
        if let Some(series) = &self.series {
            pairs.push(format!("series={}", encode(series)));
        }

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }

    /// Path of the pre-rendered listing page for this selection
    ///
    /// `page` is 1-based; page 1 lives at the listing root.
    pub fn listing_path(&self, page: usize) -> String {
        let mut path = String::from("/");
        if self.has_section() {
            path.push_str(&format!("section/{}/", path_segment(&self.section)));
        }
        if self.has_category() {
            path.push_str(&format!("category/{}/", path_segment(&self.category)));
        }
        if let Some(series) = &self.series {
            path.push_str(&format!("series/{}/", path_segment(series)));
        }
        if page > 1 {
            path.push_str(&format!("page/{}/", page));
        }
        path
    }
}

/// URL path segment for a section, category or series name
///
/// `+` and `#` are spelled out so `C`, `C++` and `C#` stay apart.
pub fn path_segment(name: &str) -> String {
    slug::slugify(name.replace('+', " plus ").replace('#', " sharp "))
}

/// Parse a query string into `key -> values`, keeping repeated keys
///
/// A leading `?` is optional. `+` decodes to a space.
pub fn parse_query(query: &str) -> IndexMap<String, Vec<String>> {
    let mut params: IndexMap<String, Vec<String>> = IndexMap::new();

    for pair in query.trim_start_matches('?').split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params
            .entry(decode(key))
            .or_default()
            .push(decode(value));
    }

    params
}

/// A parameter that appears exactly once with a non-empty value
fn single<'a>(params: &'a IndexMap<String, Vec<String>>, key: &str) -> Option<&'a str> {
    match params.get(key).map(|v| v.as_slice()) {
        Some([value]) if !value.trim().is_empty() => Some(value.as_str()),
        _ => None,
    }
}

/// Decode `category`, `section` and `series` from a query string
///
/// Missing, empty or repeated parameters fall back to their defaults.
/// An unknown section is treated as `all`. When the category is not part of
/// the requested section, the category wins and the section is derived from it.
pub fn parse_navigation_selection(query: &str, sections: &Sections) -> NavigationSelection {
    let params = parse_query(query);

    let category = single(&params, "category")
        .unwrap_or(ALL_CATEGORIES)
        .to_string();
    let series = single(&params, "series").map(|s| s.to_string());

    let explicit_section = single(&params, "section").and_then(|id| sections.get(id));

    let section = if category != ALL_CATEGORIES {
        match explicit_section {
            Some(section) if section.contains(&category) => section.id.clone(),
            _ => sections.section_for_category(&category).to_string(),
        }
    } else {
        explicit_section
            .map(|s| s.id.clone())
            .unwrap_or_else(|| ALL_SECTIONS.to_string())
    };

    NavigationSelection {
        section,
        category,
        series,
    }
}

/// Requested page number (`page=N`), defaulting to 1
pub fn parse_page(query: &str) -> usize {
    single(&parse_query(query), "page")
        .and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

fn decode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .to_string()
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, QUERY_VALUE).to_string()
}
