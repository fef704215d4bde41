//! Navigation state and the menu models rendered by the desktop bar and mobile drawer

use std::collections::HashMap;

use serde::Serialize;

use super::query::{parse_navigation_selection, parse_page, NavigationSelection};
use super::section::{Sections, ALL_CATEGORIES, ALL_SECTIONS};

/// Current selection plus pagination, as held by a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    selection: NavigationSelection,
    current_page: usize,
    scroll_to_top: bool,
}

impl NavigationState {
    pub fn new(selection: NavigationSelection) -> Self {
        Self {
            selection,
            current_page: 1,
            scroll_to_top: false,
        }
    }

    /// Restore state from a listing URL query (`?section=…&page=…`)
    pub fn from_query(query: &str, sections: &Sections) -> Self {
        Self {
            selection: parse_navigation_selection(query, sections),
            current_page: parse_page(query),
            scroll_to_top: false,
        }
    }

    pub fn selection(&self) -> &NavigationSelection {
        &self.selection
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Select a whole section, or `all`. Clears category and series.
    pub fn select_section(&mut self, section: &str, sections: &Sections) {
        let section = if sections.get(section).is_some() {
            section
        } else {
            ALL_SECTIONS
        };
        self.change(NavigationSelection {
            section: section.to_string(),
            category: ALL_CATEGORIES.to_string(),
            series: None,
        });
    }

    /// Select a category; its section is derived from the section list
    pub fn select_category(&mut self, category: &str, sections: &Sections) {
        let selection = if category == ALL_CATEGORIES {
            NavigationSelection {
                section: self.selection.section.clone(),
                ..NavigationSelection::all()
            }
        } else {
            NavigationSelection::for_category(category, sections)
        };
        self.change(selection.with_series(self.selection.series.as_deref()));
    }

    /// Restrict to a series, or clear the series filter with `None`
    pub fn select_series(&mut self, series: Option<&str>) {
        let selection = self.selection.clone().with_series(series);
        self.change(selection);
    }

    pub fn clear_series(&mut self) {
        self.select_series(None);
    }

    /// Move to another page of the current listing
    pub fn go_to_page(&mut self, page: usize) {
        let page = page.max(1);
        if page != self.current_page {
            self.current_page = page;
            self.scroll_to_top = true;
        }
    }

    /// Returns true once after a change that should scroll the viewport to the top
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }

    /// URL of the current state (pre-rendered listing path)
    pub fn path(&self) -> String {
        self.selection.listing_path(self.current_page)
    }

    fn change(&mut self, selection: NavigationSelection) {
        if selection != self.selection {
            self.selection = selection;
            self.current_page = 1;
            self.scroll_to_top = true;
        }
    }
}

/// One category entry in a menu
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub name: String,
    pub count: usize,
    pub active: bool,
    /// Listing link, absent when the category has no posts
    pub href: Option<String>,
}

/// One section tab with its categories
#[derive(Debug, Clone, Serialize)]
pub struct SectionTab {
    pub id: String,
    pub name: String,
    pub href: String,
    pub active: bool,
    /// The section itself is selected with no category
    pub all_active: bool,
    pub categories: Vec<CategoryEntry>,
}

/// Menu model shared by the desktop bar and the mobile drawer
#[derive(Debug, Clone, Serialize)]
pub struct NavMenu {
    pub all_href: String,
    pub all_active: bool,
    pub sections: Vec<SectionTab>,
    /// Populated categories that belong to no section, by name
    pub others: Vec<CategoryEntry>,
    pub others_active: bool,
}

/// Build the menu for the given selection and live category counts
pub fn build_menu(
    selection: &NavigationSelection,
    sections: &Sections,
    counts: &HashMap<String, usize>,
) -> NavMenu {
    let tabs = sections
        .iter()
        .map(|section| {
            let active = selection.section == section.id;
            let categories = section
                .categories
                .iter()
                .map(|name| {
                    let count = counts.get(name).copied().unwrap_or(0);
                    CategoryEntry {
                        name: name.clone(),
                        count,
                        active: active && selection.category == *name,
                        href: (count > 0).then(|| {
                            NavigationSelection::for_category(name, sections).listing_path(1)
                        }),
                    }
                })
                .collect();

            SectionTab {
                id: section.id.clone(),
                name: section.name.clone(),
                href: NavigationSelection::for_section(&section.id).listing_path(1),
                active,
                all_active: active && !selection.has_category(),
                categories,
            }
        })
        .collect();

    let mut others: Vec<CategoryEntry> = counts
        .iter()
        .filter(|(name, count)| **count > 0 && sections.section_for_category(name) == ALL_SECTIONS)
        .map(|(name, count)| CategoryEntry {
            name: name.clone(),
            count: *count,
            active: selection.category == *name,
            href: Some(NavigationSelection::for_category(name, sections).listing_path(1)),
        })
        .collect();
    others.sort_by(|a, b| a.name.cmp(&b.name));

    NavMenu {
        all_href: NavigationSelection::all().listing_path(1),
        all_active: !selection.has_section() && !selection.has_category(),
        sections: tabs,
        others_active: others.iter().any(|c| c.active),
        others,
    }
}

/// Open/closed state of the mobile drawer and its expanded section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MobileDrawer {
    open: bool,
    expanded: Option<String>,
}

impl MobileDrawer {
    /// A closed drawer with the selected section expanded
    pub fn new(selection: &NavigationSelection) -> Self {
        Self {
            open: false,
            expanded: selection.has_section().then(|| selection.section.clone()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Expand a section, collapsing any other; toggling the expanded one collapses it
    pub fn toggle_section(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }

    /// Following a link applies the selection and closes the drawer
    pub fn follow(&mut self, state: &mut NavigationState, category: &str, sections: &Sections) {
        state.select_category(category, sections);
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_change_resets_page() {
        let sections = Sections::default();
        let mut state = NavigationState::from_query("?page=3", &sections);
        assert_eq!(state.current_page(), 3);

        state.select_category("LLM", &sections);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.selection().section, "data-ai");
        assert!(state.take_scroll_request());
        assert!(!state.take_scroll_request());
    }

    #[test]
    fn test_page_change_requests_scroll() {
        let mut state = NavigationState::new(NavigationSelection::all());
        state.go_to_page(2);
        assert_eq!(state.path(), "/page/2/");
        assert!(state.take_scroll_request());

        state.go_to_page(2);
        assert!(!state.take_scroll_request());
    }

    #[test]
    fn test_select_section_clears_category() {
        let sections = Sections::default();
        let mut state = NavigationState::from_query("?category=Python", &sections);
        state.select_section("data-ai", &sections);
        assert_eq!(state.selection(), &NavigationSelection::for_section("data-ai"));

        state.select_series(Some("llm"));
        state.select_section("unknown", &sections);
        assert!(state.selection().is_all());
    }

    #[test]
    fn test_series_is_kept_across_category_change() {
        let sections = Sections::default();
        let mut state = NavigationState::new(NavigationSelection::for_series("llm"));
        state.select_category("LLM", &sections);
        assert_eq!(state.selection().series.as_deref(), Some("llm"));
        state.clear_series();
        assert_eq!(state.selection(), &NavigationSelection::for_category("LLM", &sections));
    }

    #[test]
    fn test_menu_marks_active_and_disables_empty() {
        let sections = Sections::default();
        let counts = HashMap::from([("LLM".to_string(), 2), ("Python".to_string(), 1)]);
        let selection = NavigationSelection::for_category("LLM", &sections);

        let menu = build_menu(&selection, &sections, &counts);
        assert!(!menu.all_active);

        let data_ai = menu.sections.iter().find(|s| s.id == "data-ai").unwrap();
        assert!(data_ai.active);
        assert!(!data_ai.all_active);

        let llm = data_ai.categories.iter().find(|c| c.name == "LLM").unwrap();
        assert!(llm.active);
        assert_eq!(llm.count, 2);
        assert_eq!(llm.href.as_deref(), Some("/section/data-ai/category/llm/"));

        let dl = data_ai
            .categories
            .iter()
            .find(|c| c.name == "Deep Learning")
            .unwrap();
        assert_eq!(dl.count, 0);
        assert!(dl.href.is_none());
    }

    #[test]
    fn test_menu_lists_categories_outside_sections() {
        let sections = Sections::default();
        let counts = HashMap::from([
            ("Uncategorized".to_string(), 3),
            ("Cooking".to_string(), 1),
            ("LLM".to_string(), 2),
        ]);

        let menu = build_menu(&NavigationSelection::all(), &sections, &counts);
        let names: Vec<_> = menu.others.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cooking", "Uncategorized"]);
        assert_eq!(menu.others[1].href.as_deref(), Some("/category/uncategorized/"));
        assert!(!menu.others_active);

        let selection = NavigationSelection::for_category("Cooking", &sections);
        let menu = build_menu(&selection, &sections, &counts);
        assert!(menu.others_active);
        assert!(menu.others[0].active);
        assert!(!menu.all_active);
    }

    #[test]
    fn test_drawer_expands_one_section() {
        let sections = Sections::default();
        let mut drawer = MobileDrawer::new(&NavigationSelection::for_section("data-ai"));
        assert!(drawer.is_expanded("data-ai"));

        drawer.toggle_section("architecture");
        assert!(drawer.is_expanded("architecture"));
        assert!(!drawer.is_expanded("data-ai"));
        drawer.toggle_section("architecture");
        assert!(!drawer.is_expanded("architecture"));

        let mut state = NavigationState::new(NavigationSelection::all());
        drawer.open();
        drawer.follow(&mut state, "DevOps", &sections);
        assert!(!drawer.is_open());
        assert_eq!(state.selection().section, "infrastructure");
    }
}
