//! Sections: static groupings of categories used by the navigation menus

use serde::{Deserialize, Serialize};

/// Pseudo-section id meaning "no section filter"
pub const ALL_SECTIONS: &str = "all";

/// Pseudo-category meaning "no category filter"
pub const ALL_CATEGORIES: &str = "All";

/// A named group of categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Section {
    pub fn new(id: &str, name: &str, categories: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Whether this section lists the given category
    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Ordered collection of sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sections(Vec<Section>);

impl Sections {
    pub fn new(sections: Vec<Section>) -> Self {
        Self(sections)
    }

    /// Look up a section by id. `all` is not a real section and returns `None`.
    pub fn get(&self, id: &str) -> Option<&Section> {
        self.0.iter().find(|s| s.id == id)
    }

    /// Id of the section containing `category`, or `all` when no section lists it
    pub fn section_for_category(&self, category: &str) -> &str {
        self.0
            .iter()
            .find(|s| s.contains(category))
            .map(|s| s.id.as_str())
            .unwrap_or(ALL_SECTIONS)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self(vec![
            Section::new(
                "cs-fundamentals",
                "CS Fundamentals",
                &["Operating Systems", "Data Structures", "Networking", "Database"],
            ),
            Section::new(
                "languages-frameworks",
                "Languages & Frameworks",
                &["Python", "FastAPI", "TypeScript", "Next.js"],
            ),
            Section::new(
                "data-ai",
                "Data & AI",
                &["Machine Learning", "Deep Learning", "LLM"],
            ),
            Section::new(
                "architecture",
                "Architecture",
                &["System Design", "Software Engineering"],
            ),
            Section::new(
                "infrastructure",
                "Infrastructure",
                &["Linux & Cloud", "DevOps", "MLOps"],
            ),
        ])
    }
}

impl<'a> IntoIterator for &'a Sections {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_for_category() {
        let sections = Sections::default();
        assert_eq!(sections.section_for_category("LLM"), "data-ai");
        assert_eq!(sections.section_for_category("DevOps"), "infrastructure");
        assert_eq!(sections.section_for_category("Gardening"), ALL_SECTIONS);
    }

    #[test]
    fn test_get_section() {
        let sections = Sections::default();
        let section = sections.get("architecture").unwrap();
        assert_eq!(section.name, "Architecture");
        assert!(section.contains("System Design"));
        assert!(sections.get(ALL_SECTIONS).is_none());
    }

    #[test]
    fn test_parse_sections_yaml() {
        let yaml = r#"
- id: lang
  name: Languages
  categories: [Rust, Go]
- id: misc
  name: Misc
"#;
        let sections: Sections = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections.section_for_category("Go"), "lang");
        assert!(sections.get("misc").unwrap().categories.is_empty());
    }
}
