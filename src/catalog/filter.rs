//! Post filtering by section, category and series

use std::collections::HashMap;

use super::query::NavigationSelection;
use super::section::Sections;
use crate::content::Post;

/// Whether a post satisfies every active predicate of the selection
///
/// Section, category and series are independent predicates and a post must
/// pass all of them. A section id missing from `sections` matches nothing.
pub fn matches(post: &Post, selection: &NavigationSelection, sections: &Sections) -> bool {
    if selection.has_section() {
        let in_section = sections
            .get(&selection.section)
            .map(|s| s.contains(&post.category))
            .unwrap_or(false);
        if !in_section {
            return false;
        }
    }

    if selection.has_category() && post.category != selection.category {
        return false;
    }

    match &selection.series {
        Some(series) => post.in_series(series),
        None => true,
    }
}

/// Narrow `posts` to the selection, keeping their order
pub fn filter_posts<'a>(
    posts: &'a [Post],
    selection: &NavigationSelection,
    sections: &Sections,
) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| matches(p, selection, sections))
        .collect()
}

/// Live post count per category
pub fn category_counts(posts: &[Post]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for post in posts {
        *counts.entry(post.category.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_post;

    fn sample() -> Vec<Post> {
        vec![
            test_post("p1", "2025-05-01", "Python"),
            test_post("l1", "2025-04-01", "LLM").with_series("llm", Some(1)),
            test_post("m1", "2025-03-01", "Machine Learning"),
            test_post("p2", "2025-02-01", "Python").with_series("python", Some(1)),
            test_post("l2", "2025-01-01", "LLM").with_series("llm", Some(2)),
        ]
    }

    fn titles(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn test_all_keeps_everything() {
        let posts = sample();
        let result = filter_posts(&posts, &NavigationSelection::all(), &Sections::default());
        assert_eq!(result.len(), posts.len());
    }

    #[test]
    fn test_section_filter_keeps_order() {
        let posts = sample();
        let result = filter_posts(
            &posts,
            &NavigationSelection::for_section("data-ai"),
            &Sections::default(),
        );
        assert_eq!(titles(&result), vec!["l1", "m1", "l2"]);
    }

    #[test]
    fn test_category_filter() {
        let posts = sample();
        let sections = Sections::default();
        let result = filter_posts(
            &posts,
            &NavigationSelection::for_category("Python", &sections),
            &sections,
        );
        assert_eq!(titles(&result), vec!["p1", "p2"]);
    }

    #[test]
    fn test_series_intersects_with_category() {
        let posts = sample();
        let sections = Sections::default();
        let result = filter_posts(&posts, &NavigationSelection::for_series("llm"), &sections);
        assert_eq!(titles(&result), vec!["l1", "l2"]);

        let sel = NavigationSelection::for_category("Python", &sections).with_series(Some("llm"));
        assert!(filter_posts(&posts, &sel, &sections).is_empty());
    }

    #[test]
    fn test_unknown_section_matches_nothing() {
        let posts = sample();
        let result = filter_posts(
            &posts,
            &NavigationSelection::for_section("ghost"),
            &Sections::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_result_is_subsequence() {
        let posts = sample();
        let sections = Sections::default();
        let selections = [
            NavigationSelection::all(),
            NavigationSelection::for_section("data-ai"),
            NavigationSelection::for_category("LLM", &sections),
            NavigationSelection::for_series("python"),
        ];
        for sel in &selections {
            let result = filter_posts(&posts, sel, &sections);
            let mut cursor = posts.iter();
            for post in result {
                assert!(
                    cursor.any(|p| std::ptr::eq(p, post)),
                    "{:?} broke input order",
                    sel
                );
            }
        }
    }

    #[test]
    fn test_category_counts() {
        let counts = category_counts(&sample());
        assert_eq!(counts["Python"], 2);
        assert_eq!(counts["LLM"], 2);
        assert_eq!(counts.get("DevOps"), None);
    }
}
