//! Series: ordered groups of posts across categories

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::SeriesMeta;
use crate::content::Post;

/// A series with at least one post
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color: Option<String>,
    pub post_count: usize,
}

/// Collect the series referenced by `posts`.
///
/// Configured series come first in configuration order, then unknown ids in
/// order of first appearance. Series without posts are omitted.
pub fn collect_series(posts: &[Post], meta: &IndexMap<String, SeriesMeta>) -> Vec<Series> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for id in posts.iter().filter_map(|p| p.series.as_deref()) {
        *counts.entry(id).or_insert(0) += 1;
    }

    let configured = meta
        .keys()
        .filter_map(|id| counts.get(id.as_str()).map(|n| (id.as_str(), *n)));
    let unknown = counts
        .iter()
        .filter(|(id, _)| !meta.contains_key(**id))
        .map(|(id, n)| (*id, *n));

    configured
        .chain(unknown)
        .map(|(id, post_count)| {
            let info = meta.get(id);
            Series {
                id: id.to_string(),
                title: info
                    .map(|m| m.title.clone())
                    .unwrap_or_else(|| id.to_string()),
                description: info.map(|m| m.description.clone()).unwrap_or_default(),
                color: info.and_then(|m| m.color.clone()),
                post_count,
            }
        })
        .collect()
}

/// Posts of a series in reading order: `series_order`, then date ascending
pub fn series_posts<'a>(posts: &'a [Post], series: &str) -> Vec<&'a Post> {
    let mut list: Vec<&Post> = posts.iter().filter(|p| p.in_series(series)).collect();
    list.sort_by(|a, b| {
        let order = |p: &Post| p.series_order.unwrap_or(u32::MAX);
        order(a)
            .cmp(&order(b))
            .then_with(|| a.date.cmp(&b.date))
            .then_with(|| a.title.cmp(&b.title))
    });
    list
}

/// Where a post sits inside its series
#[derive(Debug, Clone, Serialize)]
pub struct SeriesNeighbours<'a> {
    pub series: String,
    /// 1-based position
    pub position: usize,
    pub total: usize,
    pub prev: Option<&'a Post>,
    pub next: Option<&'a Post>,
    pub posts: Vec<&'a Post>,
}

/// Previous/next posts in the series of `post`, if it has one
pub fn series_neighbours<'a>(posts: &'a [Post], post: &Post) -> Option<SeriesNeighbours<'a>> {
    let series = post.series.as_deref()?;
    let list = series_posts(posts, series);
    let index = list.iter().position(|p| p.id == post.id)?;

    Some(SeriesNeighbours {
        series: series.to_string(),
        position: index + 1,
        total: list.len(),
        prev: index.checked_sub(1).map(|i| list[i]),
        next: list.get(index + 1).copied(),
        posts: list,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_post;

    fn meta() -> IndexMap<String, SeriesMeta> {
        let mut meta = IndexMap::new();
        for id in ["python", "llm"] {
            meta.insert(
                id.to_string(),
                SeriesMeta {
                    title: format!("{} series", id),
                    description: String::new(),
                    color: None,
                },
            );
        }
        meta
    }

    fn sample() -> Vec<Post> {
        vec![
            test_post("c", "2025-03-01", "LLM").with_series("llm", Some(3)),
            test_post("x", "2025-02-15", "Rust").with_series("rust", None),
            test_post("a", "2025-02-01", "LLM").with_series("llm", Some(1)),
            test_post("b", "2025-01-01", "LLM").with_series("llm", Some(2)),
            test_post("plain", "2025-01-01", "Python"),
        ]
    }

    #[test]
    fn test_collect_series_order_and_counts() {
        let series = collect_series(&sample(), &meta());
        let ids: Vec<_> = series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["llm", "rust"]);
        assert_eq!(series[0].post_count, 3);
        assert_eq!(series[0].title, "llm series");
        assert_eq!(series[1].title, "rust");
    }

    #[test]
    fn test_series_posts_reading_order() {
        let posts = sample();
        let titles: Vec<_> = series_posts(&posts, "llm")
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_neighbours() {
        let posts = sample();
        let middle = posts.iter().find(|p| p.title == "b").unwrap();
        let n = series_neighbours(&posts, middle).unwrap();
        assert_eq!(n.position, 2);
        assert_eq!(n.total, 3);
        assert_eq!(n.prev.map(|p| p.title.as_str()), Some("a"));
        assert_eq!(n.next.map(|p| p.title.as_str()), Some("c"));

        let plain = posts.iter().find(|p| p.title == "plain").unwrap();
        assert!(series_neighbours(&posts, plain).is_none());
    }
}
