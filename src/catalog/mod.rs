//! Catalog - sections, filtering, pagination and series over the loaded posts

mod filter;
mod navigation;
mod paginate;
mod query;
mod section;
mod series;

pub use filter::{category_counts, filter_posts, matches};
pub use navigation::{
    build_menu, CategoryEntry, MobileDrawer, NavMenu, NavigationState, SectionTab,
};
pub use paginate::{page_window, paginate, total_pages, Page, PageWindow, MAX_VISIBLE_PAGES, PAGE_SIZE};
pub use query::{
    parse_navigation_selection, parse_page, parse_query, path_segment, NavigationSelection,
};
pub use section::{Section, Sections, ALL_CATEGORIES, ALL_SECTIONS};
pub use series::{collect_series, series_neighbours, series_posts, Series, SeriesNeighbours};
