//! Helper functions shared by the generator and templates
//!
//! URL building against `url`/`root`, HTML text helpers and date formats.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
