//! Interactive widget state: theme toggle, carousel and copy buttons
//!
//! The browser scripts in `assets/main.js` follow the same rules.

pub mod carousel;
pub mod clipboard;
pub mod theme;

pub use carousel::Carousel;
pub use clipboard::{copy_with_fallback, ClipboardBackend, ClipboardError, CopyButton};
pub use theme::{
    init_script, DisabledStorage, MemoryStorage, ParseThemeError, StorageError, Theme,
    ThemeController, ThemeStorage,
};
