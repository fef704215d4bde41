//! Copy-to-clipboard for code blocks

use std::time::Duration;

use thiserror::Error;

/// Button label before copying
pub const COPY_LABEL: &str = "Copy";

/// Button label after a successful copy
pub const COPIED_LABEL: &str = "Copied!";

/// How long the copied label stays
pub const COPIED_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard is not available")]
    Unavailable,

    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

pub trait ClipboardBackend {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Write `text` with `primary`, falling back to `fallback`.
///
/// Returns whether either backend succeeded. Failures are logged, never raised.
pub fn copy_with_fallback(
    primary: &mut dyn ClipboardBackend,
    fallback: &mut dyn ClipboardBackend,
    text: &str,
) -> bool {
    match primary.write_text(text) {
        Ok(()) => return true,
        Err(e) => tracing::debug!("Clipboard write failed, trying fallback: {}", e),
    }

    match fallback.write_text(text) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Fallback clipboard write failed: {}", e);
            false
        }
    }
}

/// Label state of one copy button
#[derive(Debug, Clone, Default)]
pub struct CopyButton {
    copied_for: Option<Duration>,
}

impl CopyButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self) -> &'static str {
        if self.copied_for.is_some() {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    /// Copy `text` and switch to the copied label on success
    pub fn click(
        &mut self,
        primary: &mut dyn ClipboardBackend,
        fallback: &mut dyn ClipboardBackend,
        text: &str,
    ) -> bool {
        let ok = copy_with_fallback(primary, fallback, text);
        if ok {
            self.copied_for = Some(Duration::ZERO);
        }
        ok
    }

    pub fn advance(&mut self, elapsed: Duration) {
        if let Some(shown) = self.copied_for {
            let shown = shown + elapsed;
            self.copied_for = (shown < COPIED_DURATION).then_some(shown);
        }
    }
}
