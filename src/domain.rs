use thiserror::Error;

use ratatui::crossterm::event::KeyEvent;

use crate::loader::FetchOutcome;
use crate::records::SortKey;

/// Default endpoint serving the application records as a JSON array.
pub const DEFAULT_URL: &str =
    "https://raw.githubusercontent.com/RashitKhamidullin/Educhain-Assignment/refs/heads/main/applications";

/// Rows shown per table page.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct AtvConfig {
    /// Milliseconds the controller waits for a terminal event per tick.
    pub event_poll_time: u64,
}

impl Default for AtvConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
        }
    }
}

#[derive(Debug)]
pub enum Message {
    Quit,
    /// Result of the one-shot record fetch.
    LoadFinished(FetchOutcome),
    /// Toggle or select the sort column.
    ToggleSort(SortKey),
    GotoPage(usize),
    NextPage,
    PrevPage,
    OpenSearch,
    /// Key forwarded verbatim to the search input while it is active.
    RawKey(KeyEvent),
    Resize(u16, u16),
}

#[derive(Debug, Error)]
pub enum AtvError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
