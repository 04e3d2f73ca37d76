use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::oneshot;
use tracing::trace;

use crate::domain::{AtvConfig, AtvError, Message};
use crate::loader::FetchOutcome;
use crate::model::Model;
use crate::records::SortKey;

pub struct Controller {
    event_poll_time: u64,
    load_rx: Option<oneshot::Receiver<FetchOutcome>>,
}

impl Controller {
    pub fn new(cfg: &AtvConfig, load_rx: oneshot::Receiver<FetchOutcome>) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
            load_rx: Some(load_rx),
        }
    }

    /// One tick: deliver the fetch result if it arrived, otherwise poll the
    /// terminal for at most the configured timeout.
    pub fn handle_event(&mut self, model: &Model) -> Result<Option<Message>, AtvError> {
        if let Some(rx) = self.load_rx.as_mut() {
            match rx.try_recv() {
                Ok(outcome) => {
                    self.load_rx = None;
                    return Ok(Some(Message::LoadFinished(outcome)));
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    // Loader task died without reporting; nothing more to wait for.
                    self.load_rx = None;
                }
            }
        }

        if event::poll(Duration::from_millis(self.event_poll_time))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if model.raw_keyevents() {
                        return Ok(Some(Message::RawKey(key)));
                    }
                    return Ok(Self::map_key(key.code));
                }
                Event::Resize(width, height) => {
                    return Ok(Some(Message::Resize(width, height)));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn map_key(code: KeyCode) -> Option<Message> {
        let message = match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
            KeyCode::Char('/') => Some(Message::OpenSearch),
            KeyCode::Char('a') => Some(Message::ToggleSort(SortKey::ApplicationNumber)),
            KeyCode::Char('n') => Some(Message::ToggleSort(SortKey::ApplicantName)),
            KeyCode::Char('d') => Some(Message::ToggleSort(SortKey::ApplicationDate)),
            KeyCode::Left => Some(Message::PrevPage),
            KeyCode::Right => Some(Message::NextPage),
            KeyCode::Char(c @ '1'..='9') => {
                Some(Message::GotoPage(c.to_digit(10).unwrap_or(1) as usize))
            }
            _ => None,
        };
        trace!("Mapped: {code:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_map_to_the_three_sortable_columns() {
        assert!(matches!(
            Controller::map_key(KeyCode::Char('a')),
            Some(Message::ToggleSort(SortKey::ApplicationNumber))
        ));
        assert!(matches!(
            Controller::map_key(KeyCode::Char('n')),
            Some(Message::ToggleSort(SortKey::ApplicantName))
        ));
        assert!(matches!(
            Controller::map_key(KeyCode::Char('d')),
            Some(Message::ToggleSort(SortKey::ApplicationDate))
        ));
    }

    #[test]
    fn digits_jump_to_that_page() {
        assert!(matches!(
            Controller::map_key(KeyCode::Char('7')),
            Some(Message::GotoPage(7))
        ));
    }

    #[test]
    fn unbound_keys_map_to_nothing() {
        assert!(Controller::map_key(KeyCode::Char('x')).is_none());
        assert!(Controller::map_key(KeyCode::Home).is_none());
    }
}
