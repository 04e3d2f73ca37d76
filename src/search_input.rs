use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line editor behind the search bar. The current text is applied to
/// the filter after every keystroke; Enter or Esc only returns focus to the
/// table and leaves the text in place.
#[derive(Debug, Default)]
pub struct SearchInput {
    text: String,
    cursor: usize, // char position
    active: bool,
}

impl SearchInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.cursor = self.text.chars().count();
    }

    /// Feed one key. Returns true while the input keeps focus.
    pub fn read(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) | (KeyCode::Esc, KeyModifiers::NONE) => {
                self.active = false;
            }
            (KeyCode::Backspace, KeyModifiers::NONE) => self.backspace(),
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                if self.cursor < self.text.chars().count() {
                    self.cursor += 1;
                }
            }
            (code, _) => {
                if let Some(chr) = code.as_char() {
                    self.text.insert(self.byte_pos(self.cursor), chr);
                    self.cursor += 1;
                }
            }
        }
        self.active
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text.remove(self.byte_pos(self.cursor));
        }
    }

    fn byte_pos(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len())
    }
}
