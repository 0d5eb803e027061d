//! Single-line text input state owned by the dropdown.

/// Text, cursor (in chars) and focus of the search input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
    focused: bool,
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in chars.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Returns true if focus changed.
    pub fn focus(&mut self) -> bool {
        !std::mem::replace(&mut self.focused, true)
    }

    /// Returns true if focus changed.
    pub fn blur(&mut self) -> bool {
        std::mem::replace(&mut self.focused, false)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Replace the whole text and put the cursor at the end. Returns true if the
    /// text changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text.to_string();
        self.cursor = self.char_count();
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Backspace. Returns true if a char was removed.
    pub fn delete_char(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
        true
    }

    /// Delete under the cursor. Returns true if a char was removed.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.char_count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut input = TextInput::new();
        input.insert_char('a');
        input.insert_char('b');
        assert_eq!(input.text(), "ab");
        assert_eq!(input.cursor(), 2);

        assert!(input.delete_char());
        assert_eq!(input.text(), "a");
        assert!(input.delete_char());
        assert!(!input.delete_char());
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_insert_mid_text_multibyte() {
        let mut input = TextInput::new();
        input.set_text("café");
        input.move_cursor_left();
        input.insert_char('ß');
        assert_eq!(input.text(), "cafßé");
        assert_eq!(input.cursor(), 4);

        input.move_cursor_home();
        assert!(input.delete_forward());
        assert_eq!(input.text(), "afßé");
    }

    #[test]
    fn test_cursor_clamped() {
        let mut input = TextInput::new();
        input.set_text("ab");
        input.move_cursor_right();
        assert_eq!(input.cursor(), 2);
        input.move_cursor_home();
        input.move_cursor_left();
        assert_eq!(input.cursor(), 0);
        input.move_cursor_end();
        assert!(!input.delete_forward());
    }

    #[test]
    fn test_focus_and_blur_report_changes() {
        let mut input = TextInput::new();
        assert!(input.focus());
        assert!(!input.focus());
        assert!(input.is_focused());
        assert!(input.blur());
        assert!(!input.blur());
    }

    #[test]
    fn test_set_text_reports_changes() {
        let mut input = TextInput::new();
        assert!(input.set_text("rust"));
        assert!(!input.set_text("rust"));
        input.clear();
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor(), 0);
    }
}
