//! Application state and input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use dropsearch_core::Dropdown;
use dropsearch_core::session::{Completion, SearchCompletion};
use dropsearch_tui::row::ResultRow;
use dropsearch_types::Hit;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;
use std::time::Instant;
use tracing::debug;

/// Main application state
pub struct App {
    pub dropdown: Dropdown<ResultRow>,
    /// Selected row, as an index into the rendered rows
    pub selected: Option<usize>,
    pub list_state: ListState,
    pub should_quit: bool,
    /// Hit the user picked with Enter, printed on exit
    pub chosen: Option<Hit>,
    /// Last drawn areas, for mouse hit-testing
    pub input_area: Rect,
    pub cancel_area: Rect,
}

impl App {
    pub fn new(dropdown: Dropdown<ResultRow>) -> Self {
        Self {
            dropdown,
            selected: None,
            list_state: ListState::default(),
            should_quit: false,
            chosen: None,
            input_area: Rect::default(),
            cancel_area: Rect::default(),
        }
    }

    /// Row indices that can take the selection, in display order.
    fn selectable_rows(&self) -> Vec<usize> {
        self.dropdown
            .results()
            .rows()
            .enumerate()
            .filter(|(_, row)| row.element.is_selectable())
            .map(|(i, _)| i)
            .collect()
    }

    fn set_selected(&mut self, selected: Option<usize>) {
        self.selected = selected;
        self.list_state.select(selected);
    }

    pub fn select_next(&mut self) {
        let rows = self.selectable_rows();
        if rows.is_empty() {
            return;
        }
        let next = match self.selected {
            Some(current) => rows
                .iter()
                .copied()
                .find(|&i| i > current)
                .unwrap_or(rows[0]),
            None => rows[0],
        };
        self.set_selected(Some(next));
    }

    pub fn select_previous(&mut self) {
        let rows = self.selectable_rows();
        let Some(&last) = rows.last() else {
            return;
        };
        let previous = match self.selected {
            Some(current) => rows
                .iter()
                .rev()
                .copied()
                .find(|&i| i < current)
                .unwrap_or(last),
            None => last,
        };
        self.set_selected(Some(previous));
    }

    #[must_use]
    pub fn selected_hit(&self) -> Option<&Hit> {
        let selected = self.selected?;
        self.dropdown
            .results()
            .rows()
            .nth(selected)
            .and_then(|row| row.element.hit())
    }

    /// Route a completion into the widget. A new result set resets the
    /// selection to its first hit.
    pub fn apply(&mut self, completion: SearchCompletion) -> Completion {
        let outcome = self.dropdown.apply(completion);
        if outcome == Completion::Applied {
            let first = self.selectable_rows().first().copied();
            self.set_selected(first);
        }
        outcome
    }

    fn text_edited(&mut self, changed: bool) {
        if changed && self.dropdown.text().is_empty() {
            self.set_selected(None);
        }
    }

    /// Handle a key press. Returns true if anything changed.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
            self.should_quit = true;
            return true;
        }

        if !self.dropdown.is_focused() {
            return match key.code {
                KeyCode::Esc => {
                    self.should_quit = true;
                    true
                }
                KeyCode::Char(c) if !ctrl => {
                    self.dropdown.focus(now);
                    let changed = self.dropdown.insert_char(c);
                    self.text_edited(changed);
                    true
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => self.dropdown.focus(now),
                _ => false,
            };
        }

        match key.code {
            KeyCode::Esc => {
                let closed = self.dropdown.cancel(now);
                if closed {
                    self.set_selected(None);
                }
                closed
            }
            KeyCode::Enter => {
                if let Some(hit) = self.selected_hit().cloned() {
                    debug!("Chose hit at row {:?}", self.selected);
                    self.chosen = Some(hit);
                    self.should_quit = true;
                    true
                } else {
                    false
                }
            }
            KeyCode::Down | KeyCode::Tab => {
                self.select_next();
                true
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.select_previous();
                true
            }
            KeyCode::Char('n') if ctrl => {
                self.select_next();
                true
            }
            KeyCode::Char('p') if ctrl => {
                self.select_previous();
                true
            }
            KeyCode::Char('u') if ctrl => {
                let changed = self.dropdown.set_text("");
                self.text_edited(changed);
                changed
            }
            KeyCode::Char(c) if !ctrl => {
                let changed = self.dropdown.insert_char(c);
                self.text_edited(changed);
                changed
            }
            KeyCode::Backspace => {
                let changed = self.dropdown.delete_char();
                self.text_edited(changed);
                changed
            }
            KeyCode::Delete => {
                let changed = self.dropdown.delete_forward();
                self.text_edited(changed);
                changed
            }
            KeyCode::Left => {
                self.dropdown.move_cursor_left();
                true
            }
            KeyCode::Right => {
                self.dropdown.move_cursor_right();
                true
            }
            KeyCode::Home => {
                self.dropdown.move_cursor_home();
                true
            }
            KeyCode::End => {
                self.dropdown.move_cursor_end();
                true
            }
            _ => false,
        }
    }

    /// Clicking the input focuses it; clicking the cancel control cancels.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> bool {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return false;
        }
        let at = Position::new(mouse.column, mouse.row);

        if self.cancel_area.contains(at) {
            let closed = self.dropdown.cancel(now);
            if closed {
                self.set_selected(None);
            }
            return closed;
        }
        if self.input_area.contains(at) {
            return self.dropdown.focus(now);
        }
        false
    }
}
