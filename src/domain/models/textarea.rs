#[cfg(test)]
#[path = "textarea_test.rs"]
mod tests;

use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Widget;
use tui_textarea::Input;

const HINT: &str = "Enter to send, Ctrl+N new chat, Tab switch chat";

/// The message being written, addressed to the active session.
pub struct TextArea<'a> {
    inner: tui_textarea::TextArea<'a>,
    title: String,
}

impl<'a> Default for TextArea<'a> {
    fn default() -> TextArea<'a> {
        let mut textarea = TextArea {
            inner: tui_textarea::TextArea::default(),
            title: String::new(),
        };
        textarea.set_session_title("");

        return textarea;
    }
}

impl<'a> TextArea<'a> {
    pub fn title(&self) -> &str {
        return &self.title;
    }

    /// Names the session the message will go to in the box border.
    pub fn set_session_title(&mut self, session_title: &str) {
        let title = if session_title.is_empty() {
            format!("Message ({HINT})")
        } else {
            format!("Message to \"{session_title}\" ({HINT})")
        };
        if title == self.title {
            return;
        }

        self.inner.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(title.to_string())
                .padding(Padding::new(1, 1, 0, 0)),
        );
        self.title = title;
    }

    pub fn input(&mut self, input: Input) {
        self.inner.input(input);
    }

    /// Inserts pasted text, which may span several lines.
    pub fn insert_str(&mut self, text: String) {
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                self.inner.insert_newline();
            }
            self.inner.insert_str(line.trim_end_matches('\r'));
        }
    }

    pub fn text(&self) -> String {
        return self.inner.lines().join("\n");
    }

    /// Empties the box, keeping its border.
    pub fn clear(&mut self) {
        let block = self.inner.block().cloned();
        self.inner = tui_textarea::TextArea::default();
        if let Some(block) = block {
            self.inner.set_block(block);
        }
    }

    pub fn widget(&self) -> impl Widget + '_ {
        return self.inner.widget();
    }
}
