#[cfg(test)]
#[path = "loading_test.rs"]
mod tests;

use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const MAX_DOTS: usize = 3;

/// Shown in place of the input box while a reply is pending. Every UI tick
/// adds a dot so a slow webhook still looks alive.
#[derive(Default)]
pub struct Loading {
    ticks: usize,
}

impl Loading {
    pub fn tick(&mut self) {
        self.ticks = (self.ticks + 1) % MAX_DOTS;
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    pub fn message(&self, session_title: &str) -> String {
        let dots = ".".repeat(self.ticks + 1);
        return format!("Waiting for a reply in \"{session_title}\"{dots:<MAX_DOTS$}");
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, session_title: &str) {
        frame.render_widget(
            Paragraph::new(self.message(session_title))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Double)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .alignment(Alignment::Center),
            rect,
        );
    }
}
