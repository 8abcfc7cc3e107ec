#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::view;
use super::Bubble;
use crate::domain::models::MessageRenderer;
use crate::domain::models::RenderInstruction;

struct BubbleCacheEntry {
    instruction: RenderInstruction,
    lines: Vec<Line<'static>>,
}

/// Terminal renderer. Bubbles are cached by position and only rebuilt when
/// the instruction at that position or the window width changes.
#[derive(Default)]
pub struct BubbleList {
    cache: Vec<BubbleCacheEntry>,
    cursor: usize,
    line_width: usize,
}

impl BubbleList {
    /// Renders the full list of instructions, returning the number of
    /// bubbles that failed to render as intended.
    pub fn set_instructions(&mut self, instructions: &[RenderInstruction], line_width: usize) -> usize {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.cursor = 0;
        let failures = view::render_all(self, instructions);
        self.cache.truncate(self.cursor);

        return failures;
    }

    pub fn len(&self) -> usize {
        return self.cache.iter().map(|e| return e.lines.len()).sum();
    }

    pub fn is_empty(&self) -> bool {
        return self.cache.is_empty();
    }

    pub fn draw<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        let lines = self
            .cache
            .iter()
            .flat_map(|e| return e.lines.to_owned())
            .collect::<Vec<Line>>();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}

impl MessageRenderer for BubbleList {
    fn render(&mut self, instruction: &RenderInstruction) -> Result<()> {
        let idx = self.cursor;
        self.cursor += 1;

        if let Some(entry) = self.cache.get(idx) {
            if &entry.instruction == instruction {
                return Ok(());
            }
        }

        let (lines, err) = Bubble::new(instruction, self.line_width).as_lines();
        let entry = BubbleCacheEntry {
            instruction: instruction.clone(),
            lines,
        };
        if idx < self.cache.len() {
            self.cache[idx] = entry;
        } else {
            self.cache.push(entry);
        }

        if let Some(err) = err {
            return Err(err);
        }

        return Ok(());
    }
}
