#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::wrap_text;
use crate::domain::models::RenderInstruction;
use crate::domain::models::Sender;

#[derive(Debug, PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    instruction: &'a RenderInstruction,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

fn repeat_from_subtractions(text: &str, total: usize, subtractions: &[usize]) -> String {
    let count = subtractions
        .iter()
        .fold(total, |acc, e| return acc.saturating_sub(*e));

    return text.repeat(count);
}

impl<'a> Bubble<'a> {
    pub fn new(instruction: &'a RenderInstruction, window_max_width: usize) -> Bubble<'a> {
        let alignment = match instruction.sender() {
            Sender::User => BubbleAlignment::Right,
            Sender::Bot => BubbleAlignment::Left,
        };

        return Bubble {
            alignment,
            instruction,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // Unicode character border + padding.
            bubble_padding: 8,
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
        };
    }

    /// Bubble lines for the instruction, and the render failure if the body
    /// could not be displayed as intended. A failed chart still produces a
    /// bubble holding its placeholder.
    pub fn as_lines(&self) -> (Vec<Line<'static>>, Option<anyhow::Error>) {
        let (text_lines, err) = self.instruction.text_lines();
        let username = self.instruction.sender().display_name();
        let max_line_length = self.get_max_line_length(&text_lines, &username);

        let lines = text_lines
            .iter()
            .flat_map(|line| return wrap_text(line, max_line_length))
            .map(|line| return self.spans_to_line(line, max_line_length))
            .collect::<Vec<Line<'static>>>();

        return (
            self.wrap_lines_in_bubble(lines, max_line_length, &username),
            err,
        );
    }

    fn spans_to_line(&self, text: String, max_line_length: usize) -> Line<'static> {
        let fill = repeat_from_subtractions(" ", max_line_length, &[text.chars().count()]);
        let outer_bubble_padding = repeat_from_subtractions(
            " ",
            self.window_max_width,
            &[max_line_length, Bubble::style_config().bubble_padding],
        );

        let mut wrapped_spans = vec![
            self.highlight_span("│ ".to_string()),
            self.highlight_span(text),
            self.highlight_span(format!("{fill} │")),
        ];

        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(Span::from(outer_bubble_padding));
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![Span::from(outer_bubble_padding)];
        line_spans.append(&mut wrapped_spans);

        return Line::from(line_spans);
    }

    fn get_max_line_length(&self, text_lines: &[String], username: &str) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        let max_allowed = self
            .window_max_width
            .saturating_sub(line_border_width)
            .max(1);

        let longest = text_lines
            .iter()
            .map(|line| return line.chars().count())
            .max()
            .unwrap_or(0);

        return longest
            .min(max_allowed)
            .max(username.chars().count())
            .max(1);
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
        username: &str,
    ) -> Vec<Line<'static>> {
        // Add 2 for the vertical bars.
        let username_len = username.chars().count();
        let top_bar = format!(
            "╭{username}{}╮",
            "─".repeat((max_line_length + 2).saturating_sub(username_len))
        );
        let bottom_bar = format!("╰{}╯", "─".repeat(max_line_length + 2));
        let bar_bubble_padding = repeat_from_subtractions(
            " ",
            self.window_max_width,
            &[max_line_length, Bubble::style_config().bubble_padding],
        );

        let mut res = vec![];
        if self.alignment == BubbleAlignment::Left {
            res.push(self.highlight_line(format!("{top_bar}{bar_bubble_padding}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{bottom_bar}{bar_bubble_padding}")));
        } else {
            res.push(self.highlight_line(format!("{bar_bubble_padding}{top_bar}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{bar_bubble_padding}{bottom_bar}")));
        }

        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'static> {
        if self.instruction.is_error() {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Red),
                    ..Style::default()
                },
            );
        } else if *self.instruction == RenderInstruction::Pending {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::DarkGray),
                    ..Style::default()
                },
            );
        }

        return Span::from(text);
    }

    fn highlight_line(&self, text: String) -> Line<'static> {
        return Line::from(self.highlight_span(text));
    }
}
