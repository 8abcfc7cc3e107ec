#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

use anyhow::anyhow;
use anyhow::Result;
use serde_json::Value;

use super::ChartSummary;
use super::Message;
use super::MessageKind;
use super::Sender;

pub const PENDING_MARKER: &str = "...";
pub const CHART_ERROR: &str = "[Error displaying chart]";

/// One unit of work for a renderer: a message, or the marker shown while a
/// reply is on its way.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderInstruction {
    Message {
        content: Option<String>,
        sender: Sender,
        kind: MessageKind,
        chart_config: Option<Value>,
        error: bool,
    },
    Pending,
}

impl RenderInstruction {
    pub fn from_message(message: &Message) -> RenderInstruction {
        return RenderInstruction::Message {
            content: message.content.clone(),
            sender: message.sender,
            kind: message.kind,
            chart_config: message.chart_config.clone(),
            error: message.error,
        };
    }

    pub fn sender(&self) -> Sender {
        match self {
            RenderInstruction::Message { sender, .. } => return *sender,
            RenderInstruction::Pending => return Sender::Bot,
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            RenderInstruction::Message { error, .. } => return *error,
            RenderInstruction::Pending => return false,
        }
    }

    /// Plain text body of the instruction. Charts are summarized as text;
    /// when that fails a placeholder line is used and the failure is returned
    /// alongside so the renderer can report it.
    pub fn text_lines(&self) -> (Vec<String>, Option<anyhow::Error>) {
        let (content, sender, kind, chart_config) = match self {
            RenderInstruction::Pending => return (vec![PENDING_MARKER.to_string()], None),
            RenderInstruction::Message {
                content,
                sender,
                kind,
                chart_config,
                ..
            } => (content, sender, kind, chart_config),
        };

        let mut lines: Vec<String> = content
            .as_deref()
            .filter(|e| return !e.is_empty())
            .map(|e| {
                return e
                    .split('\n')
                    .map(|line| return line.to_string())
                    .collect::<Vec<String>>();
            })
            .unwrap_or_default();

        if *kind == MessageKind::Text {
            if lines.is_empty() {
                let placeholder = match sender {
                    Sender::Bot => "[Empty message received]",
                    Sender::User => "[Empty user message]",
                };
                lines.push(placeholder.to_string());
            }
            return (lines, None);
        }

        let summary = chart_config
            .as_ref()
            .ok_or_else(|| return anyhow!("Chart message has no config"))
            .and_then(ChartSummary::parse);

        match summary {
            Ok(summary) => {
                lines.extend(summary.as_lines());
                return (lines, None);
            }
            Err(err) => {
                lines.push(CHART_ERROR.to_string());
                return (lines, Some(err));
            }
        }
    }
}

/// Anything able to display render instructions. An `Err` reports a local
/// render failure; the renderer stays usable for the following instructions.
pub trait MessageRenderer {
    fn render(&mut self, instruction: &RenderInstruction) -> Result<()>;
}

/// Word wraps `text` to `max_width` characters per line, splitting words that
/// would not fit on a line of their own.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines: Vec<String> = vec![];

    for full_line in text.replace('\t', "  ").split('\n') {
        if full_line.trim().is_empty() {
            lines.push(" ".to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;
        for word in full_line.split(' ') {
            let mut word = word.to_string();
            let mut word_len = word.chars().count();

            while word_len > max_width {
                if current_len > 0 {
                    lines.push(current.trim_end().to_string());
                    current = String::new();
                    current_len = 0;
                }
                let head = word.chars().take(max_width).collect::<String>();
                lines.push(head);
                word = word.chars().skip(max_width).collect::<String>();
                word_len -= max_width;
            }

            if current_len > 0 && current_len + word_len + 1 > max_width {
                lines.push(current.trim_end().to_string());
                current = String::new();
                current_len = 0;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(&word);
            current_len += word_len;
        }

        if current_len > 0 {
            lines.push(current.trim_end().to_string());
        }
    }

    return lines;
}
