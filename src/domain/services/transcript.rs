#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::MessageRenderer;
use crate::domain::models::RenderInstruction;

/// Plain text renderer used by the CLI commands.
#[derive(Default)]
pub struct Transcript {
    blocks: Vec<String>,
}

impl Transcript {
    pub fn as_string(&self) -> String {
        return self.blocks.join("\n\n");
    }

    pub fn is_empty(&self) -> bool {
        return self.blocks.is_empty();
    }
}

impl MessageRenderer for Transcript {
    fn render(&mut self, instruction: &RenderInstruction) -> Result<()> {
        let (lines, err) = instruction.text_lines();
        let name = instruction.sender().display_name();
        self.blocks.push(format!("{name}: {}", lines.join("\n")));

        if let Some(err) = err {
            return Err(err);
        }

        return Ok(());
    }
}
