#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

use super::SessionStore;
use crate::domain::models::Message;
use crate::domain::models::MessageRenderer;
use crate::domain::models::RenderInstruction;
use crate::domain::models::SessionId;

/// Instructions for displaying `messages` in order, followed by the pending
/// marker while a reply for them is outstanding.
pub fn project(messages: &[Message], pending: bool) -> Vec<RenderInstruction> {
    let mut instructions = messages
        .iter()
        .map(RenderInstruction::from_message)
        .collect::<Vec<RenderInstruction>>();

    if pending {
        instructions.push(RenderInstruction::Pending);
    }

    return instructions;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarEntry {
    pub id: SessionId,
    pub title: String,
    pub active: bool,
}

/// Sidebar rows, most recently updated first.
pub fn project_sidebar(store: &SessionStore, active: Option<&SessionId>) -> Vec<SidebarEntry> {
    return store
        .list_by_recency()
        .into_iter()
        .map(|session| {
            return SidebarEntry {
                id: session.id.clone(),
                title: session.title.to_string(),
                active: Some(&session.id) == active,
            };
        })
        .collect();
}

/// Feeds every instruction to `renderer`. A failure is logged and does not
/// stop the instructions after it; the number of failures is returned.
pub fn render_all(renderer: &mut dyn MessageRenderer, instructions: &[RenderInstruction]) -> usize {
    let mut failures = 0;
    for (idx, instruction) in instructions.iter().enumerate() {
        if let Err(err) = renderer.render(instruction) {
            tracing::warn!(index = idx, error = ?err, "Failed to render message");
            failures += 1;
        }
    }

    return failures;
}
