pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
mod conversation;
pub mod events;
mod history;
mod scroll;
mod session_store;
mod transcript;
pub mod view;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use conversation::*;
pub use history::*;
pub use scroll::*;
pub use session_store::*;
pub use transcript::*;
