mod action;
mod chart;
mod endpoint;
mod errors;
mod event;
mod loading;
mod message;
mod render;
mod reply;
mod session;
mod textarea;

pub use action::*;
pub use chart::*;
pub use endpoint::*;
pub use errors::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use render::*;
pub use reply::*;
pub use session::*;
pub use textarea::*;
