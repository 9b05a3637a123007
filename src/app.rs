mod events;
mod render;
mod state;

pub use render::PLACEHOLDER;
pub use state::{App, PromptState, PromptTarget};
