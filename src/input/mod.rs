pub mod handler;
pub mod intent;

pub use handler::{InputHandler, KeyAction};
pub use intent::translate;
