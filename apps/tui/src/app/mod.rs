// Application state and the keyboard/mouse handlers that drive it

pub mod actions;
pub mod input;
pub mod picker;
pub mod state;

pub use input::{handle_input, handle_mouse};
pub use state::App;
