//! Presentation layer. Renders read projections of the board and turns
//! input into intents for the controller.

pub mod terminal;

pub use terminal::{parse_intent, Intent};
