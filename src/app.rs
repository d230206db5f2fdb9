//! Application module: the front end's model and key handling.
//!
//! The `App` model lives in `app::model`; `app::input` maps key presses to
//! model changes and `Action`s for the runtime.

mod input;
mod model;

pub use input::{Action, handle_key};
pub use model::*;

#[cfg(test)]
mod tests;
