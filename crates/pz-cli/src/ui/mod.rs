//! UI primitives for the pz CLI.
//!
//! - **progress**: spinner around network round-trips
//! - **prompt**: password and confirmation prompts

pub mod progress;
pub mod prompt;

pub use progress::Spinner;
