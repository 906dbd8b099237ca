//! Fetch a repository README and render it as styled terminal output.
//!
//! The pretty renderer walks a parsed markdown tree, styling and indenting
//! each node and turning referenced images into ASCII art. The raw renderer
//! passes text through untouched.

pub mod config;
pub mod error;
pub mod github;
pub mod parser;
pub mod renderer;
pub mod resolver;

mod tests;

pub use config::*;
pub use error::*;
pub use github::*;
pub use parser::*;
pub use renderer::*;
pub use resolver::*;
