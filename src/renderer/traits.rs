use std::io::Write;

use anyhow::Result;

/// Configuration for the pretty renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render images as `[Image: <destination>]` instead of ASCII art
    pub suppress_images: bool,
    /// Keep a heading's indent for the content that follows it
    pub nest_sections: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suppress_images(self, suppress_images: bool) -> Self {
        Self {
            suppress_images,
            ..self
        }
    }

    pub fn with_nest_sections(self, nest_sections: bool) -> Self {
        Self {
            nest_sections,
            ..self
        }
    }
}

/// An output mode: writes a whole document to a stream
pub trait Output {
    fn output(&self, out: &mut dyn Write, text: &str) -> Result<()>;
}
