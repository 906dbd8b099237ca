use std::io::Write;

use anyhow::Result;

use crate::renderer::renderer::DocumentRenderer;
use crate::renderer::styles::Theme;
use crate::renderer::traits::*;
use crate::resolver::Resolve;

/// Parses the document and renders it with styling, indentation and ASCII images
pub struct PrettyOutput {
    options: RenderOptions,
    theme: Theme,
    resolver: Box<dyn Resolve>,
}

impl PrettyOutput {
    pub fn new(resolver: Box<dyn Resolve>) -> Self {
        Self {
            options: RenderOptions::default(),
            theme: Theme::default(),
            resolver,
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

impl Output for PrettyOutput {
    fn output(&self, out: &mut dyn Write, text: &str) -> Result<()> {
        DocumentRenderer::new(self.options, &self.theme, self.resolver.as_ref()).render(out, text)
    }
}

/// Writes the document verbatim followed by a line break
#[derive(Debug, Clone, Copy, Default)]
pub struct RawOutput;

impl Output for RawOutput {
    fn output(&self, out: &mut dyn Write, text: &str) -> Result<()> {
        writeln!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }
}
