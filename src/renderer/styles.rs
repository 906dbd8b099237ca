use std::fmt;
use std::io::{self, Write};

use console::Style;

/// Semantic style of a piece of rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTag {
    MajorHeader,
    MinorHeader,
    Code,
    Text,
    Link,
    Image,
    Placeholder,
    Unknown,
}

impl StyleTag {
    pub const ALL: [StyleTag; 8] = [
        StyleTag::MajorHeader,
        StyleTag::MinorHeader,
        StyleTag::Code,
        StyleTag::Text,
        StyleTag::Link,
        StyleTag::Image,
        StyleTag::Placeholder,
        StyleTag::Unknown,
    ];
}

/// Writes text to a stream with one particular style applied
pub trait StyleWriter {
    fn write(&self, out: &mut dyn Write, text: &str) -> io::Result<()>;
}

/// ANSI styling through `console`
#[derive(Debug, Clone)]
pub struct AnsiStyle(Style);

impl AnsiStyle {
    pub fn new(style: Style) -> Self {
        Self(style)
    }
}

impl StyleWriter for AnsiStyle {
    fn write(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
        write!(out, "{}", self.0.apply_to(text))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyle;

impl StyleWriter for PlainStyle {
    fn write(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
        out.write_all(text.as_bytes())
    }
}

/// Static mapping from every [`StyleTag`] to the writer that renders it
pub struct Theme {
    writers: [Box<dyn StyleWriter>; 8],
}

impl Theme {
    pub fn from_fn(f: impl Fn(StyleTag) -> Box<dyn StyleWriter>) -> Self {
        Self {
            writers: StyleTag::ALL.map(f),
        }
    }

    /// Terminal palette. With `force` unset, `console` decides whether the
    /// stream supports colours.
    pub fn ansi(force: Option<bool>) -> Self {
        Self::from_fn(|tag| {
            let style = match tag {
                StyleTag::MajorHeader => Style::new().blue().bright().bold().underlined(),
                StyleTag::MinorHeader => Style::new().blue().bright(),
                StyleTag::Code => Style::new().magenta().bright().italic(),
                StyleTag::Text => Style::new().white().bright(),
                StyleTag::Link => Style::new().red().bright().underlined(),
                StyleTag::Image => Style::new().white(),
                StyleTag::Placeholder => Style::new().white().dim(),
                StyleTag::Unknown => Style::new().red().bright(),
            };
            let style = match force {
                Some(force) => style.force_styling(force),
                None => style,
            };
            Box::new(AnsiStyle::new(style))
        })
    }

    pub fn plain() -> Self {
        Self::from_fn(|_| Box::new(PlainStyle))
    }

    pub fn writer(&self, tag: StyleTag) -> &dyn StyleWriter {
        self.writers[tag as usize].as_ref()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::ansi(None)
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme").finish_non_exhaustive()
    }
}
