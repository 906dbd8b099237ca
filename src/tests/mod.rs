#[cfg(test)]
mod test_support {
    use std::io::{self, Cursor, Write};
    use std::sync::{Arc, Mutex};

    use image::{DynamicImage, GrayImage, ImageFormat, Luma};

    use crate::{StyleTag, StyleWriter, Theme};

    /// Wraps every emission in `<Tag>...</Tag>` so tests can see styles
    pub struct Tagged(pub StyleTag);

    impl StyleWriter for Tagged {
        fn write(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
            write!(out, "<{:?}>{}</{:?}>", self.0, text, self.0)
        }
    }

    pub fn tagged_theme() -> Theme {
        Theme::from_fn(|tag| Box::new(Tagged(tag)))
    }

    /// Left half black, right half white
    pub fn split_image(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub fn png_bytes(img: GrayImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }
}

#[cfg(test)]
mod renderer_tests {
    use anyhow::anyhow;

    use super::test_support::*;
    use crate::resolver::MockResolve;
    use crate::{DocumentRenderer, RenderOptions, Theme};

    fn render(text: &str, options: RenderOptions, theme: &Theme, resolver: &MockResolve) -> String {
        let mut out = Vec::new();
        DocumentRenderer::new(options, theme, resolver)
            .render(&mut out, text)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_suppressed_images_never_resolve() {
        let mut resolver = MockResolve::new();
        resolver.expect_resolve().never();

        let options = RenderOptions::new().with_suppress_images(true);
        let output = render(
            "![logo](img/logo.png) and ![badge](https://x/b.svg)\n",
            options,
            &tagged_theme(),
            &resolver,
        );

        assert!(output.contains("<Placeholder>[Image: img/logo.png]</Placeholder>"));
        assert!(output.contains("<Placeholder>[Image: https://x/b.svg]</Placeholder>"));
        assert!(!output.contains("<Image>"));
    }

    #[test]
    fn test_failed_fetch_falls_back_to_placeholder() {
        let mut resolver = MockResolve::new();
        resolver
            .expect_resolve()
            .withf(|destination: &str| destination == "http://x/a.png")
            .times(1)
            .returning(|_| Err(anyhow!("404 Not Found")));

        let output = render(
            "![alt](http://x/a.png)\n",
            RenderOptions::default(),
            &Theme::plain(),
            &resolver,
        );

        assert_eq!(output, "[Image: http://x/a.png]\n\n\n");
    }

    #[test]
    fn test_placeholder_fallback_is_quiet_at_default_level() {
        let logs = SharedBuf::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || sink.clone())
            .finish();

        let mut resolver = MockResolve::new();
        resolver
            .expect_resolve()
            .returning(|_| Ok(b"<svg></svg>".to_vec()));

        let output = tracing::subscriber::with_default(subscriber, || {
            render(
                "![badge](https://img.shields.io/badge.svg)\n",
                RenderOptions::default(),
                &Theme::plain(),
                &resolver,
            )
        });

        assert!(output.starts_with("[Image: https://img.shields.io/badge.svg]\n"));
        assert!(logs.contents().is_empty(), "unexpected log output: {}", logs.contents());
    }

    #[test]
    fn test_undecodable_image_falls_back_to_placeholder() {
        let mut resolver = MockResolve::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Ok(b"<svg></svg>".to_vec()));

        let output = render(
            "![badge](badge.svg)\n",
            RenderOptions::default(),
            &tagged_theme(),
            &resolver,
        );

        assert!(output.starts_with("<Image>[Image: badge.svg]</Image>\n"));
    }

    #[test]
    fn test_image_renders_as_ascii_art() {
        let png = png_bytes(split_image(4, 2));
        let mut resolver = MockResolve::new();
        resolver
            .expect_resolve()
            .withf(|destination: &str| destination == "docs/shot.png")
            .times(1)
            .returning(move |_| Ok(png.clone()));

        let output = render(
            "![shot](docs/shot.png)\n",
            RenderOptions::default(),
            &Theme::plain(),
            &resolver,
        );

        assert_eq!(output, "MM..\nMM..\n\n\n\n");
    }

    #[test]
    fn test_ascii_art_keeps_heading_indent_when_nested() {
        let png = png_bytes(split_image(2, 2));
        let mut resolver = MockResolve::new();
        resolver
            .expect_resolve()
            .returning(move |_| Ok(png.clone()));

        let options = RenderOptions::new().with_nest_sections(true);
        let output = render(
            "## Screens\n\n![shot](shot.png)\n",
            options,
            &Theme::plain(),
            &resolver,
        );

        assert!(output.starts_with("  Screens\n  M.\n  M.\n"));
    }

    #[test]
    fn test_each_image_is_fetched_once() {
        let png = png_bytes(split_image(2, 1));
        let mut resolver = MockResolve::new();
        resolver
            .expect_resolve()
            .times(2)
            .returning(move |_| Ok(png.clone()));

        let output = render(
            "![a](a.png)\n\n![b](b.png)\n",
            RenderOptions::default(),
            &Theme::plain(),
            &resolver,
        );

        assert_eq!(output.matches("M.").count(), 2);
    }
}

#[cfg(test)]
mod ascii_tests {
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

    use super::test_support::*;
    use crate::renderer::ascii::*;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let v = ((x + y) * 255 / (width + height)) as u8;
            Rgb([v, v / 2, 255 - v])
        }))
    }

    fn assert_grid(art: &str, width: usize, height: usize) {
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines.len(), height);
        for line in lines {
            assert_eq!(line.chars().count(), width);
            assert!(line.bytes().all(|b| ASCII_RAMP.contains(&b)));
        }
        assert!(art.ends_with('\n'));
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let img = gradient(200, 120);
        assert_eq!(image_to_ascii(&img), image_to_ascii(&img));
    }

    #[test]
    fn test_wide_image_fits_bounding_box() {
        // 300x100 scales by 0.25
        assert_grid(&image_to_ascii(&gradient(300, 100)), 75, 25);
    }

    #[test]
    fn test_tall_image_fits_bounding_box() {
        assert_grid(&image_to_ascii(&gradient(40, 120)), 10, 30);
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        assert_grid(&image_to_ascii(&gradient(10, 4)), 10, 4);
    }

    #[test]
    fn test_ramp_extremes() {
        assert_eq!(ramp_char(0), 'M');
        assert_eq!(ramp_char(255), '.');
        assert_eq!(ramp_char(128), 'I');
    }

    #[test]
    fn test_black_and_white_pixels() {
        let img = DynamicImage::ImageLuma8(split_image(6, 3));
        assert_eq!(image_to_ascii(&img), "MMM...\nMMM...\nMMM...\n");
    }

    #[test]
    fn test_bytes_roundtrip_through_png() {
        let gray = GrayImage::from_pixel(3, 1, Luma([0]));
        assert_eq!(bytes_to_ascii(&png_bytes(gray)).unwrap(), "MMM\n");
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(bytes_to_ascii(b"definitely not an image").is_err());
    }
}

#[cfg(test)]
mod parser_tests {
    use crate::parser::*;

    fn kinds(document: &Document, id: NodeId) -> Vec<NodeKind> {
        document
            .children(id)
            .map(|child| document.node(child).kind.clone())
            .collect()
    }

    #[test]
    fn test_heading_and_paragraph_with_link() {
        let document = parse("# Title\n\nSome text with a [link](http://x/y).\n");
        let blocks: Vec<NodeId> = document.children(document.root()).collect();
        assert_eq!(blocks.len(), 2);

        assert_eq!(document.node(blocks[0]).kind, NodeKind::Heading { level: 1 });
        assert_eq!(kinds(&document, blocks[0]), vec![NodeKind::text("Title")]);

        assert_eq!(
            kinds(&document, blocks[1]),
            vec![
                NodeKind::text("Some text with a "),
                NodeKind::Link {
                    destination: "http://x/y".to_string()
                },
                NodeKind::text(".\n"),
            ]
        );
    }

    #[test]
    fn test_fenced_code_block_keeps_line_breaks() {
        let document = parse("```rust\nlet x = 1;\nlet y = 2;\n```\n");
        assert_eq!(
            kinds(&document, document.root()),
            vec![NodeKind::code("let x = 1;\nlet y = 2;\n")]
        );
    }

    #[test]
    fn test_emphasis_is_transparent() {
        let document = parse("a *b* **c** ~~d~~\n");
        let paragraph = document.children(document.root()).next().unwrap();
        assert_eq!(kinds(&document, paragraph), vec![NodeKind::text("a b c d\n")]);
    }

    #[test]
    fn test_soft_breaks_stay_in_text() {
        let document = parse("one\ntwo\n");
        let paragraph = document.children(document.root()).next().unwrap();
        assert_eq!(kinds(&document, paragraph), vec![NodeKind::text("one\ntwo\n")]);
    }

    #[test]
    fn test_lists_become_other_nodes() {
        let document = parse("- first\n- second\n");
        let list = document.children(document.root()).next().unwrap();
        assert_eq!(document.node(list).kind, NodeKind::other("List"));

        let items: Vec<NodeId> = document.children(list).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(document.node(items[0]).kind, NodeKind::other("Item"));
        assert_eq!(kinds(&document, items[0]), vec![NodeKind::text("first\n")]);
    }

    #[test]
    fn test_html_block_is_a_single_node() {
        let document = parse("<p align=\"center\">\n  <b>hi</b>\n</p>\n");
        assert_eq!(
            kinds(&document, document.root()),
            vec![NodeKind::other("HTMLBlock")]
        );
        let html = document.children(document.root()).next().unwrap();
        assert!(document.node(html).first_child.is_none());
    }

    #[test]
    fn test_empty_input_has_only_root() {
        let document = parse("");
        assert!(document.is_empty());
        assert_eq!(document.node(document.root()).kind, NodeKind::Document);
    }

    #[test]
    fn test_builder_links_siblings() {
        let mut builder = DocumentBuilder::new();
        let root = builder.root();
        let a = builder.append(root, NodeKind::text("a"));
        let merged = builder.append_text(root, "b");
        let code = builder.append(root, NodeKind::code("c"));
        let document = builder.build();

        assert_eq!(a, merged);
        assert_eq!(document.node(a).kind, NodeKind::text("ab"));
        assert_eq!(document.node(a).next, Some(code));
        assert_eq!(document.children(root).count(), 2);
    }
}

#[cfg(test)]
mod output_tests {
    use crate::resolver::MockResolve;
    use crate::{Output, PrettyOutput, RawOutput, RenderOptions, Theme};

    #[test]
    fn test_pretty_output_parses_and_styles() {
        let mut resolver = MockResolve::new();
        resolver.expect_resolve().never();

        let output = PrettyOutput::new(Box::new(resolver))
            .with_options(RenderOptions::new().with_suppress_images(true))
            .with_theme(Theme::plain());

        let mut out = Vec::new();
        output
            .output(&mut out, "# Title\n\n![x](x.png)\n")
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Title\n[Image: x.png]\n\n\n");
    }

    #[test]
    fn test_raw_output_is_verbatim() {
        let mut out = Vec::new();
        RawOutput.output(&mut out, "# Title\n").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "# Title\n\n");
    }
}
