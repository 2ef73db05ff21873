//! End-to-end tests: HTML and CSS in, pixels out.
//!
//! No fonts are loaded, so layout uses approximate metrics: 16px text is
//! 9.6px per character and 19.2px per line.

use gob_browser::{EngineConfig, LoadError, Page, RenderOutcome};
use gob_css::ColorValue;
use quickcheck_macros::quickcheck;

const LINE: f32 = 16.0 * 1.2;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rows(height: f32) -> u32 {
    height.ceil() as u32
}

#[test]
fn test_one_line_page_is_one_line_tall() {
    let page = Page::load("<p>Hello world</p>", "").unwrap();
    let tree = page.layout(800.0);
    assert_eq!(tree.line_texts(), vec!["Hello world"]);

    let buffer = page.render(800).into_buffer();
    assert_eq!(buffer.width(), 800);
    assert_eq!(buffer.height(), rows(LINE));
}

#[test]
fn test_narrow_page_wraps_to_two_lines() {
    let page = Page::load("<p>Hello world</p>", "").unwrap();
    // Wider than "Hello" (48px), narrower than "Hello world" (105.6px).
    let tree = page.layout(60.0);
    assert_eq!(tree.line_texts(), vec!["Hello", "world"]);

    let buffer = page.render(60).into_buffer();
    assert_eq!(buffer.height(), rows(2.0 * LINE));
}

#[test]
fn test_empty_input_gives_zero_height_buffer() {
    for html in ["", "   \n  ", "<html></html>"] {
        let page = Page::load(html, "p { color: red }").unwrap();
        let outcome = page.render(300);
        assert!(outcome.is_empty_document(), "{html:?}");
        let buffer = outcome.into_buffer();
        assert_eq!((buffer.width(), buffer.height()), (300, 0));
    }
}

#[test]
fn test_unterminated_tag_is_malformed_markup() {
    assert!(matches!(
        Page::load(r#"<p class="x"#, ""),
        Err(LoadError::Markup(_))
    ));
}

#[test]
fn test_degenerate_widths_still_render() {
    let page = Page::load("<p>Hello world</p>", "").unwrap();
    for width in [0, -1, i32::MIN] {
        let buffer = page.render(width).into_buffer();
        assert_eq!(buffer.width(), 1);
        assert_eq!(buffer.height(), rows(2.0 * LINE));
    }
}

#[test]
fn test_huge_pages_are_capped() {
    let config = EngineConfig::default();
    let page = Page::load("<p>Hello world</p>", "").unwrap();
    let buffer = page.render(i32::MAX).into_buffer();
    assert_eq!(buffer.width(), config.max_page_width);
    assert_eq!(buffer.height(), rows(LINE));

    let tall = Page::load("<div>x</div>", "div { height: 1e9px; background: black }").unwrap();
    let buffer = tall.render(100).into_buffer();
    assert_eq!((buffer.width(), buffer.height()), (100, config.max_page_height));
    assert_eq!(
        buffer.pixel(99, config.max_page_height - 1),
        Some(ColorValue::BLACK)
    );

    let empty = Page::load("", "").unwrap().render(i32::MAX).into_buffer();
    assert_eq!((empty.width(), empty.height()), (config.max_page_width, 0));
}

#[test]
fn test_page_limits_come_from_config() {
    let config =
        EngineConfig::from_json(r#"{ "max_page_width": 64, "max_page_height": 8 }"#).unwrap();
    let page = Page::load_with_config("<p>one two three four five</p>", "", config).unwrap();
    let buffer = page.render(1000).into_buffer();
    assert_eq!((buffer.width(), buffer.height()), (64, 8));
}

#[test]
fn test_backgrounds_are_painted() {
    let page = Page::load(
        "<div>top</div><p>bottom</p>",
        "div { background-color: #00ff00; height: 10px } p { background: blue; padding-top: 5px }",
    )
    .unwrap();
    let buffer = page.render(50).into_buffer();
    assert_eq!(buffer.height(), rows(10.0 + 5.0 + LINE));
    assert_eq!(buffer.pixel(0, 0), Some(ColorValue::rgb(0, 255, 0)));
    assert_eq!(buffer.pixel(49, 9), Some(ColorValue::rgb(0, 255, 0)));
    assert_eq!(buffer.pixel(0, 10), Some(ColorValue::rgb(0, 0, 255)));
}

#[test]
fn test_config_background_fills_unpainted_pixels() {
    let config = EngineConfig::from_json(r##"{ "background": "#102030" }"##).unwrap();
    let page = Page::load_bytes(b"<p>x</p>", b"", config).unwrap();
    let buffer = page.render(20).into_buffer();
    assert_eq!(buffer.pixel(19, 0), Some(ColorValue::rgb(0x10, 0x20, 0x30)));
}

#[test]
fn test_config_font_size_scales_text() {
    let config = EngineConfig {
        font_size: 10.0,
        ..EngineConfig::default()
    };
    let page = Page::load_with_config("<h1>Big</h1><p>small</p>", "", config).unwrap();
    assert_eq!(page.layout(500.0).content_height, 20.0 * 1.2 + 10.0 * 1.2);
}

#[test]
fn test_reflow_reuses_styles() {
    let page = Page::load("<p class=a>some words to wrap</p>", ".a { color: red }").unwrap();
    let narrow = page.layout(50.0);
    let wide = page.layout(500.0);
    let narrow_again = page.layout(50.0);
    assert!(narrow.line_boxes().len() > wide.line_boxes().len());
    assert_eq!(narrow, narrow_again);
    assert_eq!(
        page.document().find_first("p").unwrap().style.get("color"),
        Some("red")
    );
}

#[test]
fn test_viewport_with_clamped_scroll() {
    let page = Page::load("<div>x</div>", "div { height: 100px; background: black }").unwrap();
    let buffer = page.render(10).into_buffer();
    let config = page.config();

    let offset = config.clamp_scroll(1000, buffer.height());
    assert_eq!(offset, 90);
    let view = buffer.viewport(offset, 40);
    assert_eq!(view.height(), 10);
    assert_eq!(view.pixel(0, 0), Some(ColorValue::BLACK));
}

/// Rendering never panics and stays within the page limits, whatever the
/// width. Quickcheck's small integers are spread over the whole `i32` range.
#[quickcheck]
fn prop_any_width_renders(width: i32, spread: u8) -> bool {
    let width = width.saturating_mul(1 << (spread % 24));
    let config = EngineConfig::default();
    let page = Page::load(
        "<div style='padding: 3px; margin: 2px 500px'>a few <b>bold</b> words</div>",
        "",
    )
    .unwrap();
    match page.render(width) {
        RenderOutcome::Painted(buffer) => {
            (1..=config.max_page_width).contains(&buffer.width())
                && (1..=config.max_page_height).contains(&buffer.height())
        }
        RenderOutcome::EmptyDocument { .. } => false,
    }
}
