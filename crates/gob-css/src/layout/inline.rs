//! Line breaking for text and inline elements.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! Inline content is handled in two steps. The inline-level descendants of a
//! block container are flattened into [`InlineItem`]s; [`InlineLayout`]
//! then splits the items into words and fills line boxes greedily.

use serde::Serialize;

use super::box_model::Rect;
use crate::style::{ColorValue, FontStyle, UsedStyle, WhiteSpace};

/// How layout measures text. Layout only ever asks for advance widths and
/// the height of a `line-height: normal` line.
///
/// The renderer must draw with the same advances it reports here, or text
/// will overrun the fragments layout placed.
pub trait FontMetrics {
    /// Sum of the glyph advances of `text` at `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// The used value of `line-height: normal` at `font_size`.
    fn line_height(&self, font_size: f32) -> f32;

    /// Measure text in a particular style. Implementations with separate
    /// bold or italic faces override this; the default ignores weight and
    /// slant.
    fn styled_text_width(&self, text: &str, style: &TextStyle) -> f32 {
        self.text_width(text, style.font_size)
    }
}

/// Metrics for when there is no font file.
///
/// Without font data, every character advances by `char_width_ratio` times
/// the font size, and a line is `line_height_ratio` times the font size.
/// The defaults, 0.6 and 1.2, are typical of proportional Latin body text
/// and the upper end of the recommended range for `line-height: normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateFontMetrics {
    /// Advance width of one character, relative to the font size.
    pub char_width_ratio: f32,
    /// Line height, relative to the font size.
    pub line_height_ratio: f32,
}

impl ApproximateFontMetrics {
    /// Default advance width ratio.
    pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.6;
    /// Default line height ratio.
    pub const DEFAULT_LINE_HEIGHT_RATIO: f32 = 1.2;

    /// Metrics with the given ratios.
    #[must_use]
    pub const fn new(char_width_ratio: f32, line_height_ratio: f32) -> Self {
        Self {
            char_width_ratio,
            line_height_ratio,
        }
    }
}

impl Default for ApproximateFontMetrics {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_CHAR_WIDTH_RATIO,
            Self::DEFAULT_LINE_HEIGHT_RATIO,
        )
    }
}

impl FontMetrics for ApproximateFontMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.char_width_ratio
    }

    fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_ratio
    }
}

/// The font properties a text fragment is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    /// In pixels.
    pub font_size: f32,
    /// 100 to 900; 600 and up selects the bold face.
    pub font_weight: u16,
    /// Normal or italic.
    pub font_style: FontStyle,
    /// Text color; `None` means the renderer's default.
    pub color: Option<ColorValue>,
}

impl TextStyle {
    /// The text properties of a used style.
    #[must_use]
    pub const fn from_used(style: &UsedStyle) -> Self {
        Self {
            font_size: style.font_size,
            font_weight: style.font_weight,
            font_style: style.font_style,
            color: style.color,
        }
    }

    /// Whether the bold face applies.
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.font_weight >= 600
    }
}

/// One line of laid-out text. Its height is the tallest `line-height` of
/// the fragments on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBox {
    /// The bounding rectangle of this line box, in page coordinates.
    pub bounds: Rect,
    /// Fragments laid out on this line, left to right.
    pub fragments: Vec<LineFragment>,
}

impl LineBox {
    /// The line's words joined by single spaces, as a reader would see them.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        let mut previous_right: Option<f32> = None;
        for fragment in &self.fragments {
            if previous_right.is_some_and(|right| fragment.bounds.x > right + f32::EPSILON) {
                text.push(' ');
            }
            text.push_str(&fragment.text);
            previous_right = Some(fragment.bounds.right());
        }
        text
    }
}

/// A piece of text placed on a line: a word, or the part of a word that lies
/// in one inline element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFragment {
    /// The position and size of this fragment, in page coordinates.
    pub bounds: Rect,
    /// The text drawn in the fragment.
    pub text: String,
    /// Font and color.
    pub style: TextStyle,
    /// Background of the innermost inline element with one, painted behind
    /// the fragment.
    pub background: ColorValue,
}

/// One unit of flattened inline content.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineItem {
    /// [§ 2.5 Text Runs](https://www.w3.org/TR/css-display-3/#text-nodes)
    Text {
        /// Raw text, before white space processing.
        text: String,
        /// Font and color of the text.
        style: TextStyle,
        /// White space mode of the parent element.
        white_space: WhiteSpace,
        /// Line height in pixels.
        line_height: f32,
        /// Inline background behind the text.
        background: ColorValue,
    },
    /// [§ 9.5 `<br>`](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3)
    ///
    /// "br { display-outside: newline; }" A forced line break.
    LineBreak {
        /// Height of the line the break ends when that line is empty.
        line_height: f32,
    },
    /// The edge of a block nested inside inline content: ends the current
    /// line if it has content.
    BlockBoundary,
}

impl InlineItem {
    /// Whether the item renders nothing: collapsible white space, or a
    /// block edge.
    #[must_use]
    pub fn is_collapsible(&self) -> bool {
        match self {
            Self::Text {
                text, white_space, ..
            } => white_space.collapses() && text.chars().all(is_collapsible_space),
            Self::LineBreak { .. } => false,
            Self::BlockBoundary => true,
        }
    }
}

/// [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
///
/// Document white space characters: space, tab, line feed, carriage return
/// and form feed.
const fn is_collapsible_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

/// Part of a word that comes from a single inline item.
#[derive(Debug, Clone)]
struct Segment {
    text: String,
    style: TextStyle,
    line_height: f32,
    background: ColorValue,
    item: usize,
}

/// A collapsed space in front of a word.
#[derive(Debug, Clone)]
struct Space {
    style: TextStyle,
    /// Whether the line may wrap here.
    breakable: bool,
}

/// Unbreakable run of text with what separates it from the previous one.
#[derive(Debug, Clone)]
struct Word {
    segments: Vec<Segment>,
    space_before: Option<Space>,
}

#[derive(Debug, Clone)]
enum Atom {
    Word(Word),
    ForcedBreak { line_height: f32 },
    SoftBreak,
}

/// [§ 4 White Space Processing](https://www.w3.org/TR/css-text-3/#white-space-processing)
///
/// Split flattened inline content into words, forced breaks and block edges.
///
/// In collapsing modes a run of white space becomes a single space in front
/// of the following word, and may be a soft wrap opportunity. With
/// `white-space: pre` spaces are kept inside the word and only line feeds
/// break. A word continues across inline element boundaries as long as no
/// white space intervenes.
fn atoms(items: &[InlineItem]) -> Vec<Atom> {
    let mut atoms = Vec::new();
    let mut current: Vec<Segment> = Vec::new();
    let mut current_space: Option<Space> = None;
    let mut pending_space: Option<Space> = None;

    let flush = |atoms: &mut Vec<Atom>, current: &mut Vec<Segment>, space: &mut Option<Space>| {
        if !current.is_empty() {
            atoms.push(Atom::Word(Word {
                segments: std::mem::take(current),
                space_before: space.take(),
            }));
        }
    };

    for (index, item) in items.iter().enumerate() {
        match item {
            InlineItem::Text {
                text,
                style,
                white_space,
                line_height,
                background,
            } => {
                for c in text.chars() {
                    // STEP 1: Preserved line feeds force a break.
                    if !white_space.collapses() && c == '\n' {
                        flush(&mut atoms, &mut current, &mut current_space);
                        atoms.push(Atom::ForcedBreak {
                            line_height: *line_height,
                        });
                        pending_space = None;
                        continue;
                    }

                    // STEP 2: Collapsible white space ends the word and
                    // leaves at most one pending space.
                    if white_space.collapses() && is_collapsible_space(c) {
                        flush(&mut atoms, &mut current, &mut current_space);
                        if pending_space.is_none() {
                            pending_space = Some(Space {
                                style: style.clone(),
                                breakable: white_space.wraps(),
                            });
                        }
                        continue;
                    }

                    // STEP 3: Anything else extends the current word.
                    if current.is_empty() {
                        current_space = pending_space.take();
                    }
                    let c = if c == '\t' || c == '\r' { ' ' } else { c };
                    match current.last_mut() {
                        Some(segment) if segment.item == index => segment.text.push(c),
                        _ => current.push(Segment {
                            text: c.to_string(),
                            style: style.clone(),
                            line_height: *line_height,
                            background: *background,
                            item: index,
                        }),
                    }
                }
            }
            InlineItem::LineBreak { line_height } => {
                flush(&mut atoms, &mut current, &mut current_space);
                atoms.push(Atom::ForcedBreak {
                    line_height: *line_height,
                });
                pending_space = None;
            }
            InlineItem::BlockBoundary => {
                flush(&mut atoms, &mut current, &mut current_space);
                atoms.push(Atom::SoftBreak);
                pending_space = None;
            }
        }
    }
    flush(&mut atoms, &mut current, &mut current_space);
    atoms
}

/// Fills line boxes of a fixed width from the top of a block's content
/// area downward.
pub struct InlineLayout<'m> {
    metrics: &'m dyn FontMetrics,
    finished: Vec<LineBox>,
    open: Vec<LineFragment>,
    /// Left edge of every line.
    left: f32,
    /// Pen position, relative to `left`.
    pen: f32,
    /// Top of the open line.
    top: f32,
    width: f32,
    /// Tallest fragment or forced break on the open line.
    tallest: f32,
}

impl<'m> InlineLayout<'m> {
    /// Create a new inline layout context whose lines start at
    /// (`origin_x`, `start_y`).
    #[must_use]
    pub fn new(
        metrics: &'m dyn FontMetrics,
        origin_x: f32,
        start_y: f32,
        available_width: f32,
    ) -> Self {
        Self {
            metrics,
            finished: Vec::new(),
            open: Vec::new(),
            left: origin_x,
            pen: 0.0,
            top: start_y,
            width: available_width,
            tallest: 0.0,
        }
    }

    /// Lay out the items and return the line boxes.
    #[must_use]
    pub fn run(mut self, items: &[InlineItem]) -> Vec<LineBox> {
        for atom in atoms(items) {
            match atom {
                Atom::Word(word) => self.place_word(word),
                Atom::ForcedBreak { line_height } => self.force_break(line_height),
                Atom::SoftBreak => self.finish_line(),
            }
        }
        self.finish_line();
        self.finished
    }

    /// [§ 5.5 Line Breaking](https://www.w3.org/TR/css-text-3/#line-breaking)
    ///
    /// Greedy placement: the word goes on the current line unless the space
    /// plus the word would overflow and the line already has content. A word
    /// wider than the line is placed alone and overflows.
    fn place_word(&mut self, word: Word) {
        let widths: Vec<f32> = word
            .segments
            .iter()
            .map(|segment| self.metrics.styled_text_width(&segment.text, &segment.style))
            .collect();
        let word_width: f32 = widths.iter().sum();

        // STEP 1: "A sequence of collapsible spaces at the beginning of a line
        // is removed."
        let line_is_empty = self.open.is_empty();
        let mut space_width = match &word.space_before {
            Some(space) if !line_is_empty => self.metrics.styled_text_width(" ", &space.style),
            _ => 0.0,
        };

        // STEP 2: Wrap at the space if the word does not fit.
        let may_wrap = word.space_before.as_ref().is_some_and(|space| space.breakable);
        if !line_is_empty
            && may_wrap
            && self.pen + space_width + word_width > self.width
        {
            self.finish_line();
            space_width = 0.0;
        }

        // STEP 3: Place each segment.
        self.pen += space_width;
        for (segment, width) in word.segments.into_iter().zip(widths) {
            self.tallest = self.tallest.max(segment.line_height);
            self.open.push(LineFragment {
                bounds: Rect {
                    x: self.left + self.pen,
                    y: self.top,
                    width,
                    height: segment.line_height,
                },
                text: segment.text,
                style: segment.style,
                background: segment.background,
            });
            self.pen += width;
        }
    }

    /// [§ 5.1 Line Breaking](https://www.w3.org/TR/css-text-3/#line-break-details)
    ///
    /// "A line break is forced at a preserved newline." An empty line still
    /// takes up `line_height`.
    fn force_break(&mut self, line_height: f32) {
        self.tallest = self.tallest.max(line_height);
        if self.open.is_empty() {
            self.push_line();
        } else {
            self.finish_line();
        }
    }

    /// Close the open line if it has anything on it.
    fn finish_line(&mut self) {
        if self.open.is_empty() {
            self.tallest = 0.0;
        } else {
            self.push_line();
        }
    }

    fn push_line(&mut self) {
        let bounds = Rect {
            x: self.left,
            y: self.top,
            width: self.pen,
            height: self.tallest,
        };
        self.finished.push(LineBox {
            bounds,
            fragments: std::mem::take(&mut self.open),
        });
        self.top = bounds.bottom();
        self.pen = 0.0;
        self.tallest = 0.0;
    }
}

/// The height a block's lines stack to.
#[must_use]
pub fn total_height(lines: &[LineBox]) -> f32 {
    lines.iter().map(|line| line.bounds.height).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: ApproximateFontMetrics = ApproximateFontMetrics::new(0.5, 1.0);

    fn style() -> TextStyle {
        TextStyle::from_used(&UsedStyle::initial())
    }

    fn text(content: &str, white_space: WhiteSpace) -> InlineItem {
        InlineItem::Text {
            text: content.to_string(),
            style: TextStyle {
                font_size: 10.0,
                ..style()
            },
            white_space,
            line_height: 10.0,
            background: ColorValue::TRANSPARENT,
        }
    }

    fn lines(items: &[InlineItem], width: f32) -> Vec<String> {
        InlineLayout::new(&METRICS, 0.0, 0.0, width)
            .run(items)
            .iter()
            .map(LineBox::text)
            .collect()
    }

    #[test]
    fn test_words_fill_lines_greedily() {
        // Each character is 5px wide.
        let items = [text("aaa bbb ccc", WhiteSpace::Normal)];
        assert_eq!(lines(&items, 100.0), vec!["aaa bbb ccc"]);
        assert_eq!(lines(&items, 40.0), vec!["aaa bbb", "ccc"]);
        assert_eq!(lines(&items, 10.0), vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn test_white_space_collapses_across_items() {
        let items = [
            text("  hello   ", WhiteSpace::Normal),
            text("\n world ", WhiteSpace::Normal),
        ];
        let laid_out = InlineLayout::new(&METRICS, 0.0, 0.0, 1000.0).run(&items);
        assert_eq!(laid_out.len(), 1);
        let fragments = &laid_out[0].fragments;
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].bounds.x, 0.0);
        // "hello" is 25px, then one 5px space.
        assert_eq!(fragments[1].bounds.x, 30.0);
    }

    #[test]
    fn test_words_do_not_break_across_inline_boundaries() {
        let items = [
            text("aaaa", WhiteSpace::Normal),
            text("bbbb", WhiteSpace::Normal),
        ];
        let laid_out = InlineLayout::new(&METRICS, 0.0, 0.0, 20.0).run(&items);
        assert_eq!(laid_out.len(), 1);
        assert_eq!(laid_out[0].fragments.len(), 2);
        assert_eq!(laid_out[0].text(), "aaaabbbb");
    }

    #[test]
    fn test_pre_keeps_spaces_and_breaks_at_newlines() {
        let items = [text("a  b\nc", WhiteSpace::Pre)];
        assert_eq!(lines(&items, 5.0), vec!["a  b", "c"]);
    }

    #[test]
    fn test_nowrap_never_wraps() {
        let items = [text("aaa bbb ccc", WhiteSpace::Nowrap)];
        assert_eq!(lines(&items, 10.0), vec!["aaa bbb ccc"]);
    }

    #[test]
    fn test_forced_breaks() {
        let br = InlineItem::LineBreak { line_height: 10.0 };
        let items = [
            text("a", WhiteSpace::Normal),
            br.clone(),
            br,
            text(" b", WhiteSpace::Normal),
        ];
        let laid_out = InlineLayout::new(&METRICS, 0.0, 0.0, 100.0).run(&items);
        let texts: Vec<String> = laid_out.iter().map(LineBox::text).collect();
        assert_eq!(texts, vec!["a", "", "b"]);
        assert_eq!(total_height(&laid_out), 30.0);
        assert_eq!(laid_out[2].bounds.y, 20.0);
    }

    #[test]
    fn test_collapsible_items() {
        assert!(text(" \n\t", WhiteSpace::Normal).is_collapsible());
        assert!(!text(" ", WhiteSpace::Pre).is_collapsible());
        assert!(!InlineItem::LineBreak { line_height: 1.0 }.is_collapsible());
    }
}
