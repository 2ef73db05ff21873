//! The painter's output.
//!
//! Gob paints two things: solid backgrounds and text. Both carry the
//! absolute rectangle layout gave them, so a renderer needs nothing else
//! from the layout tree.

use serde::Serialize;

use crate::layout::{Rect, TextStyle};
use crate::style::ColorValue;

/// One drawing command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DisplayCommand {
    /// A block's padding box or an inline fragment's background.
    Fill {
        /// The area to cover.
        area: Rect,
        /// The fill color, possibly translucent.
        color: ColorValue,
    },
    /// One text fragment.
    Text {
        /// The fragment's line-height tall slot; glyphs are centered in it
        /// vertically.
        slot: Rect,
        /// The text to draw.
        text: String,
        /// The font and color to draw it with.
        style: TextStyle,
    },
}

/// Drawing commands, back to front.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList(Vec<DisplayCommand>);

impl DisplayList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a command; it paints over everything before it.
    pub fn push(&mut self, command: DisplayCommand) {
        self.0.push(command);
    }

    /// The commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.0
    }

    /// The text of every [`DisplayCommand::Text`], in painting order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter_map(|command| match command {
                DisplayCommand::Text { text, .. } => Some(text.as_str()),
                DisplayCommand::Fill { .. } => None,
            })
            .collect()
    }
}

impl FromIterator<DisplayCommand> for DisplayList {
    fn from_iter<I: IntoIterator<Item = DisplayCommand>>(commands: I) -> Self {
        Self(commands.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DisplayCommand;
    type IntoIter = std::slice::Iter<'a, DisplayCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
