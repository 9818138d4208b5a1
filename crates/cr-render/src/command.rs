// SPDX-License-Identifier: MIT
//
// Render commands: the renderer's whole input.
//
// A frame is a slice of commands in paint order. Later commands paint over
// earlier ones, and text takes its background from whatever is already on
// screen, so backgrounds must come before the text that sits on them.
// Scissor commands nest: every `ScissorStart` should have a later
// `ScissorEnd`. A stray end is ignored, and a missing end leaves the
// narrower clip active until the frame ends.

use bitflags::bitflags;

use crate::color::Rgba;
use crate::geometry::BoundingBox;

bitflags! {
    /// Corners drawn with a rounded glyph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Corners: u8 {
        const TOP_LEFT     = 0b0001;
        const TOP_RIGHT    = 0b0010;
        const BOTTOM_LEFT  = 0b0100;
        const BOTTOM_RIGHT = 0b1000;
    }
}

/// Border thickness per side. Any width above zero draws a one-cell line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct BorderWidths {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl BorderWidths {
    #[must_use]
    pub const fn all(width: u16) -> Self {
        Self {
            top: width,
            right: width,
            bottom: width,
            left: width,
        }
    }
}

/// One drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand<'a> {
    /// Fill the box with `color`.
    Rectangle { bounds: BoundingBox, color: Rgba },

    /// A single line of text starting at the box origin. `color` of `None`
    /// uses the configured default text color.
    Text {
        bounds: BoundingBox,
        text: &'a [u8],
        color: Option<Rgba>,
    },

    /// Box-drawing lines along the box edges.
    Border {
        bounds: BoundingBox,
        color: Rgba,
        widths: BorderWidths,
        rounded: Corners,
    },

    /// Push a clip region.
    ScissorStart { bounds: BoundingBox },

    /// Pop the innermost clip region. Carries no bounds: a pop always
    /// restores the region below.
    ScissorEnd,
}

impl<'a> RenderCommand<'a> {
    #[must_use]
    pub const fn rectangle(bounds: BoundingBox, color: Rgba) -> Self {
        Self::Rectangle { bounds, color }
    }

    #[must_use]
    pub const fn text(bounds: BoundingBox, text: &'a str, color: Rgba) -> Self {
        Self::Text {
            bounds,
            text: text.as_bytes(),
            color: Some(color),
        }
    }

    /// Text in the default text color.
    #[must_use]
    pub const fn plain_text(bounds: BoundingBox, text: &'a str) -> Self {
        Self::Text {
            bounds,
            text: text.as_bytes(),
            color: None,
        }
    }

    #[must_use]
    pub const fn border(
        bounds: BoundingBox,
        color: Rgba,
        widths: BorderWidths,
        rounded: Corners,
    ) -> Self {
        Self::Border {
            bounds,
            color,
            widths,
            rounded,
        }
    }

    #[must_use]
    pub const fn scissor_start(bounds: BoundingBox) -> Self {
        Self::ScissorStart { bounds }
    }

    /// The box this command covers, `None` for `ScissorEnd`.
    #[must_use]
    pub const fn bounds(&self) -> Option<BoundingBox> {
        match self {
            Self::Rectangle { bounds, .. }
            | Self::Text { bounds, .. }
            | Self::Border { bounds, .. }
            | Self::ScissorStart { bounds } => Some(*bounds),
            Self::ScissorEnd => None,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Text { .. } => "text",
            Self::Border { .. } => "border",
            Self::ScissorStart { .. } => "scissor_start",
            Self::ScissorEnd => "scissor_end",
        }
    }
}
