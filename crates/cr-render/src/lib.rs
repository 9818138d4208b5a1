// SPDX-License-Identifier: MIT
//
// cr-render: draws positioned command lists onto a character-cell terminal.
//
// Layout happens upstream and arrives as pixel-space boxes. This crate maps
// them onto cells, clips them against a stack of scissor regions, squeezes
// 24-bit color into the terminal palette, places text by display width,
// and writes only the cells that actually change.
//
//   geometry   pixel boxes → cell rectangles
//   clip       nested scissor regions
//   color      RGBA → palette index, (fg, bg) → pair id
//   text       width-aware measuring and column clipping
//   paint      per-frame back buffer, diffed output, borders, stale-cell sweep
//   renderer   terminal lifecycle and the per-frame loop
//
// The terminal itself is behind `cr_term::backend::TerminalBackend`, so
// everything here runs unchanged against `VirtualTerminal` in tests.

pub mod clip;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod renderer;
pub mod text;

pub use color::Rgba;
pub use command::{BorderWidths, Corners, RenderCommand};
pub use config::RenderConfig;
pub use error::{RenderError, Result};
pub use geometry::{BoundingBox, CellSize, Dimensions};
pub use renderer::{FrameStats, Renderer, RendererState};
pub use text::measure_text;
