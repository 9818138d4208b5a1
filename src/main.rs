// SPDX-License-Identifier: MIT
//
// cellrender: a terminal dashboard drawn through the cell renderer.
//
// Wires the crates together:
//
//   cr-term   → terminal session, ANSI backend, input parsing
//   cr-render → command lists to diffed cell writes
//
// The loop is poll → measure → build → render → sleep. Input is drained
// without blocking, the screen is re-measured every frame so resizes need
// nothing special, and the frame is rebuilt from scratch each time. The
// renderer's diffing keeps the terminal traffic down to what changed.
//
// Logging goes to a file and only when `CR_LOG=<path>` is set. The terminal
// belongs to the dashboard, so nothing is ever printed to stdout or stderr
// while it runs.

mod dashboard;

use std::env;
use std::fs::File;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cr_render::{RenderConfig, Renderer};
use cr_term::backend::AnsiBackend;

use crate::dashboard::Dashboard;

/// Pause between frames, roughly 60 per second.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

fn init_logging() -> Result<()> {
    let Some(path) = env::var_os("CR_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("cannot open log file {}", path.to_string_lossy()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cellrender starting");
    Ok(())
}

fn run(renderer: &mut Renderer<AnsiBackend>) -> Result<()> {
    let mut app = Dashboard::new();
    let cell = renderer.config().cell_size;

    while !app.should_quit() {
        while let Some(event) = renderer.poll_event() {
            app.handle_event(event);
        }
        if app.should_quit() {
            break;
        }

        let dims = renderer.layout_dimensions();
        let canvas = app.build(dims, cell);
        let stats = renderer
            .render(&canvas.commands())
            .context("failed to draw frame")?;
        app.record_frame(stats);

        thread::sleep(FRAME_INTERVAL);
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let mut renderer = Renderer::new(AnsiBackend::from_env(), RenderConfig::from_env());
    renderer
        .initialize()
        .context("failed to initialize terminal")?;

    let result = run(&mut renderer);
    // Restore before reporting, so the error lands on a usable terminal.
    let restored = renderer
        .terminate()
        .context("failed to restore terminal");

    result.and(restored)
}
