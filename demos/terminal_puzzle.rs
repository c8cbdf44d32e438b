//! Terminal Puzzle Demo
//!
//! Plays a jigsaw puzzle in the terminal with the mouse. Pieces are drawn as
//! truecolor half blocks, so one cell holds two pixels.
//!
//! Run with: `cargo run --example terminal_puzzle [image-path]`
//!
//! Drag pieces onto the outlined grid. `r` scatters them again, `b` toggles
//! the background layer, `q` or Esc quits. Set `RUST_LOG=debug` and redirect
//! stderr to a file to see engine logs.

use crossbeam_channel::{bounded, RecvTimeoutError};
use jigsaw::{
    load_and_scale, GridSpec, HostEvent, ImageSource, InputActor, PixelBuffer, PuzzleEvents,
    PuzzleModel, PuzzleView, RenderConfig, Rgb, TerminalSession, TerminalSurface, ViewConfig,
};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

const PIECE_SIZE: i32 = 10;
const GRID: GridSpec = GridSpec::new(4, 3);

/// Logs every puzzle callback.
struct LogEvents;

impl PuzzleEvents for LogEvents {
    fn on_piece_grabbed(&self, index: usize, x: i32, y: i32) {
        info!("grabbed piece {index} at ({x}, {y})");
    }

    fn on_piece_dropped(&self, index: usize, x: i32, y: i32) {
        info!("dropped piece {index} at ({x}, {y})");
    }
}

/// A diagonal gradient used when no image path is given.
fn gradient(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = 255 - ((x + y) * 255 / (width + height).max(1)) as u8;
        Rgb::new(r, g, b)
    })
}

/// Dark checkerboard shown behind the pieces while the layer is enabled.
fn checkerboard(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgb::from_u32(0x0020_2830)
        } else {
            Rgb::from_u32(0x0030_3840)
        }
    })
}

fn load_image() -> jigsaw::Result<PixelBuffer> {
    match std::env::args().nth(1) {
        Some(path) => load_and_scale(&ImageSource::from(std::path::PathBuf::from(path)), 120, 90),
        None => Ok(gradient(120, 90)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let image = load_image()?;
    let mut model = PuzzleModel::new(image, Some(GRID))?.with_events(Arc::new(LogEvents));
    model.set_background(Some(checkerboard(240, 120)));

    let session = TerminalSession::new()?;
    let surface = TerminalSurface::stdout()?;

    let view_config = ViewConfig {
        piece_size: PIECE_SIZE,
        lock_zone_left: 2,
        lock_zone_top: 2,
        surface_size: jigsaw::Surface::size(&surface),
        seed: None,
    };
    let render_config = RenderConfig {
        target_fps: 30,
        ..RenderConfig::default()
    };

    let mut view = PuzzleView::new(view_config, render_config);
    let model = view.set_puzzle(model);
    view.on_surface_ready(surface)?;

    let (input_tx, input_rx) = bounded::<HostEvent>(64);
    let input = InputActor::spawn(input_tx, Duration::from_millis(10))?;

    loop {
        let event = match input_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match event {
            HostEvent::Quit | HostEvent::Shutdown => break,
            HostEvent::Key('r') => {
                if let Some(controller) = view.controller_mut() {
                    controller.reset();
                }
            }
            HostEvent::Key('b') => {
                model.set_background_texture_enabled(!model.is_background_texture_enabled());
            }
            HostEvent::Error(message) => warn!("input error: {message}"),
            other => {
                if view.dispatch(&other) && model.is_solved() {
                    info!("puzzle solved");
                }
            }
        }
    }

    drop(input_rx);
    input.join();
    let stats = view.render_stats();
    view.on_surface_torn_down();
    drop(session);

    if let Some(stats) = stats {
        println!("frames: {}, skipped: {}", stats.frames, stats.skipped);
    }
    println!(
        "locked {} of {} pieces",
        model.locked_count(),
        model.piece_count()
    );
    Ok(())
}
