//! Render loop: dedicated thread that redraws the puzzle at a steady cadence.
//!
//! The loop owns the surface. Every tick it locks a draw target, paints the
//! background, the target frame, the locked pieces and then the loose pieces
//! on top, and submits the target. It redraws whether or not input arrived.
//! A frame whose target cannot be acquired or submitted is skipped; the loop
//! itself never fails once started.

use super::messages::{RenderCommand, Scene, Sprite};
use crate::buffer::Rgb;
use crate::error::{PuzzleError, Result};
use crate::layout::Rect;
use crate::puzzle::PuzzleModel;
use crate::surface::{DrawTarget, Surface};
use bitflags::bitflags;
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

bitflags! {
    /// Layers drawn each frame, bottom to top.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Layers: u8 {
        /// Background texture stretched over the surface
        const BACKGROUND = 0b0001;
        /// Outline around the target grid
        const FRAME = 0b0010;
        /// Pieces locked into their targets
        const LOCKED = 0b0100;
        /// Loose pieces, drawn above locked ones
        const LOOSE = 0b1000;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::all()
    }
}

/// Configuration for the render loop.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Target frames per second.
    pub target_fps: u32,
    /// How long startup waits for the surface to become ready.
    pub ready_timeout: Duration,
    /// Layers to draw.
    pub layers: Layers,
    /// Color the target is cleared to.
    pub clear_color: Rgb,
    /// Color of the target grid outline.
    pub frame_color: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            ready_timeout: Duration::from_secs(2),
            layers: Layers::default(),
            clear_color: Rgb::BLACK,
            frame_color: Rgb::WHITE,
        }
    }
}

impl RenderConfig {
    /// Time between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames drawn and submitted.
    pub frames: u64,
    /// Frames skipped because the target failed.
    pub skipped: u64,
}

#[derive(Default)]
struct Counters {
    frames: AtomicU64,
    skipped: AtomicU64,
}

/// What the loop draws from.
struct FrameState {
    model: Option<Arc<PuzzleModel>>,
    scene: Arc<Scene>,
    paused: bool,
}

/// Handle to a running render loop.
pub struct RenderLoop {
    /// Handle to the render thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Frame counters.
    counters: Arc<Counters>,
}

impl RenderLoop {
    /// Wait for `surface` to become ready, then spawn the render thread.
    ///
    /// Fails with [`PuzzleError::SurfaceUnavailable`] if the surface is not
    /// ready within `config.ready_timeout`.
    pub fn start<S: Surface>(
        surface: S,
        receiver: Receiver<RenderCommand>,
        config: RenderConfig,
    ) -> Result<Self> {
        let deadline = Instant::now() + config.ready_timeout;
        while !surface.is_ready() {
            if Instant::now() >= deadline {
                log::warn!("surface not ready after {:?}", config.ready_timeout);
                return Err(PuzzleError::SurfaceUnavailable);
            }
            thread::sleep(Duration::from_millis(2));
        }

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let counters = Arc::new(Counters::default());
        let counters_clone = counters.clone();

        let handle = thread::Builder::new()
            .name("jigsaw-render".to_string())
            .spawn(move || {
                Self::run_loop(surface, &receiver, &shutdown_clone, &counters_clone, &config);
            })?;

        log::info!("render loop started");
        Ok(Self {
            handle: Some(handle),
            shutdown,
            counters,
        })
    }

    /// Signal the render thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Whether the render thread is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Frame counters so far.
    pub fn stats(&self) -> RenderStats {
        RenderStats {
            frames: self.counters.frames.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
        }
    }

    /// Signal shutdown and wait for the render thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        log::info!("render loop stopped");
    }

    /// Main render loop.
    fn run_loop<S: Surface>(
        mut surface: S,
        receiver: &Receiver<RenderCommand>,
        shutdown: &Arc<AtomicBool>,
        counters: &Counters,
        config: &RenderConfig,
    ) {
        let interval = config.frame_interval();
        let mut state = FrameState {
            model: None,
            scene: Arc::new(Scene::default()),
            paused: false,
        };
        let mut next_frame = Instant::now();

        'render: loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            // Everything queued is applied before the draw decision, so a
            // frame slower than the interval cannot starve the channel
            loop {
                match receiver.try_recv() {
                    Ok(RenderCommand::Shutdown) | Err(TryRecvError::Disconnected) => break 'render,
                    Ok(command) => {
                        if Self::apply(command, &mut state, &mut surface) {
                            next_frame = Instant::now();
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }

            if !state.paused && Instant::now() >= next_frame {
                match Self::draw_frame(&mut surface, &state, config) {
                    Ok(()) => {
                        counters.frames.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(PuzzleError::SurfaceUnavailable) => {
                        counters.skipped.fetch_add(1, Ordering::Relaxed);
                        log::debug!("frame skipped: surface unavailable");
                    }
                    Err(e) => {
                        counters.skipped.fetch_add(1, Ordering::Relaxed);
                        log::warn!("frame skipped: {e}");
                    }
                }

                next_frame += interval;
                // Behind schedule: restart the cadence instead of bursting
                let drawn = Instant::now();
                if next_frame < drawn {
                    next_frame = drawn + interval;
                }
            }

            let now = Instant::now();
            let wait = if state.paused {
                interval
            } else {
                next_frame.saturating_duration_since(now)
            };

            match receiver.recv_timeout(wait) {
                Ok(RenderCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(command) => {
                    if Self::apply(command, &mut state, &mut surface) {
                        next_frame = Instant::now();
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }

    /// Apply a command. Returns `true` when drawing should restart immediately.
    fn apply<S: Surface>(command: RenderCommand, state: &mut FrameState, surface: &mut S) -> bool {
        match command {
            RenderCommand::SetPuzzle(model) => {
                state.model = Some(model);
                false
            }
            RenderCommand::Scene(scene) => {
                state.scene = scene;
                false
            }
            RenderCommand::Resize { width, height } => {
                surface.resize(width, height);
                false
            }
            RenderCommand::Pause => {
                if !state.paused {
                    log::info!("render loop paused");
                }
                state.paused = true;
                false
            }
            RenderCommand::Resume => {
                let resumed = state.paused;
                if resumed {
                    log::info!("render loop resumed");
                }
                state.paused = false;
                resumed
            }
            RenderCommand::Shutdown => false,
        }
    }

    /// Acquire a target, paint one frame and submit it.
    fn draw_frame<S: Surface>(surface: &mut S, state: &FrameState, config: &RenderConfig) -> Result<()> {
        let mut target = surface.lock_target()?;
        paint(&mut target, state.model.as_deref(), &state.scene, config);
        surface.submit(target)
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Paint one frame of `scene` into `target`.
pub fn paint<T: DrawTarget>(target: &mut T, model: Option<&PuzzleModel>, scene: &Scene, config: &RenderConfig) {
    target.clear(config.clear_color);

    let Some(model) = model else {
        return;
    };

    if config.layers.contains(Layers::BACKGROUND) && model.is_background_texture_enabled() {
        if let Some(background) = model.background() {
            let (width, height) = target.size();
            target.draw_image(background, Rect::from_size(width as i32, height as i32));
        }
    }

    if config.layers.contains(Layers::FRAME) {
        target.stroke_rect(scene.frame, config.frame_color);
    }

    if config.layers.contains(Layers::LOCKED) {
        for sprite in scene.locked() {
            draw_sprite(target, model, sprite);
        }
    }

    if config.layers.contains(Layers::LOOSE) {
        for sprite in scene.loose() {
            draw_sprite(target, model, sprite);
        }
    }
}

fn draw_sprite<T: DrawTarget>(target: &mut T, model: &PuzzleModel, sprite: &Sprite) {
    // Stale index from a scene published for a previous model
    if let Some(piece) = model.piece(sprite.index) {
        target.draw_image(piece, sprite.rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::surface::MemorySurface;
    use crossbeam_channel::unbounded;

    /// Two 10x10 pieces: piece 0 red, piece 1 green.
    fn two_piece_model() -> Arc<PuzzleModel> {
        let image = PixelBuffer::from_fn(10, 20, |_, y| {
            if y < 10 {
                Rgb::new(255, 0, 0)
            } else {
                Rgb::new(0, 255, 0)
            }
        });
        Arc::new(PuzzleModel::new(image, None).unwrap())
    }

    fn scene(sprites: &[(usize, Rect, bool)]) -> Scene {
        Scene {
            sprites: sprites
                .iter()
                .map(|&(index, rect, locked)| Sprite { index, rect, locked })
                .collect(),
            frame: Rect::new(0, 0, 40, 40),
        }
    }

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_paint_draws_loose_above_locked() {
        let model = two_piece_model();
        // Loose piece 0 overlaps locked piece 1
        let scene = scene(&[
            (0, Rect::new(5, 5, 10, 10), false),
            (1, Rect::new(10, 10, 10, 10), true),
        ]);
        let mut target = PixelBuffer::new(40, 40);
        paint(&mut target, Some(model.as_ref()), &scene, &RenderConfig::default());

        assert_eq!(target.get(12, 12), Some(Rgb::new(255, 0, 0)));
        assert_eq!(target.get(18, 18), Some(Rgb::new(0, 255, 0)));
        assert_eq!(target.get(0, 0), Some(Rgb::WHITE)); // frame outline
        assert_eq!(target.get(30, 30), Some(Rgb::BLACK));
    }

    #[test]
    fn test_paint_respects_layers_and_background() {
        let mut model = PuzzleModel::new(PixelBuffer::filled(10, 10, Rgb::WHITE), None).unwrap();
        model.set_background(Some(PixelBuffer::filled(4, 4, Rgb::new(0, 0, 200))));
        let scene = scene(&[(0, Rect::new(0, 0, 5, 5), false)]);

        let config = RenderConfig {
            layers: Layers::BACKGROUND,
            ..RenderConfig::default()
        };
        let mut target = PixelBuffer::new(20, 20);
        paint(&mut target, Some(&model), &scene, &config);
        assert_eq!(target.get(2, 2), Some(Rgb::new(0, 0, 200)));

        model.set_background_texture_enabled(false);
        paint(&mut target, Some(&model), &scene, &config);
        assert_eq!(target.get(2, 2), Some(Rgb::BLACK));
    }

    #[test]
    fn test_paint_skips_stale_indices() {
        let model = two_piece_model();
        let scene = scene(&[(7, Rect::new(0, 0, 10, 10), false)]);
        let mut target = PixelBuffer::new(20, 20);
        paint(&mut target, Some(model.as_ref()), &scene, &RenderConfig::default());
        assert_eq!(target.get(5, 5), Some(Rgb::BLACK));
    }

    #[test]
    fn test_loop_redraws_without_input() {
        let surface = MemorySurface::new(40, 40);
        let viewer = surface.clone();
        let (tx, rx) = unbounded();
        let config = RenderConfig {
            target_fps: 200,
            ..RenderConfig::default()
        };

        tx.send(RenderCommand::SetPuzzle(two_piece_model())).unwrap();
        tx.send(RenderCommand::Scene(Arc::new(scene(&[(0, Rect::new(20, 20, 10, 10), false)]))))
            .unwrap();

        let render_loop = RenderLoop::start(surface, rx, config).unwrap();
        assert!(wait_for(|| viewer.presented() >= 5));
        assert_eq!(
            viewer.snapshot().unwrap().get(25, 25),
            Some(Rgb::new(255, 0, 0))
        );
        assert!(render_loop.is_running());
        render_loop.join();
    }

    #[test]
    fn test_loop_pause_and_resume() {
        let surface = MemorySurface::new(8, 8);
        let viewer = surface.clone();
        let (tx, rx) = unbounded();
        let config = RenderConfig {
            target_fps: 200,
            ..RenderConfig::default()
        };
        let render_loop = RenderLoop::start(surface, rx, config).unwrap();
        assert!(wait_for(|| viewer.presented() >= 1));

        tx.send(RenderCommand::Pause).unwrap();
        thread::sleep(Duration::from_millis(50));
        let paused_at = viewer.presented();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(viewer.presented(), paused_at);
        assert!(render_loop.is_running());

        tx.send(RenderCommand::Resume).unwrap();
        assert!(wait_for(|| viewer.presented() > paused_at));
        render_loop.join();
    }

    /// Memory surface whose submit takes longer than a frame interval.
    struct SlowSurface {
        inner: MemorySurface,
        delay: Duration,
    }

    impl Surface for SlowSurface {
        type Target = PixelBuffer;

        fn is_ready(&self) -> bool {
            self.inner.is_ready()
        }

        fn size(&self) -> (u32, u32) {
            self.inner.size()
        }

        fn lock_target(&mut self) -> Result<PixelBuffer> {
            self.inner.lock_target()
        }

        fn submit(&mut self, target: PixelBuffer) -> Result<()> {
            thread::sleep(self.delay);
            self.inner.submit(target)
        }
    }

    #[test]
    fn test_slow_frames_still_receive_commands() {
        let inner = MemorySurface::new(8, 8);
        let viewer = inner.clone();
        let surface = SlowSurface {
            inner,
            delay: Duration::from_millis(12),
        };
        let (tx, rx) = unbounded();
        let config = RenderConfig {
            target_fps: 100,
            ..RenderConfig::default()
        };
        let render_loop = RenderLoop::start(surface, rx, config).unwrap();
        assert!(wait_for(|| viewer.presented() >= 2));

        tx.send(RenderCommand::Pause).unwrap();
        assert!(wait_for(|| tx.is_empty()));
        // At most the frame in flight lands after the pause is taken
        thread::sleep(Duration::from_millis(30));
        let paused_at = viewer.presented();
        thread::sleep(Duration::from_millis(60));
        assert_eq!(viewer.presented(), paused_at);

        tx.send(RenderCommand::Resume).unwrap();
        assert!(wait_for(|| viewer.presented() > paused_at));
        render_loop.join();
    }

    #[test]
    fn test_loop_skips_frames_when_target_unavailable() {
        let surface = MemorySurface::new(8, 8);
        let viewer = surface.clone();
        let (_tx, rx) = unbounded();
        let config = RenderConfig {
            target_fps: 200,
            ..RenderConfig::default()
        };
        let render_loop = RenderLoop::start(surface, rx, config).unwrap();

        viewer.set_ready(false);
        assert!(wait_for(|| render_loop.stats().skipped >= 3));
        assert!(render_loop.is_running());

        viewer.set_ready(true);
        let frames = render_loop.stats().frames;
        assert!(wait_for(|| render_loop.stats().frames > frames));
        render_loop.join();
    }

    #[test]
    fn test_start_times_out_on_unready_surface() {
        let surface = MemorySurface::new(8, 8);
        surface.set_ready(false);
        let (_tx, rx) = unbounded();
        let config = RenderConfig {
            ready_timeout: Duration::from_millis(20),
            ..RenderConfig::default()
        };
        assert!(matches!(
            RenderLoop::start(surface, rx, config),
            Err(PuzzleError::SurfaceUnavailable)
        ));
    }

    #[test]
    fn test_loop_stops_on_shutdown_command() {
        let (tx, rx) = unbounded();
        let render_loop = RenderLoop::start(MemorySurface::new(8, 8), rx, RenderConfig::default()).unwrap();
        tx.send(RenderCommand::Shutdown).unwrap();
        assert!(wait_for(|| !render_loop.is_running()));
        render_loop.join();
    }
}
