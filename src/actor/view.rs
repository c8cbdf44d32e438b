//! PuzzleView: host-facing coordinator that ties the controller and the
//! render loop together.
//!
//! The host calls the `on_*` methods from its own dispatch thread. Input goes
//! straight into the [`InteractionController`]; lifecycle events start, pause
//! and stop the [`RenderLoop`].

use super::controller::{InteractionController, ViewConfig};
use super::messages::{HostEvent, RenderCommand};
use super::renderer::{RenderConfig, RenderLoop, RenderStats};
use crate::error::Result;
use crate::puzzle::PuzzleModel;
use crate::surface::Surface;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;

/// The puzzle view host.
pub struct PuzzleView {
    /// Geometry for new controllers.
    view_config: ViewConfig,
    /// Configuration for new render loops.
    render_config: RenderConfig,
    /// Command sender shared with the controller.
    render_tx: Sender<RenderCommand>,
    /// Command receiver handed to each render loop.
    render_rx: Receiver<RenderCommand>,
    /// The running render loop, while a surface exists.
    render_loop: Option<RenderLoop>,
    /// Interaction state for the current puzzle.
    controller: Option<InteractionController>,
    /// Last known surface size.
    surface_size: (u32, u32),
    /// Whether the host currently has focus.
    focused: bool,
}

impl PuzzleView {
    /// Create a view with no puzzle and no surface.
    pub fn new(view_config: ViewConfig, render_config: RenderConfig) -> Self {
        let (render_tx, render_rx) = unbounded();
        Self {
            surface_size: view_config.surface_size,
            view_config,
            render_config,
            render_tx,
            render_rx,
            render_loop: None,
            controller: None,
            focused: true,
        }
    }

    /// Show `model`, scattering its pieces over the surface.
    ///
    /// Replaces any previous puzzle.
    pub fn set_puzzle(&mut self, model: PuzzleModel) -> Arc<PuzzleModel> {
        let model = Arc::new(model);
        let config = ViewConfig {
            surface_size: self.surface_size,
            ..self.view_config.clone()
        };

        let mut controller = InteractionController::new(model.clone(), config);
        if self.render_loop.is_some() {
            self.send(RenderCommand::SetPuzzle(model.clone()));
            controller.set_publisher(Some(self.render_tx.clone()));
            controller.publish();
        }
        self.controller = Some(controller);
        model
    }

    /// The surface is ready: start rendering into it.
    ///
    /// Any previous render loop is stopped first. Fails if the surface does
    /// not become ready within the configured timeout.
    pub fn on_surface_ready<S: Surface>(&mut self, surface: S) -> Result<()> {
        self.stop_rendering();

        let (width, height) = surface.size();
        if width > 0 && height > 0 {
            self.on_surface_resized(width, height);
        }

        // Queued ahead of the loop so its first frame already sees them
        if !self.focused {
            let _ = self.render_tx.send(RenderCommand::Pause);
        }
        if let Some(controller) = &mut self.controller {
            let _ = self
                .render_tx
                .send(RenderCommand::SetPuzzle(controller.model().clone()));
            controller.set_publisher(Some(self.render_tx.clone()));
            controller.publish();
        }

        match RenderLoop::start(surface, self.render_rx.clone(), self.render_config.clone()) {
            Ok(render_loop) => {
                self.render_loop = Some(render_loop);
                Ok(())
            }
            Err(e) => {
                self.detach();
                Err(e)
            }
        }
    }

    /// The surface changed size.
    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        self.surface_size = (width, height);
        if let Some(controller) = &mut self.controller {
            controller.set_surface_size(width, height);
        }
        self.send(RenderCommand::Resize { width, height });
    }

    /// The surface is going away: stop the render loop and wait for it.
    pub fn on_surface_torn_down(&mut self) {
        self.stop_rendering();
    }

    /// Pointer pressed.
    pub fn on_pointer_down(&mut self, x: i32, y: i32) -> bool {
        self.controller
            .as_mut()
            .is_some_and(|c| c.pointer_down(x, y))
    }

    /// Pointer moved.
    pub fn on_pointer_move(&mut self, x: i32, y: i32) -> bool {
        self.controller
            .as_mut()
            .is_some_and(|c| c.pointer_move(x, y))
    }

    /// Pointer released.
    pub fn on_pointer_up(&mut self, x: i32, y: i32) -> bool {
        self.controller.as_mut().is_some_and(|c| c.pointer_up(x, y))
    }

    /// Focus lost: pause drawing. A piece held mid-drag stays where it is.
    ///
    /// A render loop started while focus is still lost begins paused.
    pub fn on_focus_lost(&mut self) {
        self.focused = false;
        self.send(RenderCommand::Pause);
    }

    /// Focus regained: resume drawing.
    pub fn on_focus_gained(&mut self) {
        self.focused = true;
        self.send(RenderCommand::Resume);
    }

    /// Route a host event to the matching callback.
    ///
    /// Returns `true` if the event changed puzzle state. Keys, quit and
    /// input-thread notifications are left to the host.
    pub fn dispatch(&mut self, event: &HostEvent) -> bool {
        match *event {
            HostEvent::PointerDown { x, y } => self.on_pointer_down(x, y),
            HostEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            HostEvent::PointerUp { x, y } => self.on_pointer_up(x, y),
            HostEvent::Resized { width, height } => {
                self.on_surface_resized(width, height);
                false
            }
            HostEvent::FocusLost => {
                self.on_focus_lost();
                false
            }
            HostEvent::FocusGained => {
                self.on_focus_gained();
                false
            }
            HostEvent::Key(_) | HostEvent::Quit | HostEvent::Error(_) | HostEvent::Shutdown => false,
        }
    }

    /// The interaction controller, once a puzzle is set.
    pub const fn controller(&self) -> Option<&InteractionController> {
        self.controller.as_ref()
    }

    /// Mutable access to the interaction controller.
    pub fn controller_mut(&mut self) -> Option<&mut InteractionController> {
        self.controller.as_mut()
    }

    /// Whether a render loop is running.
    pub fn is_rendering(&self) -> bool {
        self.render_loop.as_ref().is_some_and(RenderLoop::is_running)
    }

    /// Frame counters of the current render loop.
    pub fn render_stats(&self) -> Option<RenderStats> {
        self.render_loop.as_ref().map(RenderLoop::stats)
    }

    /// Last known surface size.
    pub const fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    /// Whether the host currently has focus.
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Send a command only while a render loop is consuming them.
    fn send(&self, command: RenderCommand) {
        if self.render_loop.is_some() {
            let _ = self.render_tx.send(command);
        }
    }

    /// Stop publishing scenes and drop whatever the loop never consumed.
    fn detach(&mut self) {
        if let Some(controller) = &mut self.controller {
            controller.set_publisher(None);
        }
        while self.render_rx.try_recv().is_ok() {}
    }

    fn stop_rendering(&mut self) {
        if let Some(render_loop) = self.render_loop.take() {
            render_loop.join();
        }
        self.detach();
    }
}

impl Default for PuzzleView {
    fn default() -> Self {
        Self::new(ViewConfig::default(), RenderConfig::default())
    }
}

impl Drop for PuzzleView {
    fn drop(&mut self) {
        self.stop_rendering();
    }
}

impl std::fmt::Debug for PuzzleView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuzzleView")
            .field("surface_size", &self.surface_size)
            .field("rendering", &self.is_rendering())
            .field("focused", &self.focused)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Gesture;
    use crate::buffer::{PixelBuffer, Rgb};
    use crate::layout::Rect;
    use crate::surface::MemorySurface;
    use std::thread;
    use std::time::{Duration, Instant};

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

    fn view() -> PuzzleView {
        let view_config = ViewConfig {
            piece_size: 10,
            lock_zone_left: 2,
            lock_zone_top: 2,
            surface_size: (80, 60),
            seed: Some(3),
        };
        let render_config = RenderConfig {
            target_fps: 200,
            ..RenderConfig::default()
        };
        PuzzleView::new(view_config, render_config)
    }

    /// 20x10 image of two 10x10 pieces: piece 0 red, piece 1 blue.
    fn model() -> PuzzleModel {
        let image = PixelBuffer::from_fn(20, 10, |x, _| {
            if x < 10 {
                Rgb::new(255, 0, 0)
            } else {
                Rgb::new(0, 0, 255)
            }
        });
        PuzzleModel::new(image, None).unwrap()
    }

    #[test]
    fn test_pointer_events_without_puzzle_are_ignored() {
        let mut view = view();
        assert!(!view.on_pointer_down(1, 1));
        assert!(!view.on_pointer_move(1, 1));
        assert!(!view.on_pointer_up(1, 1));
    }

    #[test]
    fn test_drag_and_snap_reaches_surface() {
        let mut view = view();
        view.set_puzzle(model());
        let surface = MemorySurface::new(80, 60);
        let viewer = surface.clone();
        view.on_surface_ready(surface).unwrap();
        assert!(view.is_rendering());

        let controller = view.controller_mut().unwrap();
        controller.place_piece(0, Rect::new(60, 0, 10, 10));
        controller.place_piece(1, Rect::new(50, 40, 10, 10));

        assert!(view.dispatch(&HostEvent::PointerDown { x: 55, y: 45 }));
        // Piece 1's target is (12, 2, 10, 10)
        assert!(view.dispatch(&HostEvent::PointerMove { x: 15, y: 5 }));
        assert!(view.dispatch(&HostEvent::PointerUp { x: 15, y: 5 }));

        let controller = view.controller().unwrap();
        assert!(controller.model().is_locked(1));
        assert_eq!(controller.gesture(), Gesture::Idle);

        assert!(wait_for(|| {
            viewer
                .snapshot()
                .is_some_and(|frame| frame.get(17, 7) == Some(Rgb::new(0, 0, 255)))
        }));

        view.on_surface_torn_down();
        assert!(!view.is_rendering());
    }

    #[test]
    fn test_focus_loss_pauses_rendering() {
        let mut view = view();
        view.set_puzzle(model());
        let surface = MemorySurface::new(80, 60);
        let viewer = surface.clone();
        view.on_surface_ready(surface).unwrap();
        assert!(wait_for(|| viewer.presented() >= 1));

        view.dispatch(&HostEvent::FocusLost);
        thread::sleep(Duration::from_millis(50));
        let paused_at = viewer.presented();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(viewer.presented(), paused_at);

        view.dispatch(&HostEvent::FocusGained);
        assert!(wait_for(|| viewer.presented() > paused_at));
    }

    #[test]
    fn test_no_backlog_without_surface() {
        let mut view = view();
        view.set_puzzle(model());
        let controller = view.controller_mut().unwrap();
        controller.place_piece(0, Rect::new(60, 0, 10, 10));
        assert!(view.on_pointer_down(65, 5));

        for step in 0..10_000 {
            view.on_pointer_move(40 + step % 30, 40);
        }
        view.dispatch(&HostEvent::Resized { width: 90, height: 70 });
        view.dispatch(&HostEvent::FocusLost);
        assert!(view.render_rx.is_empty());
    }

    #[test]
    fn test_no_backlog_after_teardown() {
        let mut view = view();
        view.set_puzzle(model());
        view.on_surface_ready(MemorySurface::new(80, 60)).unwrap();
        view.on_surface_torn_down();

        let controller = view.controller_mut().unwrap();
        controller.place_piece(1, Rect::new(50, 40, 10, 10));
        view.on_pointer_down(55, 45);
        for step in 0..100 {
            view.on_pointer_move(60 + step % 10, 45);
        }
        assert!(view.render_rx.is_empty());
    }

    #[test]
    fn test_restart_while_unfocused_starts_paused() {
        let mut view = view();
        view.set_puzzle(model());
        view.dispatch(&HostEvent::FocusLost);
        assert!(!view.is_focused());

        let surface = MemorySurface::new(80, 60);
        let viewer = surface.clone();
        view.on_surface_ready(surface).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(viewer.presented(), 0);
        assert!(view.is_rendering());

        view.dispatch(&HostEvent::FocusGained);
        assert!(wait_for(|| viewer.presented() >= 1));
    }

    #[test]
    fn test_surface_ready_times_out() {
        let mut view = PuzzleView::new(
            ViewConfig::default(),
            RenderConfig {
                ready_timeout: Duration::from_millis(10),
                ..RenderConfig::default()
            },
        );
        let surface = MemorySurface::new(8, 8);
        surface.set_ready(false);
        assert!(view.on_surface_ready(surface).is_err());
        assert!(!view.is_rendering());
    }

    #[test]
    fn test_resize_updates_scatter_area() {
        let mut view = view();
        view.set_puzzle(model());
        view.dispatch(&HostEvent::Resized { width: 30, height: 25 });
        assert_eq!(view.surface_size(), (30, 25));

        let controller = view.controller_mut().unwrap();
        controller.reset();
        for index in 0..2 {
            let rect = controller.screen_rect(index).unwrap();
            assert!(rect.x < 20 && rect.y < 5);
        }
    }
}
