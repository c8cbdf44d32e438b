//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling to
//! turn mouse, focus, resize and key events into [`HostEvent`]s in surface
//! pixel coordinates. A terminal cell is one pixel wide and two pixels tall
//! (see [`TerminalSurface`](crate::terminal::TerminalSurface)).

use super::messages::HostEvent;
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `sender` - Channel to send host events to the main loop.
    /// * `poll_timeout` - How long to wait for events before checking shutdown.
    pub fn spawn(sender: Sender<HostEvent>, poll_timeout: Duration) -> std::io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("jigsaw-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(sender: &Sender<HostEvent>, shutdown: &Arc<AtomicBool>, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.send(HostEvent::Shutdown);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if let Some(host_event) = convert_event(event) {
                            if sender.send(host_event).is_err() {
                                // Receiver dropped, exit
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = sender.send(HostEvent::Error(e.to_string()));
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    let _ = sender.send(HostEvent::Error(e.to_string()));
                }
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Convert a crossterm event to a host event.
pub fn convert_event(event: Event) -> Option<HostEvent> {
    match event {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return None;
            }
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(HostEvent::Quit),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(HostEvent::Quit),
                KeyCode::Char(c) => Some(HostEvent::Key(c)),
                _ => None,
            }
        }

        Event::Mouse(mouse) => {
            let x = i32::from(mouse.column);
            let y = i32::from(mouse.row) * 2;
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(HostEvent::PointerDown { x, y }),
                MouseEventKind::Drag(MouseButton::Left) => Some(HostEvent::PointerMove { x, y }),
                MouseEventKind::Up(MouseButton::Left) => Some(HostEvent::PointerUp { x, y }),
                _ => None,
            }
        }

        Event::Resize(columns, rows) => Some(HostEvent::Resized {
            width: u32::from(columns),
            height: u32::from(rows) * 2,
        }),

        Event::FocusGained => Some(HostEvent::FocusGained),

        Event::FocusLost => Some(HostEvent::FocusLost),

        Event::Paste(_) => None,
    }
}
