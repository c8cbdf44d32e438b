//! `TerminalSession`: raw-mode terminal setup and restore.

use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use std::io;

/// Configuration for a terminal session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Whether to enable mouse capture.
    pub enable_mouse: bool,
    /// Whether to report focus changes.
    pub enable_focus: bool,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enable_mouse: true,
            enable_focus: true,
            alternate_screen: true,
        }
    }
}

/// Puts the terminal into raw mode for the lifetime of the value.
///
/// Dropping the session restores the cursor, mouse and focus reporting, the
/// main screen and cooked mode, in reverse order of setup.
pub struct TerminalSession {
    config: SessionConfig,
}

impl TerminalSession {
    /// Enter raw mode with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails (raw mode, alternate screen, etc.).
    pub fn new() -> io::Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Enter raw mode with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails.
    pub fn with_config(config: SessionConfig) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on Drop restores whatever was enabled
        let session = Self { config };

        let mut stdout = io::stdout();
        if session.config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if session.config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        if session.config.enable_focus {
            execute!(stdout, EnableFocusChange)?;
        }
        execute!(stdout, cursor::Hide)?;
        debug!("terminal session started: {:?}", session.config);
        Ok(session)
    }

    /// Current terminal size in cells.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.config.enable_focus {
            let _ = execute!(stdout, DisableFocusChange);
        }
        if self.config.enable_mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if self.config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
        debug!("terminal session restored");
    }
}
