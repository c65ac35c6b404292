use std::io;
use std::panic;
use std::sync::Once;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Size;

use crate::config::{BoardGeometry, Theme};
use crate::game::GameState;
use crate::renderer::{self, Overlay};

static PANIC_HOOK: Once = Once::new();

/// What a drawn frame depends on besides the board itself.
type FrameKey = (u64, Overlay, Size);

/// Screen the game draws into, plus the terminal modes it switched on.
///
/// [`GameScreen::enter`] takes over the real terminal; [`GameScreen::headless`]
/// wraps any backend and leaves terminal modes alone.
pub struct GameScreen<B: Backend> {
    terminal: Terminal<B>,
    geometry: BoardGeometry,
    theme: &'static Theme,
    last_frame: Option<FrameKey>,
    _modes: Option<RawModeGuard>,
}

impl GameScreen<CrosstermBackend<io::Stdout>> {
    /// Enters raw mode and a cleared alternate screen with the cursor hidden.
    pub fn enter(geometry: BoardGeometry, theme: &'static Theme) -> io::Result<Self> {
        PANIC_HOOK.call_once(install_panic_hook);
        let modes = RawModeGuard::acquire()?;

        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            geometry,
            theme,
            last_frame: None,
            _modes: Some(modes),
        })
    }
}

impl<B: Backend> GameScreen<B> {
    /// Wraps `backend` without touching terminal modes.
    pub fn headless(
        backend: B,
        geometry: BoardGeometry,
        theme: &'static Theme,
    ) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            geometry,
            theme,
            last_frame: None,
            _modes: None,
        })
    }

    /// Draws `state` unless the same tick, overlay and terminal size are
    /// already on screen. Returns whether a frame was drawn.
    pub fn present(&mut self, state: &GameState, overlay: Overlay) -> io::Result<bool> {
        let frame_key = (state.tick_count, overlay, self.terminal.size()?);
        if self.last_frame == Some(frame_key) {
            return Ok(false);
        }

        let (geometry, theme) = (&self.geometry, self.theme);
        self.terminal
            .draw(|frame| renderer::render(frame, state, geometry, overlay, theme))?;
        self.last_frame = Some(frame_key);
        Ok(true)
    }

    /// Forces the next [`GameScreen::present`] to redraw, e.g. after a restart.
    pub fn invalidate(&mut self) -> io::Result<()> {
        self.last_frame = None;
        self.terminal.clear()
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

/// Raw mode, alternate screen and hidden cursor; restored on drop.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        let entered = execute!(stdout, EnterAlternateScreen, Clear(ClearType::All), Hide);
        if let Err(error) = entered {
            let _ = restore_terminal();
            return Err(error);
        }
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)
}

/// Leaves raw mode before the default hook prints, so the message is readable.
fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use crate::config::{BoardGeometry, THEME_CLASSIC};
    use crate::game::GameEngine;
    use crate::input::Direction;
    use crate::renderer::Overlay;

    use super::GameScreen;

    fn screen_text(screen: &GameScreen<TestBackend>) -> String {
        screen
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn headless_screen() -> GameScreen<TestBackend> {
        GameScreen::headless(
            TestBackend::new(80, 40),
            BoardGeometry::default(),
            &THEME_CLASSIC,
        )
        .expect("test backend never fails")
    }

    #[test]
    fn unchanged_tick_is_not_redrawn() {
        let mut screen = headless_screen();
        let mut engine = GameEngine::new_with_seed(BoardGeometry::default(), 3);

        assert!(screen.present(&engine.snapshot(), Overlay::None).expect("draw"));
        assert!(!screen.present(&engine.snapshot(), Overlay::None).expect("draw"));

        engine.set_direction(Direction::Down);
        assert!(!screen.present(&engine.snapshot(), Overlay::None).expect("draw"));

        engine.step();
        assert!(screen.present(&engine.snapshot(), Overlay::None).expect("draw"));
    }

    #[test]
    fn overlay_change_redraws_with_popup() {
        let mut screen = headless_screen();
        let engine = GameEngine::new_with_seed(BoardGeometry::default(), 3);

        screen
            .present(&engine.snapshot(), Overlay::Start)
            .expect("draw");
        assert!(screen_text(&screen).contains("SNEK"));

        assert!(screen.present(&engine.snapshot(), Overlay::Pause).expect("draw"));
        assert!(screen_text(&screen).contains("PAUSED"));
    }

    #[test]
    fn resized_terminal_is_redrawn() {
        let mut screen = headless_screen();
        let engine = GameEngine::new_with_seed(BoardGeometry::default(), 3);

        screen.present(&engine.snapshot(), Overlay::None).expect("draw");
        screen.terminal.backend_mut().resize(100, 50);

        assert!(screen.present(&engine.snapshot(), Overlay::None).expect("draw"));
    }

    #[test]
    fn invalidate_forces_redraw() {
        let mut screen = headless_screen();
        let engine = GameEngine::new_with_seed(BoardGeometry::default(), 3);

        screen.present(&engine.snapshot(), Overlay::None).expect("draw");
        screen.invalidate().expect("clear");

        assert!(screen.present(&engine.snapshot(), Overlay::None).expect("draw"));
        assert!(screen_text(&screen).contains("Score: 0"));
    }
}
