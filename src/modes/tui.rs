//! Terminal setup shared by the interactive modes

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Render at 30 FPS (33ms per frame)
pub const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Switch stderr to raw mode on the alternate screen
pub fn enter() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

pub fn restore(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Time between simulation ticks for a tick rate in Hz
///
/// Never zero, since `tokio::time::interval` panics on a zero period.
pub fn tick_interval(tick_rate_hz: u32) -> Duration {
    let micros = 1_000_000 / u64::from(tick_rate_hz.max(1));
    Duration::from_micros(micros.max(1))
}
