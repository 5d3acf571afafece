//! Terminal lifecycle.
//!
//! Raw mode and the alternate screen are undone on normal exit (the runtime's
//! `Drop`) and on panic (the hook installed by `install_panic_hook`).

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode, alternate screen, terminal instance.
///
/// Call `install_panic_hook()` first.
pub fn setup_terminal() -> Result<Term> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Bracketed paste, so a pasted feed URL arrives as one event.
pub fn enable_input_features() -> Result<()> {
    execute!(io::stdout(), EnableBracketedPaste).context("Failed to enable bracketed paste")?;
    Ok(())
}

pub fn disable_input_features() -> Result<()> {
    execute!(io::stdout(), DisableBracketedPaste).context("Failed to disable bracketed paste")?;
    Ok(())
}

/// Idempotent.
pub fn restore_terminal() -> Result<()> {
    // Must happen before leaving raw mode.
    let _ = execute!(io::stdout(), DisableBracketedPaste);
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Run `setup`; if it fails, run `undo` before handing back the error.
pub fn undo_on_error<T>(
    setup: impl FnOnce() -> Result<T>,
    undo: impl FnOnce(),
) -> Result<T> {
    setup().inspect_err(|_| undo())
}

pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    // Setup and restore need a real TTY; only the error path is covered here.
    use super::*;
    use std::cell::Cell;

    #[test]
    fn failed_setup_runs_undo() {
        let undone = Cell::new(false);
        let r: Result<()> = undo_on_error(
            || {
                // Raw mode "succeeded", the alternate screen did not.
                Err(anyhow::anyhow!("Failed to enter alternate screen"))
            },
            || undone.set(true),
        );
        assert!(r.is_err());
        assert!(undone.get());
    }

    #[test]
    fn successful_setup_skips_undo() {
        let undone = Cell::new(false);
        let r = undo_on_error(|| Ok(7), || undone.set(true));
        assert_eq!(r.unwrap(), 7);
        assert!(!undone.get());
    }
}
