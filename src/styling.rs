//! Styling for terminal output.
//!
//! This module uses the anstyle ecosystem:
//! - anstream for auto-detecting color support
//! - anstyle for composable styling
//!
//! Report lines are plain text until they reach the CLI layer; only there are
//! the `[DEL ]` / `[SKIP]` tags colored, and anstream strips the escapes again
//! when stdout is not a terminal.

use anstyle::{AnsiColor, Color, Style};

/// Auto-detecting eprintln that respects NO_COLOR, CLICOLOR_FORCE, and terminal capabilities
pub use anstream::eprintln;

/// Error style (red) - use as `{ERROR}text{ERROR:#}`
pub const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Warning style (yellow)
pub const WARNING: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));

/// Hint style (dimmed)
pub const HINT: Style = Style::new().dimmed();

/// Tag style for branches that were (or would be) deleted
pub const DELETED: Style = Style::new()
    .fg_color(Some(Color::Ansi(AnsiColor::Red)))
    .bold();

/// Tag style for branches that were kept
pub const KEPT: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));

pub const ERROR_EMOJI: &str = "❌";
pub const WARNING_EMOJI: &str = "🟡";
pub const HINT_EMOJI: &str = "💡";
