//! Console abstraction used by the framework and by commands.
//!
//! A [`Console`] exposes two writable streams (output and error) plus a
//! foreground/background color state. [`SystemConsole`] writes to the real
//! terminal and styles text with the `console` crate; [`VirtualConsole`]
//! captures everything in memory, which is what the tests use.
//!
//! Color changes should go through the scoped guards ([`ForegroundGuard`],
//! [`BackgroundGuard`]) or the `with_*` helpers, which restore the previous
//! colors when they go out of scope, including on early returns and panics.

use std::io::{self, IsTerminal, Write};
use std::ops::{Deref, DerefMut};

use console::{Color, Style, Term};

/// The sixteen classic console colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    DarkMagenta,
    DarkYellow,
    Gray,
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}

impl ConsoleColor {
    /// Terminal color plus whether the bright variant is meant.
    fn ansi(self) -> (Color, bool) {
        match self {
            ConsoleColor::Black => (Color::Black, false),
            ConsoleColor::DarkBlue => (Color::Blue, false),
            ConsoleColor::DarkGreen => (Color::Green, false),
            ConsoleColor::DarkCyan => (Color::Cyan, false),
            ConsoleColor::DarkRed => (Color::Red, false),
            ConsoleColor::DarkMagenta => (Color::Magenta, false),
            ConsoleColor::DarkYellow => (Color::Yellow, false),
            ConsoleColor::Gray => (Color::White, false),
            ConsoleColor::DarkGray => (Color::Black, true),
            ConsoleColor::Blue => (Color::Blue, true),
            ConsoleColor::Green => (Color::Green, true),
            ConsoleColor::Cyan => (Color::Cyan, true),
            ConsoleColor::Red => (Color::Red, true),
            ConsoleColor::Magenta => (Color::Magenta, true),
            ConsoleColor::Yellow => (Color::Yellow, true),
            ConsoleColor::White => (Color::White, true),
        }
    }
}

/// Output/error streams and color state.
///
/// `None` colors mean "terminal default".
pub trait Console: Send {
    fn output(&mut self) -> &mut dyn Write;

    fn error(&mut self) -> &mut dyn Write;

    fn foreground(&self) -> Option<ConsoleColor>;

    fn set_foreground(&mut self, color: Option<ConsoleColor>);

    fn background(&self) -> Option<ConsoleColor>;

    fn set_background(&mut self, color: Option<ConsoleColor>);

    fn reset_color(&mut self) {
        self.set_foreground(None);
        self.set_background(None);
    }
}

// ============================================================================
// SYSTEM CONSOLE
// ============================================================================

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color(stream: supports_color::Stream) -> bool {
    std::env::var("NO_COLOR").is_err() && supports_color::on(stream).is_some()
}

/// A terminal stream that styles everything written while a color is set.
struct StyledStream {
    term: Term,
    foreground: Option<ConsoleColor>,
    background: Option<ConsoleColor>,
    styling: bool,
}

impl StyledStream {
    fn new(term: Term, styling: bool) -> Self {
        Self {
            term,
            foreground: None,
            background: None,
            styling,
        }
    }

    fn style(&self) -> Option<Style> {
        if !self.styling || (self.foreground.is_none() && self.background.is_none()) {
            return None;
        }

        let mut style = Style::new().force_styling(true);
        if let Some((color, bright)) = self.foreground.map(ConsoleColor::ansi) {
            style = style.fg(color);
            if bright {
                style = style.bright();
            }
        }
        if let Some((color, bright)) = self.background.map(ConsoleColor::ansi) {
            style = style.bg(color);
            if bright {
                style = style.on_bright();
            }
        }
        Some(style)
    }
}

impl Write for StyledStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.style() {
            None => self.term.write(buf),
            Some(style) => {
                let text = String::from_utf8_lossy(buf);
                // Style each line separately so colors never bleed past a newline.
                let styled: Vec<String> = text
                    .split('\n')
                    .map(|line| {
                        if line.is_empty() {
                            String::new()
                        } else {
                            style.apply_to(line).to_string()
                        }
                    })
                    .collect();
                self.term.write_all(styled.join("\n").as_bytes())?;
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.term.flush()
    }
}

/// Console bound to the process's stdout and stderr.
pub struct SystemConsole {
    out: StyledStream,
    err: StyledStream,
}

impl SystemConsole {
    /// Creates a console that colors output only when the terminal supports it.
    pub fn new() -> Self {
        let out_styling =
            io::stdout().is_terminal() && should_use_color(supports_color::Stream::Stdout);
        let err_styling =
            io::stderr().is_terminal() && should_use_color(supports_color::Stream::Stderr);
        Self {
            out: StyledStream::new(Term::stdout(), out_styling),
            err: StyledStream::new(Term::stderr(), err_styling),
        }
    }

    /// Creates a console that never emits escape sequences.
    pub fn plain() -> Self {
        Self {
            out: StyledStream::new(Term::stdout(), false),
            err: StyledStream::new(Term::stderr(), false),
        }
    }
}

impl Default for SystemConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for SystemConsole {
    fn output(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    fn error(&mut self) -> &mut dyn Write {
        &mut self.err
    }

    fn foreground(&self) -> Option<ConsoleColor> {
        self.out.foreground
    }

    fn set_foreground(&mut self, color: Option<ConsoleColor>) {
        self.out.foreground = color;
        self.err.foreground = color;
    }

    fn background(&self) -> Option<ConsoleColor> {
        self.out.background
    }

    fn set_background(&mut self, color: Option<ConsoleColor>) {
        self.out.background = color;
        self.err.background = color;
    }
}

// ============================================================================
// VIRTUAL CONSOLE
// ============================================================================

/// In-memory console; colors are tracked but never rendered.
#[derive(Debug, Default)]
pub struct VirtualConsole {
    output: Vec<u8>,
    error: Vec<u8>,
    foreground: Option<ConsoleColor>,
    background: Option<ConsoleColor>,
}

impl VirtualConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written to the output stream so far.
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Everything written to the error stream so far.
    pub fn error_text(&self) -> String {
        String::from_utf8_lossy(&self.error).into_owned()
    }
}

impl Console for VirtualConsole {
    fn output(&mut self) -> &mut dyn Write {
        &mut self.output
    }

    fn error(&mut self) -> &mut dyn Write {
        &mut self.error
    }

    fn foreground(&self) -> Option<ConsoleColor> {
        self.foreground
    }

    fn set_foreground(&mut self, color: Option<ConsoleColor>) {
        self.foreground = color;
    }

    fn background(&self) -> Option<ConsoleColor> {
        self.background
    }

    fn set_background(&mut self, color: Option<ConsoleColor>) {
        self.background = color;
    }
}

// ============================================================================
// SCOPED COLOR GUARDS
// ============================================================================

/// Sets the foreground color until dropped, then restores the previous one.
pub struct ForegroundGuard<'a, C: Console + ?Sized> {
    console: &'a mut C,
    previous: Option<ConsoleColor>,
}

impl<'a, C: Console + ?Sized> ForegroundGuard<'a, C> {
    pub fn new(console: &'a mut C, color: ConsoleColor) -> Self {
        let previous = console.foreground();
        console.set_foreground(Some(color));
        Self { console, previous }
    }
}

impl<C: Console + ?Sized> Deref for ForegroundGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.console
    }
}

impl<C: Console + ?Sized> DerefMut for ForegroundGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.console
    }
}

impl<C: Console + ?Sized> Drop for ForegroundGuard<'_, C> {
    fn drop(&mut self) {
        self.console.set_foreground(self.previous);
    }
}

/// Sets the background color until dropped, then restores the previous one.
pub struct BackgroundGuard<'a, C: Console + ?Sized> {
    console: &'a mut C,
    previous: Option<ConsoleColor>,
}

impl<'a, C: Console + ?Sized> BackgroundGuard<'a, C> {
    pub fn new(console: &'a mut C, color: ConsoleColor) -> Self {
        let previous = console.background();
        console.set_background(Some(color));
        Self { console, previous }
    }
}

impl<C: Console + ?Sized> Deref for BackgroundGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.console
    }
}

impl<C: Console + ?Sized> DerefMut for BackgroundGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.console
    }
}

impl<C: Console + ?Sized> Drop for BackgroundGuard<'_, C> {
    fn drop(&mut self) {
        self.console.set_background(self.previous);
    }
}

/// Runs `action` with the given foreground color.
pub fn with_foreground<C, R>(
    console: &mut C,
    color: ConsoleColor,
    action: impl FnOnce(&mut C) -> R,
) -> R
where
    C: Console + ?Sized,
{
    let mut guard = ForegroundGuard::new(console, color);
    action(&mut guard)
}

/// Runs `action` with the given background color.
pub fn with_background<C, R>(
    console: &mut C,
    color: ConsoleColor,
    action: impl FnOnce(&mut C) -> R,
) -> R
where
    C: Console + ?Sized,
{
    let mut guard = BackgroundGuard::new(console, color);
    action(&mut guard)
}

/// Runs `action` with both colors set.
pub fn with_colors<C, R>(
    console: &mut C,
    foreground: ConsoleColor,
    background: ConsoleColor,
    action: impl FnOnce(&mut C) -> R,
) -> R
where
    C: Console + ?Sized,
{
    let mut outer = ForegroundGuard::new(console, foreground);
    let mut inner = BackgroundGuard::new(&mut *outer, background);
    action(&mut inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_console_captures_both_streams() {
        let mut console = VirtualConsole::new();
        writeln!(console.output(), "out").unwrap();
        writeln!(console.error(), "err").unwrap();
        assert_eq!(console.output_text(), "out\n");
        assert_eq!(console.error_text(), "err\n");
    }

    #[test]
    fn guard_restores_previous_color() {
        let mut console = VirtualConsole::new();
        console.set_foreground(Some(ConsoleColor::Gray));
        with_foreground(&mut console, ConsoleColor::Red, |c| {
            assert_eq!(c.foreground(), Some(ConsoleColor::Red));
        });
        assert_eq!(console.foreground(), Some(ConsoleColor::Gray));
    }

    #[test]
    fn guard_restores_on_error_path() {
        let mut console = VirtualConsole::new();
        let result: Result<(), &str> = with_colors(
            &mut console,
            ConsoleColor::Black,
            ConsoleColor::DarkGray,
            |c| {
                assert_eq!(c.background(), Some(ConsoleColor::DarkGray));
                Err("boom")
            },
        );
        assert!(result.is_err());
        assert_eq!(console.foreground(), None);
        assert_eq!(console.background(), None);
    }

    #[test]
    fn guard_restores_on_panic() {
        let mut console = VirtualConsole::new();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _: () = with_background(&mut console, ConsoleColor::Blue, |_| {
                panic!("inner action failed")
            });
        }));
        assert!(outcome.is_err());
        assert_eq!(console.background(), None);
    }

    #[test]
    fn works_through_trait_objects() {
        let mut console = VirtualConsole::new();
        let dynamic: &mut dyn Console = &mut console;
        with_foreground(dynamic, ConsoleColor::Cyan, |c| {
            write!(c.output(), "x").unwrap();
        });
        assert_eq!(console.output_text(), "x");
        assert_eq!(console.foreground(), None);
    }

    #[test]
    fn bright_colors_map_to_bright_ansi() {
        assert_eq!(ConsoleColor::Yellow.ansi(), (Color::Yellow, true));
        assert_eq!(ConsoleColor::DarkYellow.ansi(), (Color::Yellow, false));
    }
}
