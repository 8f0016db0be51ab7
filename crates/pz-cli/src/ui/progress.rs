//! Spinner for operations that wait on the network.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// A spinner shown while a request is in flight.
///
/// Hidden in quiet mode and when stderr is not a terminal, so piped
/// output stays clean. Prompts must run inside [`Spinner::suspend`] so
/// the redraw does not clobber them.
pub struct Spinner {
    bar: ProgressBar,
    quiet: bool,
}

impl Spinner {
    pub fn start(message: &str, quiet: bool) -> Self {
        let bar = if quiet || !std::io::stderr().is_terminal() {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .expect("static template is valid")
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]),
            );
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        };
        bar.set_message(message.to_string());
        Self { bar, quiet }
    }

    pub fn update(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Run `f` with the spinner cleared from the terminal.
    pub fn suspend<T>(&self, f: impl FnOnce() -> T) -> T {
        self.bar.suspend(f)
    }

    /// Stop with a success mark.
    pub fn succeed(self, message: &str) {
        self.bar.finish_and_clear();
        if !self.quiet {
            eprintln!("{} {}", "✓".green(), message);
        }
    }

    /// Stop with a failure mark.
    pub fn fail(self, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Stop without printing anything.
    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}
