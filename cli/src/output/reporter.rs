//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! On a TTY a single spinner line is rewritten by every `step()`; completed
//! sub-tasks and warnings are printed above it. Without a TTY each step is
//! printed on its own line. Nothing is printed when `ctx.quiet`.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    bar: Option<ProgressBar>,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        let bar = ctx.show_progress().then(|| progress::spinner("Starting"));
        Self { ctx, bar }
    }

    /// Replace the spinner with a `✓` line.
    pub fn finish_ok(&self, message: &str) {
        match &self.bar {
            Some(pb) => progress::finish_ok(pb, message),
            None => self.ctx.success(message),
        }
    }

    /// Replace the spinner with a `✗` line. Printed even when quiet.
    pub fn finish_fail(&self, message: &str) {
        match &self.bar {
            Some(pb) => progress::finish_fail(pb, message),
            None => self.ctx.error(message),
        }
    }

    fn above(&self, line: String) {
        match &self.bar {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = &self.bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        match &self.bar {
            Some(pb) => pb.set_message(message.to_string()),
            None => println!("  {} {message}", "→".style(self.ctx.styles.info)),
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            self.above(format!("  {} {message}", "✓".style(self.ctx.styles.success)));
        }
    }

    fn warn(&self, message: &str) {
        if !self.ctx.quiet {
            self.above(format!("  {} {message}", "⚠".style(self.ctx.styles.warning)));
        }
    }
}
