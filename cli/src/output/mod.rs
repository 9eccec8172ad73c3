//! Terminal output for dodocker.
//!
//! Human mode prints glyph-prefixed status lines, droplet and deployment
//! listings and a spinner while a droplet boots or docker installs. With
//! `--json` every command prints one document through [`json`] and the
//! context is quiet.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use human::HumanRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Where and how status lines are written.
pub struct OutputContext {
    pub styles: Styles,
    /// Drop everything except failures.
    pub quiet: bool,
    tty: bool,
}

impl OutputContext {
    /// `no_color` already reflects `NO_COLOR`; colors also need a TTY.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if tty && !no_color {
            styles.colorize();
        }
        Self { styles, quiet, tty }
    }

    /// A spinner only makes sense on a terminal that is not muted.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.tty && !self.quiet
    }

    fn line(&self, glyph: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", glyph.style(style));
        }
    }

    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.success, msg);
    }

    /// Failed install steps and other non-fatal problems.
    pub fn warn(&self, msg: &str) {
        self.line("⚠", self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line("ℹ", self.styles.info, msg);
    }

    /// Goes to stderr, quiet or not.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("  {}", title.style(self.styles.header));
        }
    }

    /// `Droplet:  dodocker-3f2a` with the label dimmed.
    pub fn kv(&self, label: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", label.style(self.styles.dim));
        }
    }
}
