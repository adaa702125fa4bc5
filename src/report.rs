//! User-facing console report: a header per phase and one line per check
//! or generated asset.

use std::io::{self, Write};

pub struct Reporter<W = io::Stdout> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Reporter { out: io::stdout() }
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Reporter { out }
    }

    pub fn header(&mut self, title: &str) {
        self.line(format_args!("\n {}\n", title));
    }

    pub fn success(&mut self, message: &str) {
        self.line(format_args!("  ✓  {}", message));
    }

    pub fn warn(&mut self, message: &str) {
        self.line(format_args!("  ⚠  {}", message));
    }

    pub fn error(&mut self, message: &str) {
        self.line(format_args!("  ✗  {}", message));
    }

    pub fn blank(&mut self) {
        self.line(format_args!(""));
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Console output is best-effort; a closed stdout must not fail the run.
    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{}", args);
        let _ = self.out.flush();
    }
}
