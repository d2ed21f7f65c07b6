//! Printing a snapshot of the rendered preview through an isolated print
//! surface.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::thread;
use std::time::Duration;

use chrono::Utc;

use crate::error::{BillError, Result};

/// Wait used when a print context cannot report that its content is laid out.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(250);

const PRINT_STYLES: &str = "\
body { margin: 0; padding: 16px; font-family: Helvetica, Arial, sans-serif; color: #212121; }
* { box-sizing: border-box; }
@media print {
  body { margin: 0; padding: 0; }
  .no-print { display: none; }
}";

/// Wrap preview markup in a standalone HTML page with print styles.
pub fn printable_document(markup: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Invoice</title>\n<style>\n{}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        PRINT_STYLES, markup
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Content is fully laid out
    Ready,
    /// The surface cannot tell
    Unknown,
}

/// Somewhere an isolated copy of the invoice can be opened for printing.
pub trait PrintSurface {
    fn open(&self, html: &str) -> Result<Box<dyn PrintContext>>;
}

pub trait PrintContext {
    fn readiness(&mut self) -> Readiness;
    fn print(&mut self) -> Result<()>;
    fn close(self: Box<Self>) -> Result<()>;
}

/// Print the current preview markup.
///
/// `None` or blank markup aborts before any context is opened. Once opened,
/// the context is always closed, and a print failure takes precedence over a
/// close failure.
pub fn print_markup(
    markup: Option<&str>,
    surface: &dyn PrintSurface,
    settle_delay: Duration,
) -> Result<()> {
    let markup = match markup {
        Some(m) if !m.trim().is_empty() => m,
        _ => {
            tracing::warn!("print requested without rendered invoice content");
            return Err(BillError::NothingToPrint);
        }
    };

    let mut context = surface.open(&printable_document(markup))?;

    if context.readiness() == Readiness::Unknown {
        tracing::debug!(delay_ms = settle_delay.as_millis() as u64, "waiting for print surface");
        thread::sleep(settle_delay);
    }

    let printed = context.print();
    let closed = context.close();
    printed?;
    closed
}

/// Writes printable pages into a spool directory and hands each one to an
/// external print command. With no command configured the page is left in
/// the spool directory for the user to print.
#[derive(Debug, Clone)]
pub struct SpoolSurface {
    dir: PathBuf,
    command: Vec<String>,
}

impl SpoolSurface {
    pub fn new(dir: impl Into<PathBuf>, command: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            command,
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    pub fn has_command(&self) -> bool {
        !self.command.is_empty()
    }
}

impl PrintSurface for SpoolSurface {
    fn open(&self, html: &str) -> Result<Box<dyn PrintContext>> {
        fs::create_dir_all(&self.dir)?;
        let path = self
            .dir
            .join(format!("invoice-{}.html", Utc::now().format("%Y%m%d%H%M%S%3f")));
        fs::write(&path, html)?;
        tracing::debug!(path = %path.display(), "spooled printable page");

        Ok(Box::new(SpoolContext {
            path,
            command: self.command.clone(),
        }))
    }
}

struct SpoolContext {
    path: PathBuf,
    command: Vec<String>,
}

impl PrintContext for SpoolContext {
    // The page is written before the context exists.
    fn readiness(&mut self) -> Readiness {
        Readiness::Ready
    }

    fn print(&mut self) -> Result<()> {
        let Some((program, args)) = self.command.split_first() else {
            tracing::info!(path = %self.path.display(), "no print command configured");
            return Ok(());
        };

        let status = Command::new(program)
            .args(args)
            .arg(&self.path)
            .status()
            .map_err(|e| BillError::Print(format!("failed to run '{}': {}", program, e)))?;

        if !status.success() {
            return Err(BillError::Print(format!("'{}' exited with {}", program, status)));
        }
        tracing::info!(command = %program, "sent invoice to printer");
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        if !self.command.is_empty() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
