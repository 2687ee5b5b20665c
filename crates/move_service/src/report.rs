//! Startup diagnostics written to the protocol channel

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use ttt_move_trainer::ValidationReport;

/// `CSV PATH: <path>`, printed before training starts
pub fn write_dataset_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "CSV PATH: {}", path.display())?;
    out.flush()
}

/// Confusion matrix and accuracy of the cross-validation run
pub fn write_diagnostics<W: Write>(out: &mut W, report: &ValidationReport) -> io::Result<()> {
    writeln!(out, "Confusion matrix:")?;
    writeln!(out, "{}", report.confusion)?;
    writeln!(out, "Accuracy: {}", format_accuracy(report.accuracy))?;
    out.flush()
}

/// Fatal startup error; no readiness line follows it
pub fn write_fatal<W: Write>(out: &mut W, err: &dyn Display) -> io::Result<()> {
    writeln!(out, "ERROR: {err}")?;
    out.flush()
}

/// Shortest round-trip float, always with a fractional part (`1.0`, `0.75`)
pub fn format_accuracy(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
