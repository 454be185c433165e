//! File write helpers used by the `w`, `wa`, `wq` commands.
//!
//! Writes are synchronous; the loop finishes a save before it receives the
//! next event.

use core_model::Session;
use core_text::{Document, DocumentError};
use std::path::Path;
use tracing::{error, info, warn};

/// Save `doc` to `target` or its own path.
///
/// A read-only document may still be written to an explicit new path, but
/// never back onto the file it was opened from.
pub(crate) fn write_document(
    doc: &mut Document,
    target: Option<&Path>,
) -> Result<usize, DocumentError> {
    if doc.is_read_only() && target.is_none_or(|t| Some(t) == doc.path()) {
        return Err(DocumentError::ReadOnly);
    }
    match doc.save(target) {
        Ok(bytes) => {
            info!(target: "io", file = %doc.display_name(), bytes, "document_saved");
            Ok(bytes)
        }
        Err(e) => {
            error!(target: "io", error = %e, "document_save_failed");
            Err(e)
        }
    }
}

/// Outcome of saving every modified document.
#[derive(Debug, Default)]
pub(crate) struct WriteAllReport {
    pub saved: usize,
    /// Short name of each slot that failed, with its error, in slot order.
    pub failures: Vec<(String, DocumentError)>,
}

impl WriteAllReport {
    /// `a.txt: <error>; b.txt: <error>`
    pub fn failure_details(&self) -> String {
        self.failures
            .iter()
            .map(|(name, e)| format!("{name}: {e}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Save every modified slot; a failure does not stop the remaining saves.
pub(crate) fn write_all(session: &mut Session) -> WriteAllReport {
    let mut report = WriteAllReport::default();
    for slot in session.slots_mut() {
        if !slot.document.is_dirty() {
            continue;
        }
        match write_document(&mut slot.document, None) {
            Ok(_) => report.saved += 1,
            Err(e) => report.failures.push((slot.document.short_name(), e)),
        }
    }
    if !report.failures.is_empty() {
        warn!(
            target: "io",
            saved = report.saved,
            failed = report.failures.len(),
            "write_all_incomplete"
        );
    }
    report
}
