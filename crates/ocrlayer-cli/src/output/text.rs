use ocrlayer_core::reconcile::ReconcileReport;

pub fn print(layer: &str) {
    if !layer.is_empty() {
        println!("{layer}");
    }
}

/// Summarize reconciliation adjustments on stderr, keeping stdout clean for
/// the text layer itself.
pub fn print_report(report: &ReconcileReport) {
    if report.is_clean() {
        return;
    }
    eprintln!(
        "  adjusted: {} relabeled, {} merged, {} split, {} ambiguous, {} inserted, {} deleted",
        report.relabeled,
        report.merged,
        report.split,
        report.ambiguous,
        report.inserted,
        report.deleted
    );
    if report.dropped_chars > 0 || report.dropped_boxes > 0 {
        eprintln!(
            "  dropped: {} transcript character(s), {} box(es)",
            report.dropped_chars, report.dropped_boxes
        );
    }
}
