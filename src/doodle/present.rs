//! Text rendering of a classification result.

use std::fmt::Write;

use super::classifier::ClassificationResult;

/// Formats `result` for display:
///
/// ```text
/// Predict: hand (60.00%)
/// Inference Time:   0.412000(ms)
/// Details:
/// -       apple:  5.0000%
/// ...
/// ```
pub fn present(result: &ClassificationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Predict: {} ({:.2}%)",
        result.top_label(),
        100.0 * result.top_probability()
    );
    let _ = writeln!(
        out,
        "Inference Time: {:10.6}(ms)",
        result.elapsed().as_secs_f64() * 1000.0
    );
    out.push_str("Details:\n");
    for (label, probability) in result.entries() {
        let _ = writeln!(out, "- {:>11}: {:7.4}%", label, 100.0 * probability);
    }
    out
}
