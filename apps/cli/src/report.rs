//! Rendering of a [`RunResult`] as a text report or JSON.

use std::io::{self, Write};

use policyscan_shared::{Category, RunResult};

const NO_CONCERNS: &str =
    "No potentially sensitive practices were detected based on the current heuristics.";

fn labels(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write the human-readable report.
pub(crate) fn write_text<W: Write>(out: &mut W, result: &RunResult) -> io::Result<()> {
    if result.is_clean() {
        writeln!(out, "{NO_CONCERNS}")?;
    } else {
        writeln!(out, "Potential data privacy concerns detected:")?;
        writeln!(out)?;

        for (i, finding) in result.findings.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, finding.sentence.text)?;
            writeln!(out, "   Categories: {}", labels(&finding.categories))?;
            writeln!(out)?;
        }

        writeln!(
            out,
            "Categories found ({}): {}",
            result.categories.len(),
            labels(&result.categories)
        )?;

        if !result.recommendations.is_empty() {
            writeln!(out)?;
            writeln!(out, "Recommended actions to protect your data:")?;
            writeln!(out)?;
            for rec in &result.recommendations {
                writeln!(out, "- {rec}")?;
            }
        }
    }

    if result.truncated {
        writeln!(out)?;
        writeln!(
            out,
            "Note: only the first {} sentences were analysed.",
            result.sentence_count
        )?;
    }

    Ok(())
}

/// Write the result as pretty-printed JSON.
pub(crate) fn write_json<W: Write>(out: &mut W, result: &RunResult) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)
}
