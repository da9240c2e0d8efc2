//! Policy text acquisition: whole file, or pasted lines ending at a blank line.

use std::io::BufRead;
use std::path::Path;

use policyscan_shared::{PolicyScanError, Result};
use tracing::debug;

/// Prompt shown before interactive paste mode.
pub(crate) const PASTE_PROMPT: &str =
    "Paste the privacy policy text. Enter a blank line to finish:";

/// Read a whole policy file, rejecting files over `max_bytes`.
pub(crate) fn read_policy_file(path: &Path, max_bytes: usize) -> Result<String> {
    let meta = std::fs::metadata(path).map_err(|e| PolicyScanError::io(path, e))?;
    let size = usize::try_from(meta.len()).unwrap_or(usize::MAX);
    if size > max_bytes {
        return Err(PolicyScanError::InputTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let text = std::fs::read_to_string(path).map_err(|e| PolicyScanError::io(path, e))?;
    debug!(?path, bytes = text.len(), "read policy file");
    Ok(text)
}

/// Accumulate lines until a blank line or EOF, joined with `\n`.
pub(crate) fn read_until_blank<R: BufRead>(reader: R, max_bytes: usize) -> Result<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut size = 0usize;

    for line in reader.lines() {
        let line = line.map_err(|e| PolicyScanError::io("<stdin>", e))?;
        if line.trim().is_empty() {
            break;
        }

        size += line.len() + 1;
        if size > max_bytes {
            return Err(PolicyScanError::InputTooLarge {
                size,
                limit: max_bytes,
            });
        }
        lines.push(line);
    }

    debug!(lines = lines.len(), "read pasted policy text");
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn paste_stops_at_blank_line() {
        let input = Cursor::new("We share data.\nWe sell data.\n\nIgnored line.\n");
        let text = read_until_blank(input, 1024).expect("read");
        assert_eq!(text, "We share data.\nWe sell data.");
    }

    #[test]
    fn whitespace_only_line_ends_paste() {
        let input = Cursor::new("First.\r\n   \r\nSecond.\r\n");
        let text = read_until_blank(input, 1024).expect("read");
        assert_eq!(text, "First.");
    }

    #[test]
    fn paste_ends_at_eof_without_blank_line() {
        let input = Cursor::new("Only line without newline");
        let text = read_until_blank(input, 1024).expect("read");
        assert_eq!(text, "Only line without newline");
    }

    #[test]
    fn immediate_blank_line_is_empty_text() {
        let text = read_until_blank(Cursor::new("\nlater"), 1024).expect("read");
        assert!(text.is_empty());
    }

    #[test]
    fn paste_over_limit_rejected() {
        let input = Cursor::new("0123456789\n0123456789\n");
        let err = read_until_blank(input, 15).unwrap_err();
        assert!(matches!(err, PolicyScanError::InputTooLarge { limit: 15, .. }));
    }

    #[test]
    fn reads_policy_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("policy.txt");
        std::fs::write(&path, "We keep your data.\n").expect("write");

        let text = read_policy_file(&path, 1024).expect("read");
        assert_eq!(text, "We keep your data.\n");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_policy_file(&dir.path().join("nope.txt"), 1024).unwrap_err();
        assert!(matches!(err, PolicyScanError::Io { .. }));
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn oversized_file_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "x".repeat(64)).expect("write");

        let err = read_policy_file(&path, 32).unwrap_err();
        assert!(matches!(
            err,
            PolicyScanError::InputTooLarge {
                size: 64,
                limit: 32
            }
        ));
    }
}
