//! Output helpers for CLI commands.
//!
//! Documents go to stdout or a file; warnings and summaries go to stderr so
//! piped stdout stays a valid document.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use runcompose_common::constants::APP_NAME;
use runcompose_common::error::ConvertError;
use runcompose_translate::Translation;

const RULE_WIDTH: usize = 60;

/// Writes a document to stdout unchanged.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print(document: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(document.as_bytes())?;
    stdout.flush()
}

/// Writes a document to stdout between banner rules.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print_framed(document: &str) -> io::Result<()> {
    print(&framed(document))
}

/// Prints a warning line to stderr.
///
/// # Errors
///
/// Returns an error if stderr cannot be written.
pub fn warn(message: &str) -> io::Result<()> {
    writeln!(io::stderr(), "warning: {message}")
}

/// Writes a document to `path`.
///
/// # Errors
///
/// Returns [`ConvertError::Io`] if the file cannot be written.
pub fn write_file(path: &Path, document: &str) -> Result<(), ConvertError> {
    std::fs::write(path, document).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reports what was written to `path` on stderr.
///
/// # Errors
///
/// Returns an error if stderr cannot be written.
pub fn summary(path: &Path, translation: &Translation) -> io::Result<()> {
    let document = &translation.document;
    let mut stderr = io::stderr();
    writeln!(stderr, "Wrote {}", path.display())?;
    writeln!(stderr, "Services: {}", document.services.len())?;
    if !document.networks.is_empty() {
        writeln!(stderr, "Networks: {}", document.networks.len())?;
    }
    if !document.volumes.is_empty() {
        writeln!(stderr, "Volumes: {}", document.volumes.len())?;
    }
    if !translation.rejected.is_empty() {
        writeln!(stderr, "Skipped: {}", translation.rejected.len())?;
    }
    Ok(())
}

fn framed(document: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{APP_NAME}: generated docker compose document");
    let _ = writeln!(out, "{rule}");
    out.push_str(document);
    if !document.ends_with('\n') {
        out.push('\n');
    }
    let _ = writeln!(out, "{rule}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framed_wraps_document_in_rules() {
        let out = framed("version: '3.9'\n");
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "=".repeat(RULE_WIDTH));
        assert!(lines[1].starts_with("runcompose"));
        assert_eq!(lines[3], "version: '3.9'");
        assert_eq!(lines[4], lines[0]);
    }

    #[test]
    fn framed_terminates_unterminated_documents() {
        let out = framed("{}");
        assert!(out.contains(&format!("{{}}\n{}", "=".repeat(RULE_WIDTH))));
    }

    #[test]
    fn write_file_reports_path_on_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("out.yml");
        let err = write_file(&path, "x").expect_err("should fail");
        assert!(matches!(err, ConvertError::Io { .. }));
        assert!(err.to_string().contains("out.yml"));
    }
}
