//! .env file operations.
//!
//! Reads env files into secret sets and merges secret sets back into them
//! without touching comments, blank lines, ordering, or keys it does not own.
//!
//! Merge rules:
//!
//! - a line whose key is in the incoming set is rewritten as `KEY="value"`
//!   when it is a bare key or its unquoted value differs; otherwise it is
//!   kept byte for byte
//! - every other line is kept byte for byte
//! - keys not present in the file are appended at the end
//! - the result replaces the file atomically through a temp file in the
//!   same directory

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::constants;
use crate::core::domain::{format_assignment, EnvLine, MergeSummary, SecretSet};
use crate::error::{Result, StoreError};

/// Parse an env file into lines.
///
/// A missing file is treated as empty.
///
/// # Errors
///
/// Returns `StoreError::Read` if the file exists but cannot be read.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<EnvLine>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(parse(&contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "env file missing, treating as empty");
            Ok(Vec::new())
        }
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }
        .into()),
    }
}

/// Parse env file contents into lines.
pub fn parse(contents: &str) -> Vec<EnvLine> {
    contents.lines().map(EnvLine::parse).collect()
}

/// Read every assignment with a value into a secret set.
///
/// Quotes are stripped and double-quote escapes resolved. Bare keys are
/// skipped. A missing file yields an empty set.
///
/// # Errors
///
/// Returns `StoreError::Read` if the file exists but cannot be read.
pub fn read_secrets(path: impl AsRef<Path>) -> Result<SecretSet> {
    let mut set = SecretSet::new();
    for line in load(path)? {
        if let EnvLine::Assignment(a) = line {
            if let Some(value) = a.value() {
                set.insert_pair(a.key(), value);
            }
        }
    }
    Ok(set)
}

/// Merge `desired` into parsed lines and render the new file contents.
///
/// Every emitted line ends with `\n`. Appended keys are sorted.
pub fn render(lines: &[EnvLine], desired: &SecretSet) -> (String, MergeSummary) {
    let mut remaining: HashMap<&str, &str> = desired.iter().collect();
    let mut summary = MergeSummary::default();
    let mut output = String::new();

    for line in lines {
        let rendered = match line {
            EnvLine::Assignment(a) => match remaining.remove(a.key()) {
                Some(value) if a.needs_rewrite(value) => {
                    summary.updated += 1;
                    format_assignment(a.key(), value)
                }
                Some(_) => {
                    summary.unchanged += 1;
                    line.text().to_string()
                }
                None => line.text().to_string(),
            },
            EnvLine::Passthrough(text) => text.clone(),
        };
        output.push_str(&rendered);
        output.push('\n');
    }

    let mut appended: Vec<(&str, &str)> = remaining.into_iter().collect();
    appended.sort_unstable_by(|a, b| a.0.cmp(b.0));
    for (key, value) in appended {
        output.push_str(&format_assignment(key, value));
        output.push('\n');
        summary.appended += 1;
    }

    (output, summary)
}

/// Merge a secret set into the env file at `path`.
///
/// Creates the file (mode 0600) if it does not exist. The parent directory
/// must exist.
///
/// # Errors
///
/// Returns `StoreError::Read` if the file cannot be opened or read, and
/// `StoreError::Write` if the replacement cannot be written. The original
/// file is left untouched on error.
pub fn merge(path: impl AsRef<Path>, desired: &SecretSet) -> Result<MergeSummary> {
    let path = path.as_ref();
    debug!(path = %path.display(), secrets = desired.len(), "merging secrets into env file");

    let read_err = |source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    };
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = open_or_create(path).map_err(read_err)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(read_err)?;
    drop(file);

    let (output, summary) = render(&parse(&contents), desired);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    set_private(tmp.as_file()).map_err(write_err)?;
    tmp.write_all(output.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!(
        updated = summary.updated,
        unchanged = summary.unchanged,
        appended = summary.appended,
        "env file merged"
    );

    Ok(summary)
}

fn open_or_create(path: &Path) -> std::io::Result<std::fs::File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(constants::ENV_FILE_MODE);
    }

    options.open(path)
}

#[cfg(unix)]
fn set_private(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(constants::ENV_FILE_MODE))
}

#[cfg(not(unix))]
fn set_private(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}
