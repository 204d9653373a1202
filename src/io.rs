//! Reading the source document and writing the converted one.

use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum Error {
    #[error("No input provided. Use a file argument or pipe input.")]
    NoInput,
    #[error("File '{}' not found: {source}", .path.display())]
    NotFound { path: PathBuf, source: io::Error },
    #[error("Cannot open '{}': {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Error reading input: {0}")]
    Read(#[source] io::Error),
    #[error("Error creating output file '{}': {source}", .path.display())]
    CreateOutput { path: PathBuf, source: io::Error },
    #[error("Error writing output: {0}")]
    Write(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Read the whole document from `path`, or from stdin when `path` is `None`.
///
/// Stdin must be piped or redirected; an interactive terminal yields
/// [`Error::NoInput`]. Line endings are normalized with [`join_lines`].
pub fn read_input(path: Option<&Path>) -> Result<String> {
    let raw = match path {
        Some(path) => {
            let mut file = File::open(path).map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => Error::NotFound {
                    path: path.to_path_buf(),
                    source,
                },
                _ => Error::Open {
                    path: path.to_path_buf(),
                    source,
                },
            })?;
            debug!(path = %path.display(), "reading input file");
            read_all(&mut file)?
        }
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                return Err(Error::NoInput);
            }
            debug!("reading stdin");
            read_all(&mut stdin.lock())?
        }
    };

    Ok(join_lines(&raw))
}

fn read_all(reader: &mut impl Read) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).map_err(Error::Read)?;
    Ok(buf)
}

/// Split on `\n` or `\r\n` and re-join with `\n`. The final line terminator
/// is dropped.
pub fn join_lines(raw: &str) -> String {
    raw.lines().collect::<Vec<_>>().join("\n")
}

/// Write `text` to `path`, or to stdout when `path` is `None`.
pub fn write_output(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = File::create(path).map_err(|source| Error::CreateOutput {
                path: path.to_path_buf(),
                source,
            })?;
            file.write_all(text.as_bytes()).map_err(Error::Write)?;
            info!(path = %path.display(), bytes = text.len(), "wrote output file");
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(Error::Write)
        }
    }
}
