pub mod manual;
pub mod normalize;
pub mod sniff;

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::LoadError;
use crate::types::{Detection, Table};
use manual::ManualFailure;

const EXTENSION: &str = "csv";

/// A loaded table and how it was recovered.
#[derive(Debug)]
pub struct Loaded {
    pub table: Table,
    pub detection: Detection,
}

/// Read a CSV file of unknown encoding and delimiter into a normalized table.
///
/// Tries every encoding × delimiter combination in preference order and
/// takes the first one that yields a sane table; falls back to a plain
/// line-splitting parser when none does.
pub fn load(path: &Path) -> Result<Loaded, LoadError> {
    match fs::metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    }

    if !has_csv_extension(path) {
        return Err(LoadError::WrongType {
            path: path.to_path_buf(),
        });
    }

    let buf = fs::read(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), bytes = buf.len(), "read input");

    if let Some((table, detection)) = sniff::structured(&buf) {
        return Ok(Loaded { table, detection });
    }

    info!("no encoding/delimiter combination accepted, trying manual parse");
    match manual::parse(&buf) {
        Ok((table, delimiter)) => Ok(Loaded {
            table,
            detection: Detection::Manual { delimiter },
        }),
        Err(ManualFailure::HeaderOnly) => Err(LoadError::EmptyTable {
            path: path.to_path_buf(),
        }),
        Err(ManualFailure::NoHeader | ManualFailure::NoConsistentRows) => {
            Err(LoadError::Unparseable {
                path: path.to_path_buf(),
            })
        }
    }
}

/// Case-insensitive `.csv` check.
pub fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(EXTENSION))
}
