use crate::error::{Error, Result};
use std::{fs, path::Path};

/// Read a log file as UTF-8, replacing malformed byte sequences instead of failing.
pub fn read_log_lossy(path: &Path) -> Result<String> {
	let bytes = fs::read(path).map_err(|e| Error::file_access(path, e))?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}
