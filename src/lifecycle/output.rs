//! The event log file.

use crate::office::ResourceError;
use std::fs::File;
use std::path::Path;

/// Default log file name.
pub const DEFAULT_OUTPUT: &str = "proj2.out";

/// Creates the log file, truncating any previous run's output.
///
/// The returned [`File`] is unbuffered; the office flushes after each line.
pub fn create_output(path: impl AsRef<Path>) -> Result<File, ResourceError> {
    let path = path.as_ref();
    File::create(path).map_err(|source| ResourceError::OutputFile {
        path: path.to_path_buf(),
        source,
    })
}
