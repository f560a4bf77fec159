use std::fs::{File, OpenOptions};
use std::path::Path;

/// Opens `path` for appending, creating it if missing.
///
/// Also reports whether the file already held data, in which case a header
/// must not be written again.
pub(crate) fn open_for_append(path: impl AsRef<Path>) -> std::io::Result<(File, bool)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let has_content = file.metadata()?.len() > 0;
    Ok((file, has_content))
}
