//! Atomic file replacement

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Hidden sibling of `path` used as the staging file
pub fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wiggle".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}

/// Write `data` to `path` so readers see either the old or the new content
///
/// The bytes go to [`temp_path`], are flushed and synced, and the temp file
/// is renamed over `path`. On failure the temp file is removed and `path`
/// is left as it was.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let temp = temp_path(path);

    let written = File::create(&temp).and_then(|file| {
        let mut writer = BufWriter::new(file);
        writer.write_all(data)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    });

    if let Err(e) = written.and_then(|_| fs::rename(&temp, path)) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    Ok(())
}
