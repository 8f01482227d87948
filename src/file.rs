use crate::buffer::normalize_newlines;
use log::info;
use std::fs;
use std::io;
use std::path::Path;

/// Reads a file for display in a pane.
/// Invalid UTF-8 is replaced rather than rejected, and line endings are
/// normalised to LF.
pub fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let content = normalize_newlines(&String::from_utf8_lossy(&bytes));
    info!("loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(content)
}

/// Short name for a loaded file, shown in pane titles.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
