// ─── Version Detection ───
// The game client embeds its build label as a UTF-16 string of the form
// `++Horizon+Release-<version>-CL-<changelist>`. When a user registers an
// existing installation we recover the version by scanning the executable
// for that marker.

use std::path::Path;

use crate::core::error::{LauncherError, LauncherResult};

const VERSION_MARKER: &str = "++Horizon+";

fn utf16le_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Find the first embedded build label in `buffer`.
///
/// Returns the full marker string up to its NUL terminator, e.g.
/// `++Horizon+Release-9.1-CL-6639283`.
pub fn scan_version_marker(buffer: &[u8]) -> Option<String> {
    let pattern = utf16le_bytes(VERSION_MARKER);
    let start = buffer.windows(pattern.len()).position(|w| w == pattern)?;

    let mut units = Vec::new();
    let mut i = start;
    while i + 1 < buffer.len() {
        let unit = u16::from_le_bytes([buffer[i], buffer[i + 1]]);
        if unit == 0 {
            break;
        }
        units.push(unit);
        i += 2;
    }

    Some(String::from_utf16_lossy(&units))
}

/// Extract the short version label from a full marker string:
/// `++Horizon+Release-9.1-CL-6639283` → `9.1`.
pub fn version_label(marker: &str) -> Option<String> {
    let release = marker.split_once("+Release-")?.1;
    let label = release.split('-').next()?;
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

/// Read `executable` and return its short version label, if the marker
/// is present.
pub async fn detect_build_version(executable: &Path) -> LauncherResult<Option<String>> {
    let buffer = tokio::fs::read(executable)
        .await
        .map_err(|e| LauncherError::Io {
            path: executable.to_path_buf(),
            source: e,
        })?;

    Ok(scan_version_marker(&buffer).as_deref().and_then(version_label))
}
