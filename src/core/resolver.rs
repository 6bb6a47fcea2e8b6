// ─── Asset Requirement Resolver ───
// Pure mapping from a build version to the assets it needs beyond the base
// installation. No I/O happens here; the download orchestrator acts on the
// returned list.

use std::path::{Path, PathBuf};

const CDN_BASE: &str = "https://cdn.horizonfn.org";

/// File name fragments that are always re-fetched even when the on-disk
/// size matches: short-lived certificate/binary blobs must never be reused.
pub const RESERVED_EXTENSIONS: &[&str] = &[".cer", ".bin"];

/// A file that must exist at a build's install path before launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredAsset {
    /// Install-relative path, unique within one session.
    pub name: String,
    /// Expected byte size, compared exactly against the on-disk file.
    pub size: u64,
    /// Source location on the CDN.
    pub url: String,
}

impl RequiredAsset {
    fn new(name: &str, size: u64, url: String) -> Self {
        Self {
            name: name.to_string(),
            size,
            url,
        }
    }
}

/// Whether `name` contains a reserved extension (§ always re-fetch).
pub fn always_refetch(name: &str) -> bool {
    RESERVED_EXTENSIONS.iter().any(|ext| name.contains(ext))
}

/// Resolve the supplemental assets for `version`.
///
/// Most builds are self-contained and resolve to an empty list. Versions
/// with known gaps map to a fixed, ordered set of named assets.
pub fn resolve(version: &str) -> Vec<RequiredAsset> {
    match version.trim() {
        "9.1" => vec![
            RequiredAsset::new(
                "HorizonGame/Content/Paks/pakchunk0-WindowsClient.pak",
                1_000_000,
                format!("{CDN_BASE}/9.1/pakchunk0-WindowsClient.pak"),
            ),
            RequiredAsset::new(
                "HorizonGame/Binaries/Win64/HorizonClient-Win64-Shipping.exe",
                500_000,
                format!("{CDN_BASE}/9.1/HorizonClient-Win64-Shipping.exe"),
            ),
            RequiredAsset::new(
                "HorizonGame/Content/Paks/pakchunk1-WindowsClient.pak",
                1_500_000,
                format!("{CDN_BASE}/9.1/pakchunk1-WindowsClient.pak"),
            ),
        ],
        _ => Vec::new(),
    }
}

/// The two optional-content paks appended when the build-wide optional
/// content flag is enabled.
pub fn optional_content_assets() -> Vec<RequiredAsset> {
    vec![
        RequiredAsset::new(
            "HorizonGame/Content/Paks/pakchunkHorizonExtra-WindowsClient.pak",
            5_621_421,
            format!("{CDN_BASE}/ExtraPaks/pakchunkHorizonExtra-WindowsClient.pak"),
        ),
        RequiredAsset::new(
            "HorizonGame/Content/Paks/pakchunkHorizonExtra-WindowsClient.sig",
            217_104,
            format!("{CDN_BASE}/ExtraPaks/pakchunkHorizonExtra-WindowsClient.sig"),
        ),
    ]
}

/// On-disk locations of the optional-content paks inside `target_dir`;
/// these are deleted when the flag is disabled.
pub fn optional_content_paths(target_dir: &Path) -> Vec<PathBuf> {
    optional_content_assets()
        .iter()
        .map(|asset| target_dir.join(&asset.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_contained_versions_resolve_to_nothing() {
        assert!(resolve("12.41").is_empty());
        assert!(resolve("").is_empty());
        assert!(resolve("unknown").is_empty());
    }

    #[test]
    fn version_9_1_resolves_to_three_fixed_assets() {
        let assets = resolve("9.1");
        assert_eq!(assets.len(), 3);
        assert_eq!(
            assets[0].name,
            "HorizonGame/Content/Paks/pakchunk0-WindowsClient.pak"
        );
        assert_eq!(assets[0].size, 1_000_000);
        assert_eq!(
            assets[1].name,
            "HorizonGame/Binaries/Win64/HorizonClient-Win64-Shipping.exe"
        );
        assert_eq!(assets[1].size, 500_000);
        assert_eq!(
            assets[2].name,
            "HorizonGame/Content/Paks/pakchunk1-WindowsClient.pak"
        );
        assert_eq!(assets[2].size, 1_500_000);
    }

    #[test]
    fn resolution_is_deterministic() {
        assert_eq!(resolve("9.1"), resolve(" 9.1 "));
    }

    #[test]
    fn reserved_extensions_always_refetch() {
        assert!(always_refetch("ca.cer"));
        assert!(always_refetch("HorizonGame/Content/shader.bin"));
        assert!(!always_refetch(
            "HorizonGame/Content/Paks/pakchunk0-WindowsClient.pak"
        ));
    }

    #[test]
    fn optional_content_is_a_pak_and_its_signature() {
        let extras = optional_content_assets();
        assert_eq!(extras.len(), 2);
        assert!(extras[0].name.ends_with(".pak"));
        assert!(extras[1].name.ends_with(".sig"));

        let paths = optional_content_paths(Path::new("/builds/9.1"));
        assert!(paths[0].starts_with("/builds/9.1"));
    }
}
