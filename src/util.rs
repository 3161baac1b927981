use sha2::Digest;
use std::path::Path;

/// Path relative to `base` (forward slashes) when possible, else as given.
pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    let Some(relative) = base.and_then(|base| path.strip_prefix(base).ok()) else {
        return path.display().to_string();
    };
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
