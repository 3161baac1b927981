//! Candidate discovery under the scan root.
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files under `root` whose extension is in `extensions` (each with a leading
/// dot, compared case-insensitively), minus `excluded`. Sorted for stable
/// output.
pub fn collect_candidates(
    root: &Path,
    extensions: &[String],
    excluded: &BTreeSet<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !has_extension(entry.path(), extensions) || excluded.contains(entry.path()) {
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "collected candidates");
    Ok(files)
}

/// Whether `path` ends in one of `extensions` (leading dot, any case).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Canonical form used as the identity of a tracked file.
pub fn canonical_key(path: &Path) -> Result<String> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("resolve {}", path.display()))?;
    Ok(canonical.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, b"x").expect("write");
    }

    #[test]
    fn filters_by_extension_case_insensitively() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        touch(&root.join("a.cs"));
        touch(&root.join("nested/B.CS"));
        touch(&root.join("nested/c.txt"));
        touch(&root.join("d.csx"));

        let found = collect_candidates(root, &[".cs".to_string()], &BTreeSet::new())
            .expect("collect");
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(root).expect("under root").to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("a.cs"), PathBuf::from("nested/B.CS")]
        );
    }

    #[test]
    fn excluded_paths_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        touch(&root.join("hashes.json"));
        touch(&root.join("data.json"));
        let excluded = BTreeSet::from([root.join("hashes.json")]);
        let found = collect_candidates(root, &[".json".to_string()], &excluded).expect("collect");
        assert_eq!(found, vec![root.join("data.json")]);
    }
}
