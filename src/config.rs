//! Validated run configuration.
//!
//! Everything that can be wrong with the invocation is rejected here, before
//! any source file is read.
use crate::cli::RootArgs;
use crate::decision::{ComponentOverrides, OverrideDirective, VersionPolicy};
use crate::history::HISTORY_FILE;
use crate::ignore::DEFAULT_IGNORE_FILE;
use crate::report::DEFAULT_REPORT_FILE;
use crate::scan::has_extension;
use crate::store::HASH_STORE_FILE;
use crate::version::{Component, Maxima, Version, COMPONENT_MAX_LIMIT};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Manual override and the files it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverridePlan {
    pub directive: OverrideDirective,
    /// Canonical keys of targeted files; `None` means every file.
    pub targets: Option<BTreeSet<String>>,
}

impl OverridePlan {
    pub fn applies_to(&self, key: &str) -> bool {
        match &self.targets {
            Some(targets) => targets.contains(key),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub ignore_file: Option<PathBuf>,
    pub report_path: PathBuf,
    pub state_dir: PathBuf,
    pub policy: VersionPolicy,
    pub overrides: OverridePlan,
    pub dry_run: bool,
    pub strict: bool,
}

impl RunConfig {
    /// Validate `args`; relative paths resolve against `cwd`.
    pub fn from_args(args: &RootArgs, cwd: &Path) -> Result<Self> {
        let root = absolutize(&args.path, cwd);
        if !root.is_dir() {
            return Err(anyhow!("--path {} is not a directory", root.display()));
        }
        let root = root
            .canonicalize()
            .with_context(|| format!("resolve {}", root.display()))?;

        let extensions = validate_extensions(&args.extensions)?;

        let maxima = Maxima::new(
            args.max_major,
            args.max_minor,
            args.max_build,
            args.max_revision,
        );
        validate_maxima(&maxima)?;

        if args.comment_prefix.trim().is_empty() {
            return Err(anyhow!("--comment-prefix must be non-empty"));
        }

        let ignore_file = match &args.ignore_file {
            Some(path) => {
                let path = absolutize(path, cwd);
                if !path.is_file() {
                    return Err(anyhow!("ignore file {} does not exist", path.display()));
                }
                Some(path)
            }
            None => Some(root.join(DEFAULT_IGNORE_FILE)).filter(|path| path.is_file()),
        };

        let report_path = args
            .report
            .as_ref()
            .map(|path| absolutize(path, cwd))
            .unwrap_or_else(|| root.join(DEFAULT_REPORT_FILE));

        let state_dir = match &args.state_dir {
            Some(dir) => {
                let dir = absolutize(dir, cwd);
                dir.canonicalize().unwrap_or(dir)
            }
            None => root.clone(),
        };

        let overrides = override_plan(args, &root, &extensions, cwd)?;

        Ok(Self {
            root,
            extensions,
            ignore_file,
            report_path,
            state_dir,
            policy: VersionPolicy {
                increment: args.increment,
                maxima,
                comment_prefix: args.comment_prefix.trim().to_string(),
            },
            overrides,
            dry_run: args.dry_run,
            strict: args.strict,
        })
    }

    pub fn hash_store_path(&self) -> PathBuf {
        self.state_dir.join(HASH_STORE_FILE)
    }

    pub fn history_path(&self) -> PathBuf {
        self.state_dir.join(HISTORY_FILE)
    }

    /// Tool-owned files that must never be treated as sources.
    pub fn excluded_paths(&self) -> BTreeSet<PathBuf> {
        let mut excluded = BTreeSet::from([
            self.hash_store_path(),
            self.history_path(),
            self.report_path.clone(),
        ]);
        if let Some(ignore_file) = &self.ignore_file {
            excluded.insert(ignore_file.clone());
        }
        excluded
            .into_iter()
            .map(|path| path.canonicalize().unwrap_or(path))
            .collect()
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn validate_extensions(raw: &[String]) -> Result<Vec<String>> {
    let mut extensions = Vec::new();
    for ext in raw.iter().map(|ext| ext.trim()).filter(|ext| !ext.is_empty()) {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(anyhow!(
                "extension {ext:?} must start with '.' followed by a name (e.g. \".cs\")"
            ));
        }
        if !extensions.iter().any(|seen: &String| seen.eq_ignore_ascii_case(ext)) {
            extensions.push(ext.to_string());
        }
    }
    if extensions.is_empty() {
        return Err(anyhow!("at least one extension is required"));
    }
    Ok(extensions)
}

fn validate_maxima(maxima: &Maxima) -> Result<()> {
    for component in Component::ALL {
        let value = maxima.get(component);
        if value > COMPONENT_MAX_LIMIT {
            return Err(anyhow!(
                "--max-{component} must be between 0 and {COMPONENT_MAX_LIMIT} (got {value})"
            ));
        }
    }
    Ok(())
}

/// Parse a user-supplied version strictly: 1 to 4 dotted integers.
pub fn parse_version_arg(flag: &str, text: &str) -> Result<Version> {
    let re = Regex::new(r"^\d+(\.\d+){0,3}$").expect("regex for version arguments");
    let text = text.trim();
    if !re.is_match(text) {
        return Err(anyhow!(
            "{flag} expects MAJOR[.MINOR[.BUILD[.REVISION]]] (got {text:?})"
        ));
    }
    for part in text.split('.') {
        part.parse::<u32>()
            .with_context(|| format!("{flag} component {part:?} is out of range"))?;
    }
    Ok(Version::parse_lenient(text))
}

fn component_overrides(args: &RootArgs) -> ComponentOverrides {
    [
        (Component::Major, args.set_major),
        (Component::Minor, args.set_minor),
        (Component::Build, args.set_build),
        (Component::Revision, args.set_revision),
    ]
    .into_iter()
    .filter_map(|(component, value)| value.map(|value| (component, value)))
    .collect()
}

fn override_plan(
    args: &RootArgs,
    root: &Path,
    extensions: &[String],
    cwd: &Path,
) -> Result<OverridePlan> {
    let partial = component_overrides(args);
    let has_targets = !args.targets.is_empty();

    if args.set_version.is_some()
        && (has_targets || args.target_version.is_some() || !partial.is_empty())
    {
        return Err(anyhow!(
            "--set-version cannot be combined with --target, --target-version, or --set-<component>"
        ));
    }
    if args.target_version.is_some() && !partial.is_empty() {
        return Err(anyhow!(
            "--target-version cannot be combined with --set-<component>"
        ));
    }
    if args.target_version.is_some() && !has_targets {
        return Err(anyhow!("--target-version requires at least one --target"));
    }
    if has_targets && args.target_version.is_none() && partial.is_empty() {
        return Err(anyhow!(
            "--target requires --target-version or a --set-<component> value"
        ));
    }

    let directive = if let Some(text) = &args.set_version {
        OverrideDirective::Full(parse_version_arg("--set-version", text)?)
    } else if let Some(text) = &args.target_version {
        OverrideDirective::Full(parse_version_arg("--target-version", text)?)
    } else if !partial.is_empty() {
        OverrideDirective::Partial(partial)
    } else {
        OverrideDirective::None
    };

    let targets = if has_targets {
        let keys = args
            .targets
            .iter()
            .map(|target| resolve_target(target, root, extensions, cwd))
            .collect::<Result<BTreeSet<_>>>()?;
        Some(keys)
    } else {
        None
    };

    Ok(OverridePlan { directive, targets })
}

/// Resolve a `--target` against the working directory, then the scan root.
///
/// The target must be a file the scan would visit: under the root and
/// carrying one of the configured extensions.
fn resolve_target(
    target: &Path,
    root: &Path,
    extensions: &[String],
    cwd: &Path,
) -> Result<String> {
    let candidates = [absolutize(target, cwd), absolutize(target, root)];
    let resolved = candidates
        .iter()
        .find(|path| path.is_file())
        .and_then(|path| path.canonicalize().ok())
        .ok_or_else(|| anyhow!("override target {} not found", target.display()))?;
    if !resolved.starts_with(root) {
        return Err(anyhow!(
            "override target {} is outside --path {}",
            target.display(),
            root.display()
        ));
    }
    if !has_extension(&resolved, extensions) {
        return Err(anyhow!(
            "override target {} does not match --extensions {}",
            target.display(),
            extensions.join(",")
        ));
    }
    Ok(resolved.to_string_lossy().to_string())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
