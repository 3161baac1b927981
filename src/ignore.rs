//! Ignore-file patterns, resolved to globs or regexes once at load time.
use anyhow::{anyhow, Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use std::fs;
use std::path::Path;

pub const DEFAULT_IGNORE_FILE: &str = ".versionignore";
const REGEX_PREFIX: &str = "/regex:";

#[derive(Debug, Clone)]
pub enum IgnorePattern {
    Glob(GlobMatcher),
    Regex(Regex),
}

impl IgnorePattern {
    /// Classify one pattern: `/regex:` prefix or `^`/`$` anchors mean regex.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(anyhow!("empty ignore pattern"));
        }
        if let Some(expr) = raw.strip_prefix(REGEX_PREFIX) {
            return compile_regex(expr.trim());
        }
        if raw.starts_with('^') || raw.ends_with('$') {
            return compile_regex(raw);
        }
        let glob = GlobBuilder::new(raw)
            .literal_separator(false)
            .build()
            .with_context(|| format!("invalid ignore glob {raw:?}"))?;
        Ok(IgnorePattern::Glob(glob.compile_matcher()))
    }

    /// Globs are tried against the relative path and the bare file name;
    /// regexes only against the relative path.
    pub fn matches(&self, rel_path: &str) -> bool {
        match self {
            IgnorePattern::Glob(glob) => {
                let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
                glob.is_match(rel_path) || glob.is_match(file_name)
            }
            IgnorePattern::Regex(re) => re.is_match(rel_path),
        }
    }
}

fn compile_regex(expr: &str) -> Result<IgnorePattern> {
    let re = Regex::new(expr).with_context(|| format!("invalid ignore regex {expr:?}"))?;
    Ok(IgnorePattern::Regex(re))
}

#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreMatcher {
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|raw| IgnorePattern::parse(raw.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Parse ignore-file text: either a JSON array of patterns or one pattern
    /// per line with `#` comments.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim_start().starts_with('[') {
            if let Ok(list) = serde_json::from_str::<Vec<String>>(text) {
                return Self::from_patterns(list.iter().filter(|raw| !raw.trim().is_empty()));
            }
        }
        Self::from_patterns(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read ignore file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse ignore file {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `rel_path` is root-relative with forward slashes.
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(rel_path))
    }
}
