//! Per-file change decisions.
//!
//! `decide` is pure: it looks at a parsed file, the hash recorded by the last
//! run, and the active override, and says whether the marker must change and
//! to what. Writing the file and recording state is the orchestrator's job.
use crate::content::{content_hash, find_marker, marker_line, Marker, SourceText};
use crate::version::{Component, Maxima, Version};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Component values forced by a partial override.
pub type ComponentOverrides = BTreeMap<Component, u32>;

/// Manual instruction that bypasses change detection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverrideDirective {
    #[default]
    None,
    Full(Version),
    Partial(ComponentOverrides),
}

impl OverrideDirective {
    pub fn is_manual(&self) -> bool {
        !matches!(self, OverrideDirective::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Auto,
    Manual,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Auto => "auto",
            Origin::Manual => "manual",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-wide knobs that shape every computed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPolicy {
    pub increment: Component,
    pub maxima: Maxima,
    pub comment_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// `None` when the file had no usable marker.
    pub old: Option<Version>,
    pub new: Version,
    pub origin: Origin,
    /// Content hash to record for the file.
    pub hash: String,
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Unchanged { version: Version },
    Updated(Update),
}

impl Decision {
    /// Version the file carries once the decision is applied.
    pub fn final_version(&self) -> Version {
        match self {
            Decision::Unchanged { version } => *version,
            Decision::Updated(update) => update.new,
        }
    }
}

pub fn decide(
    source: &SourceText,
    stored_hash: Option<&str>,
    directive: &OverrideDirective,
    policy: &VersionPolicy,
) -> Decision {
    let marker = find_marker(source.lines(), &policy.comment_prefix);
    let current = marker.as_ref().and_then(|marker| marker.version);
    let hash = content_hash(source.lines(), marker.as_ref().map(|marker| marker.index));

    if !directive.is_manual() {
        if let Some(version) = current {
            if stored_hash == Some(hash.as_str()) {
                return Decision::Unchanged { version };
            }
        }
    }

    let (new, origin) = match directive {
        OverrideDirective::Full(version) => (version.clamp_to(&policy.maxima), Origin::Manual),
        OverrideDirective::Partial(values) => (
            apply_partial(
                current.unwrap_or_else(|| Version::initial().clamp_to(&policy.maxima)),
                values,
                &policy.maxima,
            ),
            Origin::Manual,
        ),
        OverrideDirective::None => {
            let next = match current {
                Some(version) => version.increment(policy.increment, &policy.maxima),
                None => Version::initial().clamp_to(&policy.maxima),
            };
            (next, Origin::Auto)
        }
    };

    Decision::Updated(Update {
        old: current,
        new,
        origin,
        hash,
        marker,
    })
}

fn apply_partial(base: Version, values: &ComponentOverrides, maxima: &Maxima) -> Version {
    let mut version = base;
    for (&component, &value) in values {
        version.set(component, value.min(maxima.get(component)));
    }
    version
}

/// Source text with the marker rewritten for `update`.
pub fn rewrite(source: &SourceText, update: &Update, comment_prefix: &str) -> SourceText {
    let mut rewritten = source.clone();
    rewritten.write_marker(
        update.marker.as_ref(),
        marker_line(comment_prefix, &update.new),
    );
    rewritten
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
