//! Four-component version tuples and the increment rules applied to them.
//!
//! Parsing is lenient on purpose: a marker that carries garbage degrades to
//! zeros instead of failing the run. Strict validation of user-supplied
//! versions lives in `config`.
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub const COMPONENT_COUNT: usize = 4;
pub const DEFAULT_COMPONENT_MAX: u32 = 99;
pub const COMPONENT_MAX_LIMIT: u32 = 999;

/// `MAJOR.MINOR.BUILD.REVISION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Version {
    components: [u32; COMPONENT_COUNT],
}

impl Version {
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            components: [major, minor, build, revision],
        }
    }

    /// Version assigned to a file that has never carried a marker.
    pub const fn initial() -> Self {
        Self::new(1, 0, 0, 0)
    }

    pub fn set(&mut self, component: Component, value: u32) {
        self.components[component.index()] = value;
    }

    /// Parse dotted text, treating missing or non-numeric parts as zero.
    pub fn parse_lenient(text: &str) -> Self {
        let mut components = [0u32; COMPONENT_COUNT];
        for (slot, part) in components.iter_mut().zip(text.trim().split('.')) {
            *slot = part.trim().parse().unwrap_or(0);
        }
        Self { components }
    }

    /// Component-wise `min(value, max)`.
    pub fn clamp_to(&self, maxima: &Maxima) -> Self {
        let mut components = self.components;
        for (value, max) in components.iter_mut().zip(maxima.components) {
            *value = (*value).min(max);
        }
        Self { components }
    }

    /// Bump `component`, zero everything less significant, then carry any
    /// overflow toward major. Major saturates at its maximum.
    pub fn increment(&self, component: Component, maxima: &Maxima) -> Self {
        let mut c = self.components;
        let idx = component.index();
        c[idx] = c[idx].saturating_add(1);
        for value in c.iter_mut().skip(idx + 1) {
            *value = 0;
        }

        let mut i = idx;
        while i > 0 && c[i] > maxima.components[i] {
            c[i] = 0;
            c[i - 1] = c[i - 1].saturating_add(1);
            i -= 1;
        }

        if c[0] > maxima.components[0] {
            c = [maxima.components[0], 0, 0, 0];
        }
        Self { components: c }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, build, revision] = self.components;
        write!(f, "{major}.{minor}.{build}.{revision}")
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Version::parse_lenient(&text))
    }
}

/// A single position inside a [`Version`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Component {
    Major,
    Minor,
    Build,
    Revision,
}

impl Component {
    pub const ALL: [Component; COMPONENT_COUNT] = [
        Component::Major,
        Component::Minor,
        Component::Build,
        Component::Revision,
    ];

    pub fn index(self) -> usize {
        match self {
            Component::Major => 0,
            Component::Minor => 1,
            Component::Build => 2,
            Component::Revision => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Component::Major => "major",
            Component::Minor => "minor",
            Component::Build => "build",
            Component::Revision => "revision",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-component ceilings applied to every newly computed version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Maxima {
    components: [u32; COMPONENT_COUNT],
}

impl Maxima {
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            components: [major, minor, build, revision],
        }
    }

    pub fn get(&self, component: Component) -> u32 {
        self.components[component.index()]
    }
}

impl Default for Maxima {
    fn default() -> Self {
        Self::new(
            DEFAULT_COMPONENT_MAX,
            DEFAULT_COMPONENT_MAX,
            DEFAULT_COMPONENT_MAX,
            DEFAULT_COMPONENT_MAX,
        )
    }
}

fn dotted_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+){1,3}").expect("valid version regex"))
}

/// First dotted-integer run (2 to 4 groups) inside `line`.
pub fn find_version(line: &str) -> Option<Version> {
    dotted_version_re()
        .find(line)
        .map(|m| Version::parse_lenient(m.as_str()))
}

/// Unweighted per-component mean, truncated. Empty input yields `0.0.0.0`.
pub fn average(versions: &[Version]) -> Version {
    if versions.is_empty() {
        return Version::default();
    }
    let mut sums = [0u64; COMPONENT_COUNT];
    for version in versions {
        for (sum, value) in sums.iter_mut().zip(version.components) {
            *sum += u64::from(value);
        }
    }
    let count = versions.len() as u64;
    let mut components = [0u32; COMPONENT_COUNT];
    for (slot, sum) in components.iter_mut().zip(sums) {
        *slot = u32::try_from(sum / count).unwrap_or(u32::MAX);
    }
    Version { components }
}
