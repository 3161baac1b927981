//! One versioning pass over the scan root.
//!
//! Files are handled one at a time: ignore check, read, decide, and on update
//! rewrite the marker and record the new hash and history entry. A failure on
//! one file is reported and the pass moves on. Hash store, history, and
//! report are written once at the end.
use crate::config::RunConfig;
use crate::content::SourceText;
use crate::decision::{decide, rewrite, Decision, OverrideDirective, Update};
use crate::history::{HistoryEntry, HistoryLog, PriorVersion};
use crate::ignore::IgnoreMatcher;
use crate::report::RunReport;
use crate::scan::{canonical_key, collect_candidates};
use crate::store::VersionStore;
use crate::util::display_path;
use crate::version::{average, Version};
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

/// State owned by a single pass.
struct RunState {
    store: VersionStore,
    history: HistoryLog,
}

pub fn run(config: &RunConfig) -> Result<RunReport> {
    let ignore = load_ignore(config)?;
    let mut state = RunState {
        store: VersionStore::load(&config.hash_store_path())?,
        history: HistoryLog::load(&config.history_path())?,
    };
    if state.store.is_empty() {
        tracing::info!("no recorded hashes; every candidate will be stamped");
    }
    tracing::info!(
        root = %config.root.display(),
        tracked = state.store.len(),
        history_entries = state.history.entries().len(),
        ignore_patterns = ignore.len(),
        "starting run"
    );

    let candidates = collect_candidates(&config.root, &config.extensions, &config.excluded_paths())?;
    let mut report = RunReport::default();
    let mut versions: Vec<Version> = Vec::new();

    for path in candidates {
        let shown = display_path(&path, Some(&config.root));
        if ignore.is_ignored(&shown) {
            tracing::debug!(path = %shown, "ignored");
            report.stats.ignored += 1;
            continue;
        }
        report.stats.processed += 1;
        match process_file(&path, config, &mut state) {
            Ok(decision) => {
                versions.push(decision.final_version());
                match decision {
                    Decision::Unchanged { version } => {
                        tracing::debug!(path = %shown, %version, "unchanged");
                        report.stats.unchanged += 1;
                    }
                    Decision::Updated(update) => {
                        tracing::info!(
                            path = %shown,
                            old = %PriorVersion(update.old),
                            new = %update.new,
                            origin = %update.origin,
                            "updated"
                        );
                        report.stats.updated += 1;
                        report.record_update(&shown, &update.new);
                    }
                }
            }
            Err(err) => {
                let detail = format!("{err:#}");
                tracing::warn!(path = %shown, error = %detail, "skipping file");
                report.stats.failed += 1;
                report.record_failure(&shown, &err);
            }
        }
    }
    report.stats.average = average(&versions);

    if config.dry_run {
        tracing::info!("dry run: leaving state and report untouched");
        return Ok(report);
    }
    state
        .store
        .save()
        .with_context(|| format!("save hash store {}", state.store.path().display()))?;
    state
        .history
        .save()
        .with_context(|| format!("save history {}", state.history.path().display()))?;
    report
        .write(&config.report_path)
        .with_context(|| format!("write report {}", config.report_path.display()))?;
    Ok(report)
}

fn load_ignore(config: &RunConfig) -> Result<IgnoreMatcher> {
    let Some(path) = &config.ignore_file else {
        return Ok(IgnoreMatcher::default());
    };
    let matcher = IgnoreMatcher::load(path)?;
    if matcher.is_empty() {
        tracing::warn!(path = %path.display(), "ignore file has no patterns");
    }
    Ok(matcher)
}

fn process_file(path: &Path, config: &RunConfig, state: &mut RunState) -> Result<Decision> {
    let key = canonical_key(path)?;
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let source = SourceText::parse(&text);

    let automatic = OverrideDirective::None;
    let directive = if config.overrides.applies_to(&key) {
        &config.overrides.directive
    } else {
        &automatic
    };

    let decision = decide(&source, state.store.get(&key), directive, &config.policy);
    if let Decision::Updated(update) = &decision {
        if !config.dry_run {
            let rewritten = rewrite(&source, update, &config.policy.comment_prefix);
            fs::write(path, rewritten.render())
                .with_context(|| format!("write {}", path.display()))?;
        }
        record_update(state, key, update);
    }
    Ok(decision)
}

fn record_update(state: &mut RunState, key: String, update: &Update) {
    state.store.put(key.clone(), update.hash.clone());
    state.history.append(HistoryEntry {
        file: key,
        old_version: PriorVersion(update.old),
        new_version: update.new,
        date: Utc::now(),
        origin: update.origin,
    });
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
