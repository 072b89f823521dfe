// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tracing runtime control.

use ordermap::OrderMap;
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::{info, warn};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{EnvFilter, Registry, prelude::*, reload};

use crate::{targets, trace_target};

trace_target!("tracectl", LevelFilter::INFO, &[]);

/// Errors produced when applying a tracing configuration string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceCtlError {
    #[error("Invalid syntax '{0}': it should be tag=loglevel")]
    InvalidSyntax(String),
    #[error("Invalid level '{0}'")]
    InvalidLevel(String),
}

#[derive(Debug, Clone)]
pub struct TargetCfg {
    pub(crate) target: &'static str,
    pub(crate) name: &'static str,
    pub(crate) level: LevelFilter,
    pub(crate) tags: Vec<&'static str>,
}
impl TargetCfg {
    fn new(
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) -> Self {
        // a target can always be addressed by its name
        let mut tags = tags.to_vec();
        if !tags.contains(&name) {
            tags.push(name);
        }
        Self {
            target,
            name,
            level,
            tags,
        }
    }
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
    #[must_use]
    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

#[derive(Debug)]
pub(crate) struct TargetCfgDb {
    pub(crate) level: LevelFilter,
    pub(crate) targets: OrderMap<&'static str, TargetCfg>,
    pub(crate) tags: OrderMap<&'static str, HashSet<&'static str>>,
}

impl TargetCfgDb {
    pub(crate) fn new(level: LevelFilter) -> Self {
        let mut db = Self {
            level,
            targets: OrderMap::new(),
            tags: OrderMap::new(),
        };
        for t in targets::registered() {
            db.register(t.target(), t.name(), t.level(), t.tags());
        }
        db
    }
    fn register(
        &mut self,
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) {
        let tconfig = TargetCfg::new(target, name, level, tags);
        for tag in &tconfig.tags {
            self.tags.entry(*tag).or_default().insert(target);
        }
        if let Some(exist) = self.targets.insert(target, tconfig) {
            warn!("Target {} has been multiply defined!", exist.target);
        }
    }
    pub(crate) fn env_filter(&self) -> EnvFilter {
        let mut f = EnvFilter::new(self.level.to_string());
        for target in self.targets.values() {
            match format!("{}={}", target.target, target.level).parse::<Directive>() {
                Ok(directive) => f = f.add_directive(directive),
                Err(e) => warn!("Ignoring target {}: {e}", target.target),
            }
        }
        f
    }
    /// Set the level of all the targets carrying `tag`. Returns the number of targets changed.
    pub(crate) fn set_tag_level(&mut self, tag: &str, level: LevelFilter) -> usize {
        let Some(members) = self.tags.get(tag) else {
            return 0;
        };
        let mut changed = 0;
        for target in self.targets.values_mut() {
            if members.contains(target.target) && target.level != level {
                target.level = level;
                changed += 1;
            }
        }
        changed
    }
}

impl Display for TargetCfgDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>40} │ {:>8} │ TAGS", "TARGET", "LEVEL")?;
        for t in self.targets.values() {
            writeln!(f, "{:>40} │ {:>8} │ {}", t.target, t.level, t.tags.join(","))?;
        }
        write!(f, "{:>40} │ {:>8} │ --", "(default)", self.level)
    }
}

/// Parse a string made of comma-separated tag=level, where level=off,error,warn,info,debug,trace
pub(crate) fn parse_tracing_config(
    input: &str,
) -> Result<OrderMap<String, LevelFilter>, TraceCtlError> {
    let mut result = OrderMap::new();
    for item in input.split(',').map(str::trim).filter(|i| !i.is_empty()) {
        let Some((tag, level)) = item.split_once('=') else {
            return Err(TraceCtlError::InvalidSyntax(item.to_string()));
        };
        let level = LevelFilter::from_str(level.trim())
            .map_err(|_| TraceCtlError::InvalidLevel(level.trim().to_string()))?;
        result.insert(tag.trim().to_string(), level);
    }
    Ok(result)
}

/// Handle to the process-wide tracing subscriber
#[derive(Debug)]
pub struct TracingControl {
    db: Mutex<TargetCfgDb>,
    reload_filter: Option<reload::Handle<EnvFilter, Registry>>,
}

impl TracingControl {
    fn new() -> Self {
        let db = TargetCfgDb::new(LevelFilter::INFO);
        let (filter, reload_filter) = reload::Layer::new(db.env_filter());
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_line_number(true)
            .with_target(true)
            .with_thread_names(true)
            .with_level(true);

        // another subscriber (e.g. a test harness) may own the global default already
        let reload_filter = match tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
        {
            Ok(()) => Some(reload_filter),
            Err(e) => {
                warn!("Tracing subscriber not installed: {e}");
                None
            }
        };
        Self {
            db: Mutex::new(db),
            reload_filter,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TargetCfgDb> {
        self.db.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn reload(&self, db: &TargetCfgDb) {
        if let Some(handle) = &self.reload_filter
            && let Err(e) = handle.reload(db.env_filter())
        {
            warn!("Failed to reload tracing filter: {e}");
        }
    }

    pub fn set_tag_level(&self, tag: &str, level: LevelFilter) {
        let mut db = self.lock();
        let changed = db.set_tag_level(tag, level);
        if changed > 0 {
            self.reload(&db);
        }
        info!("Changed log level for tag '{tag}' to {level}. Targets changed: {changed}");
    }

    pub fn set_default_level(&self, level: LevelFilter) {
        let mut db = self.lock();
        if db.level != level {
            db.level = level;
            self.reload(&db);
        }
    }

    #[must_use]
    pub fn get_default_level(&self) -> LevelFilter {
        self.lock().level
    }

    /// Apply a configuration like `default=warn,fns=debug`.
    ///
    /// `default` sets the level of events from undeclared targets; `all` sets every declared
    /// target and may be refined by the tags that follow it.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if the string is malformed.
    pub fn setup_from_string(&self, input: &str) -> Result<(), TraceCtlError> {
        let config = parse_tracing_config(input)?;
        let mut db = self.lock();
        if let Some(level) = config.get("default") {
            db.level = *level;
        }
        if let Some(level) = config.get("all") {
            for target in db.targets.values_mut() {
                target.level = *level;
            }
        }
        for (tag, level) in config.iter().filter(|(t, _)| *t != "default" && *t != "all") {
            db.set_tag_level(tag, *level);
        }
        self.reload(&db);
        Ok(())
    }

    #[must_use]
    pub fn get_target(&self, target: &str) -> Option<TargetCfg> {
        self.lock().targets.get(target).cloned()
    }

    #[must_use]
    pub fn get_targets_by_tag(&self, tag: &str) -> Vec<TargetCfg> {
        let db = self.lock();
        let Some(members) = db.tags.get(tag) else {
            return vec![];
        };
        db.targets
            .values()
            .filter(|t| members.contains(t.target))
            .cloned()
            .collect()
    }

    /// Render the current per-target configuration as a table.
    #[must_use]
    pub fn dump(&self) -> String {
        self.lock().to_string()
    }
}

static TRACING_CTL: OnceLock<TracingControl> = OnceLock::new();

/// Get a reference to the static [`TracingControl`], initializing it if needed
pub fn get_trace_ctl() -> &'static TracingControl {
    TRACING_CTL.get_or_init(TracingControl::new)
}
