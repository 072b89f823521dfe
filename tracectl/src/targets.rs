// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tracing targets of the FNS crates, gathered at link time.
//!
//! Every module that logs declares itself once with [`trace_target!`](crate::trace_target).
//! The declarations land in [`TRACING_TARGETS`] whichever crate they live in, so the
//! tracing control knows about the store, the locator and the binaries without any
//! registration call at runtime.

use crate::LevelFilter;
use linkme::distributed_slice;

/// A tracing target: the module path `tracing` uses as event target, the name users
/// refer to it by, its default level and the tags that group it with other targets.
#[derive(Debug)]
pub struct STarget {
    pub(crate) target: &'static str,
    pub(crate) name: &'static str,
    pub(crate) level: LevelFilter,
    pub(crate) tags: &'static [&'static str],
}

impl STarget {
    #[must_use]
    pub const fn new(
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) -> Self {
        Self {
            target,
            name,
            level,
            tags,
        }
    }
    #[must_use]
    pub fn target(&self) -> &'static str {
        self.target
    }
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
    #[must_use]
    pub fn level(&self) -> LevelFilter {
        self.level
    }
    #[must_use]
    pub fn tags(&self) -> &'static [&'static str] {
        self.tags
    }
}

#[distributed_slice]
pub static TRACING_TARGETS: [STarget];

/// All the targets declared by the crates linked in this binary.
pub fn registered() -> impl Iterator<Item = &'static STarget> {
    TRACING_TARGETS.iter()
}

/// Declare the tracing target of the calling module: `trace_target!(name, level, tags)`.
///
/// `LevelFilter` is in scope for the level expression. Callers need neither `linkme`
/// nor any import besides the macro.
#[macro_export]
macro_rules! trace_target {
    // one anonymous const per invocation keeps the static names apart
    ($name:expr, $level:expr, $tags:expr) => {
        const _: () = {
            use $crate::LevelFilter;

            #[$crate::__private::linkme::distributed_slice($crate::targets::TRACING_TARGETS)]
            #[linkme(crate = $crate::__private::linkme)]
            static TRACE_TGT: $crate::targets::STarget =
                $crate::targets::STarget::new(module_path!(), $name, $level, $tags);
        };
    };
}
