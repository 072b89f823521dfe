// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Parameters to build an FNS database

use derive_builder::Builder;
use std::fmt::Display;

const DEFAULT_NAME: &str = "fns";
const DEFAULT_ENDPOINT_CAPACITY: usize = 1024;
const DEFAULT_SEGMENT_CAPACITY: usize = 64;
const DEFAULT_LOCATOR_CAPACITY: usize = 4096;

/// Struct to size and name a [`RuleStore`](crate::rulesdb::RuleStore) and its
/// [`Locator`](crate::locator::Locator). N.B we derive a builder type `RuleStoreParamsBuilder`
/// and provide defaults for each field.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct RuleStoreParams {
    #[builder(setter(into), default = DEFAULT_NAME.to_string())]
    pub name: String,

    #[builder(default = DEFAULT_ENDPOINT_CAPACITY)]
    pub endpoint_capacity: usize,

    #[builder(default = DEFAULT_SEGMENT_CAPACITY)]
    pub segment_capacity: usize,

    #[builder(default = DEFAULT_LOCATOR_CAPACITY)]
    pub locator_capacity: usize,
}

impl Default for RuleStoreParams {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            endpoint_capacity: DEFAULT_ENDPOINT_CAPACITY,
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
            locator_capacity: DEFAULT_LOCATOR_CAPACITY,
        }
    }
}

impl Display for RuleStoreParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        writeln!(f, "FNS database config")?;
        writeln!(f, "  name      : {}", self.name)?;
        writeln!(f, "  endpoints : {}", self.endpoint_capacity)?;
        writeln!(f, "  segments  : {}", self.segment_capacity)?;
        writeln!(f, "  locations : {}", self.locator_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = RuleStoreParamsBuilder::default().build().unwrap();
        assert_eq!(built, RuleStoreParams::default());
    }

    #[test]
    fn builder_overrides() {
        let params = RuleStoreParamsBuilder::default()
            .name("lab")
            .endpoint_capacity(8)
            .build()
            .unwrap();
        assert_eq!(params.name, "lab");
        assert_eq!(params.endpoint_capacity, 8);
        assert_eq!(params.segment_capacity, DEFAULT_SEGMENT_CAPACITY);
        assert!(params.to_string().contains("name      : lab"));
    }
}
