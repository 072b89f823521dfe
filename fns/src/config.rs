// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Static provisioning of an FNS database from a YAML document.
//!
//! ```yaml
//! segments:
//!   - uuid: 100
//!     name: blue
//!     endpoints:
//!       - { switch: 1, port: 2, vlan: 10 }
//!       - { switch: 1, port: 3, vlan: 10, label: 16 }
//! locations:
//!   - mac: "02:00:00:00:00:01"
//!     endpoint: { switch: 1, port: 2, vlan: 10 }
//! ```

use crate::endpoint::EndpointDesc;
use crate::errors::FnsError;
use crate::segment::{SegmentDesc, SegmentId};
use net::eth::mac::Mac;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[allow(unused)]
use tracing::{debug, error};

/// A segment and the endpoints to create in it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentConfig {
    pub uuid: SegmentId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<EndpointDesc>,
}

impl SegmentConfig {
    #[must_use]
    pub fn desc(&self) -> SegmentDesc {
        SegmentDesc {
            uuid: self.uuid,
            name: self.name.clone(),
        }
    }
}

/// A host known to be attached at some endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationConfig {
    pub mac: Mac,
    pub endpoint: EndpointDesc,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FnsConfig {
    #[serde(default)]
    pub segments: Vec<SegmentConfig>,
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

impl FnsConfig {
    /// Parse a config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, FnsError> {
        serde_yaml_ng::from_str(yaml).map_err(|e| FnsError::Config(e.to_string()))
    }

    /// Read and parse a config from a YAML file
    pub fn load(path: &Path) -> Result<Self, FnsError> {
        debug!("Loading FNS config from {}", path.display());
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            error!("Failed to read {}: {e}", path.display());
            FnsError::Config(format!("{}: {e}", path.display()))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Serialize the config as YAML
    pub fn to_yaml(&self) -> Result<String, FnsError> {
        serde_yaml_ng::to_string(self).map_err(|e| FnsError::Config(e.to_string()))
    }
}
