// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display of the FNS database objects

use crate::endpoint::{Endpoint, EndpointDesc};
use crate::fnsdb::FnsDb;
use crate::rulesdb::RuleStore;
use crate::segment::Segment;
use std::fmt::Display;

const LINE_WIDTH: usize = 81;

pub(crate) struct Heading(pub(crate) String);
impl Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = LINE_WIDTH.saturating_sub(self.0.len() + 2) / 2;
        write!(f, " {0:─<width$}", "─", width = len)?;
        write!(f, " {} ", self.0)?;
        writeln!(f, " {0:─<width$}", "─", width = len)
    }
}

impl Display for EndpointDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sw {} port {} vlan {}", self.switch, self.port, self.vlan)?;
        if !self.label.is_none() {
            write!(f, " label {}", self.label)?;
        }
        Ok(())
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.key(), self.desc())?;
        match self.owner() {
            Some(uuid) => write!(f, " segment {uuid}")?,
            None => write!(f, " unowned")?,
        }
        writeln!(f, " rules: {}", self.installed_count())?;
        for rule in self.installed() {
            writeln!(f, "      {rule}")?;
        }
        Ok(())
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "segment {}", self.uuid())?;
        if let Some(name) = self.name() {
            write!(f, " ({name})")?;
        }
        writeln!(f, " endpoints: {}", self.num_endpoints())?;
        for key in self.iter() {
            writeln!(f, "   {key}")?;
        }
        Ok(())
    }
}

impl Display for RuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut segments: Vec<_> = self.segments().collect();
        segments.sort_by_key(|segment| segment.uuid());
        Heading(format!("Segments ({})", segments.len())).fmt(f)?;
        for segment in segments {
            write!(f, "{segment}")?;
        }

        let mut endpoints: Vec<_> = self.endpoints().collect();
        endpoints.sort_by_key(|endpoint| endpoint.key());
        Heading(format!("Endpoints ({})", endpoints.len())).fmt(f)?;
        for endpoint in endpoints {
            write!(f, " {endpoint}")?;
        }
        Ok(())
    }
}

impl Display for FnsDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.store())?;
        Heading(format!("Locations ({})", self.locator().len())).fmt(f)?;
        write!(f, "{}", self.locator().dump(self.store()))
    }
}
