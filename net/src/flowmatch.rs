// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Opaque flow match structures.

use std::fmt::Display;

/// The match part of a flow rule, as handed over by the switch-communication layer.
///
/// The contents are not interpreted here: a `FlowMatch` is a fixed-size copy of the wire
/// structure (an OpenFlow 1.0 `ofp_match`), taken once and never modified.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FlowMatch([u8; FlowMatch::LEN]);

/// Error returned when building a [`FlowMatch`] from a slice of the wrong size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("flow match must be {expected} bytes long, got {0}", expected = FlowMatch::LEN)]
pub struct FlowMatchLengthError(pub usize);

impl FlowMatch {
    /// Size of the match structure in bytes.
    pub const LEN: usize = 40;

    /// The match with all bytes zeroed.
    pub const EMPTY: FlowMatch = FlowMatch([0; FlowMatch::LEN]);

    /// Raw bytes of the match.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FlowMatch::LEN] {
        &self.0
    }
}

impl Default for FlowMatch {
    fn default() -> Self {
        FlowMatch::EMPTY
    }
}

impl From<[u8; FlowMatch::LEN]> for FlowMatch {
    fn from(value: [u8; FlowMatch::LEN]) -> Self {
        FlowMatch(value)
    }
}

impl TryFrom<&[u8]> for FlowMatch {
    type Error = FlowMatchLengthError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; FlowMatch::LEN] = value
            .try_into()
            .map_err(|_| FlowMatchLengthError(value.len()))?;
        Ok(FlowMatch(bytes))
    }
}

impl AsRef<[u8]> for FlowMatch {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// matches are mostly zeros: print only up to the last non-zero byte
impl Display for FlowMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.0.iter().rposition(|b| *b != 0).map_or(0, |p| p + 1);
        write!(f, "[")?;
        for byte in &self.0[..used] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "]")
    }
}

impl std::fmt::Debug for FlowMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FlowMatch{self}")
    }
}
