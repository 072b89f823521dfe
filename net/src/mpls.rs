// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! MPLS labels.

use core::fmt::Display;
use std::fmt::Formatter;

/// An [MPLS][RFC3032] label.
///
/// A `Label` is a 20-bit value. Attachment points reached through a tunnel carry the label
/// that identifies them; other attachment points carry [`Label::NONE`].
///
/// # Legal values
///
/// * [`Label::NONE`] (`0`) is the "no label" value and the [`Default`]. A label of `0` given
///   explicitly is the same value.
/// * The maximum legal value is <var>2<sup>20</sup> - 1 = 1,048,575 = `0x0F_FF_FF`</var>.
///
/// Use [`Label::new`] to create a `Label` from a `u32`.
///
/// [RFC3032]: https://datatracker.ietf.org/doc/html/rfc3032#section-2.1
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(transparent)]
pub struct Label(u32);

impl Label {
    /// The "no label" value.
    pub const NONE: Label = Label(0);
    /// The maximum legal [`Label`] value (2<sup>20</sup> - 1).
    pub const MAX: u32 = 0x000F_FFFF;

    /// Create a new [`Label`] from a `u32`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidLabel`] error if the value does not fit in 20 bits.
    pub const fn new(label: u32) -> Result<Label, InvalidLabel> {
        if label > Label::MAX {
            Err(InvalidLabel::TooLarge(label))
        } else {
            Ok(Label(label))
        }
    }

    /// Get the value of the [`Label`] as a `u32`.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// True if this is [`Label::NONE`].
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Label::NONE.0
    }
}

/// Errors that can occur when converting a `u32` to a [`Label`]
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InvalidLabel {
    /// The value does not fit in 20 bits.
    #[error("The value {0} is too large to be an MPLS label (max is {MAX})", MAX = Label::MAX)]
    TooLarge(u32),
}

impl From<Label> for u32 {
    fn from(label: Label) -> u32 {
        label.as_u32()
    }
}

impl TryFrom<u32> for Label {
    type Error = InvalidLabel;

    fn try_from(label: u32) -> Result<Label, Self::Error> {
        Label::new(label)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::mpls::Label;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Label {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw: u32 = u.produce::<u32>()? & Label::MAX;
            Some(Label::new(raw).unwrap_or_else(|e| unreachable!("{e:?}")))
        }
    }
}
