use core::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Fixed-width permission bitmask.
///
/// Masks travel as decimal strings so bits above 2^53 survive consumers that
/// parse JSON numbers as doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionMask(u64);

impl PermissionMask {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Exact containment: every bit of `bits` must be present.
    #[must_use]
    pub const fn contains_bits(self, bits: u64) -> bool {
        self.0 & bits == bits
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for PermissionMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for PermissionMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl TryFrom<String> for PermissionMask {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidMask);
        }
        let bits = value.parse::<u64>().map_err(|_| DomainError::InvalidMask)?;
        Ok(Self(bits))
    }
}

impl From<PermissionMask> for String {
    fn from(value: PermissionMask) -> Self {
        value.0.to_string()
    }
}
