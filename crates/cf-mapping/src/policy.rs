//! What to do with parameters that have no mapping.

use crs_common::{CrsError, CrsResult};
use std::fmt;
use tracing::warn;

/// Direction of a translation, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ProjToCf,
    CfToProj,
}

impl Direction {
    /// Name of the dictionary the unmapped names come from.
    pub fn source(&self) -> &'static str {
        match self {
            Direction::ProjToCf => "PROJ",
            Direction::CfToProj => "CF",
        }
    }

    pub fn target(&self) -> &'static str {
        match self {
            Direction::ProjToCf => "CF",
            Direction::CfToProj => "PROJ",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.source(), self.target())
    }
}

/// Handling of parameters that were dropped by a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedPolicy {
    /// Drop silently.
    #[default]
    Ignore,
    /// Log a warning listing the dropped names; the translation still succeeds.
    Warn,
    /// Fail with [`CrsError::UnmappedParameters`].
    Deny,
}

impl From<bool> for UnmappedPolicy {
    /// `true` is the classic "errcheck" switch: warn about dropped names.
    fn from(errcheck: bool) -> Self {
        if errcheck {
            UnmappedPolicy::Warn
        } else {
            UnmappedPolicy::Ignore
        }
    }
}

impl UnmappedPolicy {
    /// Apply the policy to the names skipped by a translation.
    pub fn check(self, direction: Direction, skipped: &[String]) -> CrsResult<()> {
        if skipped.is_empty() {
            return Ok(());
        }
        match self {
            UnmappedPolicy::Ignore => Ok(()),
            UnmappedPolicy::Warn => {
                warn!(
                    direction = %direction,
                    names = ?skipped,
                    "{} parameters not mapped to {}",
                    direction.source(),
                    direction.target()
                );
                Ok(())
            }
            UnmappedPolicy::Deny => Err(CrsError::UnmappedParameters {
                direction: direction.source().to_string(),
                names: skipped.to_vec(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_errcheck_flag() {
        assert_eq!(UnmappedPolicy::from(true), UnmappedPolicy::Warn);
        assert_eq!(UnmappedPolicy::from(false), UnmappedPolicy::Ignore);
        assert_eq!(UnmappedPolicy::default(), UnmappedPolicy::Ignore);
    }

    #[test]
    fn test_check_policies() {
        let skipped = vec!["zone".to_string()];
        assert!(UnmappedPolicy::Ignore.check(Direction::ProjToCf, &skipped).is_ok());
        assert!(UnmappedPolicy::Warn.check(Direction::ProjToCf, &skipped).is_ok());

        let err = UnmappedPolicy::Deny
            .check(Direction::CfToProj, &skipped)
            .unwrap_err();
        assert_eq!(err.to_string(), "CF parameters not mapped: zone");

        // Nothing skipped: even Deny passes
        assert!(UnmappedPolicy::Deny.check(Direction::CfToProj, &[]).is_ok());
    }
}
