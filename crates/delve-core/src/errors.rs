//! Error taxonomy for level generation
//!
//! `Configuration` is fatal and aborts a run before any room exists. Every
//! other variant is recovered where it happens and collected into
//! [`Level::warnings`](crate::dungeon::Level::warnings).

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dungeon::RoomId;

/// Why a room could not be placed during arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementFailure {
    /// Every random origin within the retry budget collided or left the grid
    RetryBudget(u32),
    /// The spaceship spine ran out of room before the exit
    SpineFull,
    /// No spine room exists to hang wing rooms from
    NoWingAnchor,
    /// The wing slot leaves the grid or collides with a placed room
    WingBlocked,
    /// Both wing slots are already taken
    SurplusWing,
}

/// Why a corridor has no (or only a repaired) path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingFailure {
    /// The grid search exhausted its frontier
    NoPath,
    /// The random walk ran out of steps and was finished orthogonally
    StepBudgetExhausted(u32),
    /// One of the rooms has no boundary tile to attach to
    NoAttachment,
}

impl fmt::Display for PlacementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementFailure::RetryBudget(n) => write!(f, "no free origin after {n} attempts"),
            PlacementFailure::SpineFull => f.write_str("spine is full"),
            PlacementFailure::NoWingAnchor => f.write_str("no spine room to anchor wings"),
            PlacementFailure::WingBlocked => f.write_str("wing slot is blocked"),
            PlacementFailure::SurplusWing => f.write_str("more than two wing rooms"),
        }
    }
}

impl fmt::Display for RoutingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingFailure::NoPath => f.write_str("no path through unblocked tiles"),
            RoutingFailure::StepBudgetExhausted(n) => write!(f, "walk exceeded {n} steps"),
            RoutingFailure::NoAttachment => f.write_str("room has no boundary tile"),
        }
    }
}

/// Errors and recoverable events of a generation run
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationError {
    #[error("invalid configuration record '{record}': {reason}")]
    Configuration { record: String, reason: String },

    #[error("weighted pool '{pool}' has zero total weight")]
    EmptyPool { pool: String },

    #[error("room {room} dropped: {reason}")]
    PlacementExhausted { room: RoomId, reason: PlacementFailure },

    #[error("corridor {from} -> {to}: {reason}")]
    RoutingFailed {
        from: RoomId,
        to: RoomId,
        reason: RoutingFailure,
    },

    #[error("room {room}: no free tile for {occupant}")]
    OccupantUnplaced { room: RoomId, occupant: String },

    #[error("room {room} has no geometry; it must be positioned first")]
    GeometryNotInitialized { room: RoomId },
}

impl GenerationError {
    /// Shorthand for a configuration error
    pub fn config(record: impl Into<String>, reason: impl Into<String>) -> Self {
        GenerationError::Configuration {
            record: record.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that abort a whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GenerationError::Configuration { .. } | GenerationError::GeometryNotInitialized { .. }
        )
    }
}

/// Recoverable errors collected during one run
///
/// Every push is logged at warn level before it is stored.
#[derive(Debug, Default)]
pub(crate) struct Warnings {
    errors: Vec<GenerationError>,
}

impl Warnings {
    pub(crate) fn push(&mut self, err: GenerationError) {
        debug_assert!(!err.is_fatal(), "fatal error recorded as warning: {err}");
        tracing::warn!(error = %err, "recovered during generation");
        self.errors.push(err);
    }

    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn into_vec(self) -> Vec<GenerationError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = GenerationError::PlacementExhausted {
            room: RoomId(4),
            reason: PlacementFailure::RetryBudget(100),
        };
        assert_eq!(err.to_string(), "room 4 dropped: no free origin after 100 attempts");

        let err = GenerationError::RoutingFailed {
            from: RoomId(1),
            to: RoomId(2),
            reason: RoutingFailure::StepBudgetExhausted(2000),
        };
        assert_eq!(err.to_string(), "corridor 1 -> 2: walk exceeded 2000 steps");
    }

    #[test]
    fn test_fatality() {
        assert!(GenerationError::config("room-1", "min > max").is_fatal());
        assert!(
            !GenerationError::EmptyPool {
                pool: "enemies".into()
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_warnings_keep_order() {
        let mut warnings = Warnings::default();
        warnings.push(GenerationError::EmptyPool { pool: "a".into() });
        warnings.push(GenerationError::OccupantUnplaced {
            room: RoomId(2),
            occupant: "enemy Bat".into(),
        });
        assert_eq!(warnings.len(), 2);
        let all = warnings.into_vec();
        assert!(matches!(all[0], GenerationError::EmptyPool { .. }));
        assert_eq!(all[1].to_string(), "room 2: no free tile for enemy Bat");
    }
}
