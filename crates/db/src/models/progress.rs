//! Progress toggle result rows.

use club_core::store::ToggleOutcome;
use sqlx::FromRow;

/// Row counts reported by the single-statement toggle.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ToggleCounts {
    pub removed: i64,
    pub created: i64,
}

impl ToggleCounts {
    /// Neither a delete nor an insert took effect: the insert hit the
    /// unique key of a row committed by a concurrent toggle.
    pub fn outcome(self) -> ToggleOutcome {
        match (self.removed, self.created) {
            (r, _) if r > 0 => ToggleOutcome::Removed,
            (_, c) if c > 0 => ToggleOutcome::Created,
            _ => ToggleOutcome::Contended,
        }
    }
}
