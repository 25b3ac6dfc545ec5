use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contract metadata carried on a spawned car. The repair path reads this
/// to decide payout scaling and bonus XP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTag {
    pub contract_id: Uuid,
    pub payout_multiplier: f64,
    pub bonus_xp: u64,
    /// Deadline in unix milliseconds.
    pub expires_at: i64,
    /// Set once the deadline passes; a late finish earns no bonus.
    pub expired: bool,
}

/// A job offer, and after acceptance the single active contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobContract {
    pub id: Uuid,
    /// Catalog id of the car this job is for.
    pub car_id: String,
    /// Scales the spawned car's repair cost.
    pub repair_multiplier: f64,
    /// Scales the payout when finished before the deadline.
    pub payout_multiplier: f64,
    /// Flat XP bonus on on-time completion.
    pub bonus_xp: u64,
    pub duration_ms: i64,
    /// Unix ms when the offer was generated.
    pub created_at: i64,
    /// Unix ms when the offer was accepted. `None` while still an offer.
    pub accepted_at: Option<i64>,
    /// Deadline, stamped at acceptance.
    pub expires_at: Option<i64>,
}

impl JobContract {
    /// True once accepted and past the deadline.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at.map(|t| now_ms > t).unwrap_or(false)
    }
}

/// How a contract-tagged repair resolved, carried on the car-repaired event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractOutcome {
    /// Finished before the deadline; payout and bonus XP applied.
    Completed,
    /// Finished after the deadline; base payment only.
    FailedLate,
}

/// Result of an accept-contract command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptResult {
    pub ok: bool,
    pub message: Option<String>,
}

impl AcceptResult {
    pub fn ok() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}
