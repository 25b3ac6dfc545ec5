//! Versioned save payload and the persistence boundary.
//!
//! The core only serializes and deserializes; a persistence collaborator
//! owns the storage and applies migrations using the payload's version
//! tag before handing data back. Derived multipliers are
//! deliberately absent from the payload - they are rebuilt by
//! `recalculate_stats` on every load, so stale persisted values can never
//! drift from the upgrade levels that define them.
//!
//! For hosts that want bytes, [`encode`]/[`decode`] wrap the payload in the
//! binary envelope `magic | length | bincode payload | SHA-256 checksum`.

use crate::cars::{car_spec, starter_spec, Car};
use crate::contracts::types::JobContract;
use crate::core::constants::{SAVE_MAGIC, SAVE_VERSION};
use crate::core::ledger::Ledger;
use crate::progression::{level_for_xp, tier_for_level};
use crate::workers::{worker_kind, Worker};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::warn;

/// Fallback worker kind for unrecognized ids in old saves.
const FALLBACK_WORKER_KIND: &str = "apprentice";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save payload is truncated")]
    Truncated,
    #[error("unrecognized save magic")]
    BadMagic,
    #[error("checksum mismatch")]
    ChecksumMismatch,
    #[error("binary codec failed: {0}")]
    Codec(#[from] bincode::Error),
    #[error("json codec failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a run needs to resume, plus a version tag and timestamp for
/// migrations. Derived stats (multipliers, click power, level, tier) are
/// intentionally excluded and recomputed on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// Unix ms when the snapshot was taken; drives offline progress.
    pub saved_at: i64,

    pub currency: u64,
    pub total_earned: u64,
    pub total_spent: u64,
    pub lifetime_earnings: u64,
    pub total_clicks: u64,

    pub upgrades: BTreeMap<String, u32>,
    pub nip_upgrades: BTreeMap<String, u32>,
    pub achievements: BTreeMap<String, i64>,

    pub workers: Vec<Worker>,
    pub current_car: Option<Car>,
    pub car_queue: Vec<Car>,

    pub job_contracts: Vec<JobContract>,
    pub active_contract: Option<JobContract>,
    pub contracts_completed: u32,
    pub contracts_failed: u32,

    pub garage_xp: u64,
    pub unlocked_cars: BTreeSet<String>,
    pub cars_repaired: u64,

    pub prestige_currency: u64,
    pub total_prestige_earned: u64,

    pub session_start: i64,
    pub play_time_seconds: u64,
}

impl Ledger {
    /// Snapshot this ledger into a save payload.
    pub fn to_save(&self, saved_at: i64) -> SaveData {
        SaveData {
            version: SAVE_VERSION,
            saved_at,
            currency: self.currency,
            total_earned: self.total_earned,
            total_spent: self.total_spent,
            lifetime_earnings: self.lifetime_earnings,
            total_clicks: self.total_clicks,
            upgrades: self.upgrades.clone(),
            nip_upgrades: self.nip_upgrades.clone(),
            achievements: self.achievements.clone(),
            workers: self.workers.clone(),
            current_car: self.current_car.clone(),
            car_queue: self.car_queue.iter().cloned().collect(),
            job_contracts: self.job_contracts.clone(),
            active_contract: self.active_contract.clone(),
            contracts_completed: self.contracts_completed,
            contracts_failed: self.contracts_failed,
            garage_xp: self.garage_xp,
            unlocked_cars: self.unlocked_cars.clone(),
            cars_repaired: self.cars_repaired,
            prestige_currency: self.prestige_currency,
            total_prestige_earned: self.total_prestige_earned,
            session_start: self.session_start,
            play_time_seconds: self.play_time_seconds,
        }
    }

    /// Rebuild a ledger from a payload.
    ///
    /// Unknown entity ids fall back to starter types with a warning
    /// instead of aborting the load, and every derived stat is rebuilt
    /// from scratch. Contract reconciliation and the queue consistency
    /// check are the caller's next step (`Game::from_save` does both).
    pub fn from_save(data: SaveData) -> Self {
        if data.version > SAVE_VERSION {
            warn!(
                version = data.version,
                supported = SAVE_VERSION,
                "save payload is newer than this engine, loading anyway"
            );
        }

        let mut state = Ledger::new(data.session_start);
        state.currency = data.currency;
        state.total_earned = data.total_earned;
        state.total_spent = data.total_spent;
        state.lifetime_earnings = data.lifetime_earnings;
        state.total_clicks = data.total_clicks;
        state.upgrades = data.upgrades;
        state.nip_upgrades = data.nip_upgrades;
        state.achievements = data.achievements;

        state.workers = data.workers.into_iter().map(sanitize_worker).collect();
        state.worker_counts = BTreeMap::new();
        for worker in &state.workers {
            *state
                .worker_counts
                .entry(worker.kind_id.clone())
                .or_insert(0) += 1;
        }

        state.current_car = data.current_car.map(sanitize_car);
        state.car_queue = data.car_queue.into_iter().map(sanitize_car).collect();

        state.job_contracts = data.job_contracts;
        state.active_contract = data.active_contract;
        state.contracts_completed = data.contracts_completed;
        state.contracts_failed = data.contracts_failed;

        state.garage_xp = data.garage_xp;
        state.garage_level = level_for_xp(state.garage_xp);
        state.current_tier = tier_for_level(state.garage_level);

        state.unlocked_cars = data
            .unlocked_cars
            .into_iter()
            .filter(|id| {
                let known = car_spec(id).is_some();
                if !known {
                    warn!(car_id = %id, "dropping unknown unlocked car from save");
                }
                known
            })
            .collect();
        state.unlocked_cars.insert(starter_spec().id.to_string());

        state.cars_repaired = data.cars_repaired;
        state.prestige_currency = data.prestige_currency;
        state.total_prestige_earned = data.total_prestige_earned;
        if state.prestige_currency > state.total_prestige_earned {
            warn!("prestige balance exceeds lifetime total in save, clamping");
            state.total_prestige_earned = state.prestige_currency;
        }

        state.play_time_seconds = data.play_time_seconds;

        state.recalculate_stats();
        state
    }
}

fn sanitize_worker(worker: Worker) -> Worker {
    if worker_kind(&worker.kind_id).is_some() {
        worker
    } else {
        warn!(kind_id = %worker.kind_id, "unknown worker kind in save, substituting starter kind");
        Worker {
            kind_id: FALLBACK_WORKER_KIND.to_string(),
            ..worker
        }
    }
}

fn sanitize_car(car: Car) -> Car {
    if car_spec(&car.spec_id).is_some() {
        return car;
    }
    warn!(spec_id = %car.spec_id, "unknown car in save, substituting starter car");
    let mut replacement = Car::from_spec(starter_spec(), 1, 1.0);
    replacement.instance_id = car.instance_id;
    replacement.repair_progress = car.repair_progress.min(replacement.repair_cost);
    replacement.contract = car.contract;
    replacement
}

// ---------------------------------------------------------------------------
// Binary envelope
// ---------------------------------------------------------------------------

/// Byte length of `magic | length` ahead of the payload.
const HEADER_LEN: usize = 8 + 4;
/// Byte length of the trailing SHA-256 checksum.
const CHECKSUM_LEN: usize = 32;

/// Encode a payload as `magic | length | bincode | SHA-256`.
pub fn encode(data: &SaveData) -> Result<Vec<u8>, SaveError> {
    let payload = bincode::serialize(data)?;
    let length = payload.len() as u32;

    let mut hasher = Sha256::new();
    hasher.update(SAVE_MAGIC.to_le_bytes());
    hasher.update(length.to_le_bytes());
    hasher.update(&payload);
    let checksum = hasher.finalize();

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
    out.extend_from_slice(&SAVE_MAGIC.to_le_bytes());
    out.extend_from_slice(&length.to_le_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&checksum);
    Ok(out)
}

/// Decode and verify a binary envelope.
pub fn decode(bytes: &[u8]) -> Result<SaveData, SaveError> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(SaveError::Truncated);
    }

    let magic = u64::from_le_bytes(bytes[0..8].try_into().expect("sliced to 8 bytes"));
    if magic != SAVE_MAGIC {
        return Err(SaveError::BadMagic);
    }

    let length = u32::from_le_bytes(bytes[8..12].try_into().expect("sliced to 4 bytes")) as usize;
    if bytes.len() < HEADER_LEN + length + CHECKSUM_LEN {
        return Err(SaveError::Truncated);
    }

    let payload = &bytes[HEADER_LEN..HEADER_LEN + length];
    let stored_checksum = &bytes[HEADER_LEN + length..HEADER_LEN + length + CHECKSUM_LEN];

    let mut hasher = Sha256::new();
    hasher.update(&bytes[..HEADER_LEN + length]);
    let computed = hasher.finalize();
    if stored_checksum != computed.as_slice() {
        return Err(SaveError::ChecksumMismatch);
    }

    Ok(bincode::deserialize(payload)?)
}

/// Plain-data form for hosts that persist text.
pub fn to_json_string(data: &SaveData) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Parse the plain-data form.
pub fn from_json_str(json: &str) -> Result<SaveData, SaveError> {
    Ok(serde_json::from_str(json)?)
}
