//! Game event surface and the bus that delivers it.
//!
//! Every mutating operation announces what happened by emitting a
//! [`GameEvent`]. Events are buffered on the bus and delivered to
//! subscribers by [`EventBus::dispatch`], which the engine calls strictly
//! after the triggering mutation completes. Handlers therefore never
//! observe a mid-mutation ledger. Delivery is fire-and-forget: no handler
//! return value is consumed by the core.

use crate::cars::Car;
use crate::contracts::types::ContractOutcome;
use std::collections::VecDeque;
use uuid::Uuid;

/// A state transition announced by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // -- Currency --
    CurrencyChanged {
        balance: u64,
    },
    CurrencyEarned {
        amount: u64,
    },
    CurrencySpent {
        amount: u64,
        balance: u64,
    },

    // -- Clicks --
    ClickPerformed {
        x: f64,
        y: f64,
        repair_applied: u64,
        combo: f64,
    },

    // -- Cars --
    CarQueued {
        spec_id: String,
        name: String,
    },
    CarStarted {
        spec_id: String,
        name: String,
    },
    CarProgressed {
        progress: f64,
        repair_cost: f64,
    },
    /// The single repair-completion event, carrying the finished car.
    /// Achievements, UI, and audio observe this and nothing else, so
    /// completion is processed exactly once.
    CarRepaired {
        car: Box<Car>,
        payment: u64,
        is_auto_repair: bool,
        payout_bonus: f64,
        contract: Option<ContractOutcome>,
    },

    // -- Shop --
    UpgradePurchased {
        id: String,
        level: u32,
        cost: u64,
    },
    NipUpgradePurchased {
        id: String,
        level: u32,
        cost: u64,
    },
    WorkerHired {
        kind_id: String,
        owned: u32,
        cost: u64,
    },

    // -- Progression --
    XpEarned {
        amount: u64,
        total: u64,
    },
    LevelUp {
        level: u32,
    },
    TierUp {
        tier: u32,
    },
    CarUnlocked {
        spec_id: String,
    },
    AchievementUnlocked {
        id: String,
    },

    // -- Contracts --
    JobBoardUpdated {
        offers: usize,
    },
    ContractAccepted {
        contract_id: Uuid,
    },
    ContractCompleted {
        contract_id: Uuid,
        payment: u64,
    },
    ContractFailed {
        contract_id: Uuid,
    },

    // -- Prestige --
    PrestigeCurrencyChanged {
        balance: u64,
    },

    // -- Lifecycle --
    GameSaved {
        saved_at: i64,
    },
    GameLoaded {
        saved_at: i64,
    },
    GameReset,

    /// Free-text transient UI message ("Not enough cash", ...).
    Notification {
        message: String,
    },
}

/// Discriminant tag for event types, used for filtering in subscribers
/// and assertions in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CurrencyChanged,
    CurrencyEarned,
    CurrencySpent,
    ClickPerformed,
    CarQueued,
    CarStarted,
    CarProgressed,
    CarRepaired,
    UpgradePurchased,
    NipUpgradePurchased,
    WorkerHired,
    XpEarned,
    LevelUp,
    TierUp,
    CarUnlocked,
    AchievementUnlocked,
    JobBoardUpdated,
    ContractAccepted,
    ContractCompleted,
    ContractFailed,
    PrestigeCurrencyChanged,
    GameSaved,
    GameLoaded,
    GameReset,
    Notification,
}

impl GameEvent {
    /// Get the discriminant kind for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::CurrencyChanged { .. } => EventKind::CurrencyChanged,
            GameEvent::CurrencyEarned { .. } => EventKind::CurrencyEarned,
            GameEvent::CurrencySpent { .. } => EventKind::CurrencySpent,
            GameEvent::ClickPerformed { .. } => EventKind::ClickPerformed,
            GameEvent::CarQueued { .. } => EventKind::CarQueued,
            GameEvent::CarStarted { .. } => EventKind::CarStarted,
            GameEvent::CarProgressed { .. } => EventKind::CarProgressed,
            GameEvent::CarRepaired { .. } => EventKind::CarRepaired,
            GameEvent::UpgradePurchased { .. } => EventKind::UpgradePurchased,
            GameEvent::NipUpgradePurchased { .. } => EventKind::NipUpgradePurchased,
            GameEvent::WorkerHired { .. } => EventKind::WorkerHired,
            GameEvent::XpEarned { .. } => EventKind::XpEarned,
            GameEvent::LevelUp { .. } => EventKind::LevelUp,
            GameEvent::TierUp { .. } => EventKind::TierUp,
            GameEvent::CarUnlocked { .. } => EventKind::CarUnlocked,
            GameEvent::AchievementUnlocked { .. } => EventKind::AchievementUnlocked,
            GameEvent::JobBoardUpdated { .. } => EventKind::JobBoardUpdated,
            GameEvent::ContractAccepted { .. } => EventKind::ContractAccepted,
            GameEvent::ContractCompleted { .. } => EventKind::ContractCompleted,
            GameEvent::ContractFailed { .. } => EventKind::ContractFailed,
            GameEvent::PrestigeCurrencyChanged { .. } => EventKind::PrestigeCurrencyChanged,
            GameEvent::GameSaved { .. } => EventKind::GameSaved,
            GameEvent::GameLoaded { .. } => EventKind::GameLoaded,
            GameEvent::GameReset => EventKind::GameReset,
            GameEvent::Notification { .. } => EventKind::Notification,
        }
    }
}

/// A fire-and-forget event listener.
pub type Listener = Box<dyn FnMut(&GameEvent)>;

/// Buffered publish/subscribe channel shared by every engine component.
///
/// Constructed explicitly and passed by reference into the mutators that
/// emit; there is no hidden global. Emission only pushes onto the queue;
/// [`EventBus::dispatch`] delivers in emission order.
#[derive(Default)]
pub struct EventBus {
    queue: VecDeque<GameEvent>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("queued", &self.queue.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer an event for the next dispatch.
    pub fn emit(&mut self, event: GameEvent) {
        self.queue.push_back(event);
    }

    /// Register a listener. Listeners are called in registration order.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Deliver every buffered event to every listener, oldest first,
    /// then clear the buffer.
    pub fn dispatch(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            for listener in &mut self.listeners {
                listener(&event);
            }
        }
    }

    /// Number of events waiting for delivery.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drain buffered events without delivering them to listeners.
    /// Used by hosts that poll instead of subscribing.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.queue.drain(..).collect()
    }
}
