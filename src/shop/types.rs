/// What one level of an upgrade does. Effect application is driven by this
/// enum, never by upgrade identity, so every effect kind is handled
/// exhaustively at compile time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    /// Adds flat click power.
    ClickPowerAdd(f64),
    /// Adds to the additive car-value bonus.
    CarValueBonus(f64),
    /// Multiplies all currency income.
    IncomeMultiplier(f64),
    /// Multiplies click power.
    ClickPowerMultiplier(f64),
    /// Multiplies worker auto-repair throughput.
    AutoRepairMultiplier(f64),
    /// Raises the combo multiplier cap.
    ComboMaxAdd(f64),
    /// Raises the combo gained per click.
    ComboGainAdd(f64),
    /// Multiplies the car spawn interval (values < 1 spawn faster, floored
    /// at a minimum interval).
    SpawnIntervalMultiplier(f64),
    /// Multiplies all XP gains.
    XpMultiplier(f64),
}

/// Static shop entry. Cost at level L is `floor(base_cost * cost_growth^L)`.
#[derive(Debug, Clone, Copy)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: u64,
    pub cost_growth: f64,
    pub max_level: u32,
    pub effect: UpgradeEffect,
}
