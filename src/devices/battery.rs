/// A home battery that absorbs solar surplus and covers deficits.
///
/// `Battery` is a stateless description: state of charge is passed in by the
/// caller, which lets the simulator either sample it per tick or thread it
/// between ticks.
///
/// # Power Flow Convention
/// - Positive power: Charging (absorbing surplus)
/// - Negative power: Discharging (supplying the house)
#[derive(Debug, Clone)]
pub struct Battery {
    /// Battery capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Maximum charge power in kilowatts (positive value).
    pub max_charge_kw: f64,

    /// Maximum discharge power in kilowatts (positive value).
    pub max_discharge_kw: f64,

    /// Charging efficiency (0..1.0).
    pub eta_c: f64,

    /// Discharging efficiency (0..1.0).
    pub eta_d: f64,
}

impl Battery {
    /// Creates a new battery with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Battery capacity in kWh (must be > 0)
    /// * `max_charge_kw` - Maximum charging power in kW
    /// * `max_discharge_kw` - Maximum discharging power in kW
    /// * `eta_c` - Charging efficiency (0..1.0)
    /// * `eta_d` - Discharging efficiency (0..1.0)
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero/negative, rates are negative, or efficiencies invalid.
    pub fn new(
        capacity_kwh: f64,
        max_charge_kw: f64,
        max_discharge_kw: f64,
        eta_c: f64,
        eta_d: f64,
    ) -> Self {
        assert!(capacity_kwh > 0.0);
        assert!(max_charge_kw >= 0.0 && max_discharge_kw >= 0.0);
        assert!(eta_c > 0.0 && eta_c <= 1.0);
        assert!(eta_d > 0.0 && eta_d <= 1.0);

        Self {
            capacity_kwh,
            max_charge_kw,
            max_discharge_kw,
            eta_c,
            eta_d,
        }
    }

    /// Energy currently stored (kWh) at `soc_pct`.
    pub fn stored_kwh(&self, soc_pct: f64) -> f64 {
        self.capacity_kwh * soc_pct.clamp(0.0, 100.0) / 100.0
    }

    /// Decides battery power for one tick from the household balance.
    ///
    /// # Arguments
    ///
    /// * `surplus_kw` - Solar production minus consumption (kW, signed)
    /// * `soc_pct` - State of charge before the tick (0-100)
    /// * `tick_hours` - Tick duration used to bound power by stored energy
    ///
    /// # Returns
    ///
    /// Positive power when charging from surplus, negative when covering a
    /// deficit, `0.0` when balanced. Never exceeds the surplus or deficit.
    pub fn dispatch_kw(&self, surplus_kw: f64, soc_pct: f64, tick_hours: f64) -> f64 {
        let soc = soc_pct.clamp(0.0, 100.0) / 100.0;
        let dt = tick_hours.max(f64::EPSILON);

        if surplus_kw > 0.0 {
            // Charging: limit by rate and free capacity
            let headroom_kw = (1.0 - soc) * self.capacity_kwh / self.eta_c / dt;
            surplus_kw.min(self.max_charge_kw).min(headroom_kw.max(0.0))
        } else if surplus_kw < 0.0 {
            // Discharging: limit by rate and stored energy
            let available_kw = soc * self.capacity_kwh * self.eta_d / dt;
            -(-surplus_kw).min(self.max_discharge_kw).min(available_kw.max(0.0))
        } else {
            0.0
        }
    }

    /// Integrates `power_kw` over `tick_hours` and returns the new SoC (%).
    pub fn next_soc_pct(&self, soc_pct: f64, power_kw: f64, tick_hours: f64) -> f64 {
        let delta_kwh = if power_kw >= 0.0 {
            power_kw * tick_hours * self.eta_c
        } else {
            power_kw * tick_hours / self.eta_d
        };
        (soc_pct + 100.0 * delta_kwh / self.capacity_kwh).clamp(0.0, 100.0)
    }

    /// Minutes the stored energy would last at `load_kw`; `None` with no load.
    pub fn estimated_runtime_minutes(&self, soc_pct: f64, load_kw: f64) -> Option<f64> {
        if load_kw <= 0.0 {
            return None;
        }
        Some(self.stored_kwh(soc_pct) * self.eta_d / load_kw * 60.0)
    }
}
