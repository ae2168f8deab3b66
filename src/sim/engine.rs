//! Flow simulator that samples devices, dispatches the battery and settles
//! the household against the grid.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use rand::Rng;
use tracing::{debug, warn};

use crate::config::ScenarioConfig;
use crate::devices::types::{sample_range, validate_hour};
use crate::devices::{
    BaseLoad, Battery, Device, DeviceContext, EvCharger, GasBoiler, HeatPump, SolarPv,
};
use crate::devices::heating::GAS_KWH_PER_M3;
use crate::error::{Error, Result};

use super::clock::DayClock;
use super::power_balance::{settle_grid, split_solar};
use super::tariff::TariffSchedule;
use super::types::{
    BatteryState, ConsumptionBreakdown, EnergyFlowSnapshot, EvState, GasState, GridFlow,
    HeatPumpState, LoadShare, SimConfig, SocModel,
};

/// Household flow simulator owning every device model.
///
/// Holds typed device fields rather than trait objects since the device set
/// is fixed. The simulator itself never changes after construction: battery
/// state is threaded through `previous` and randomness comes from the
/// caller's generator.
#[derive(Debug, Clone)]
pub struct FlowSimulator {
    config: SimConfig,
    load: BaseLoad,
    pv: SolarPv,
    battery: Battery,
    ev: EvCharger,
    heat_pump: HeatPump,
    boiler: GasBoiler,
    tariff: TariffSchedule,
}

impl FlowSimulator {
    /// Creates a new flow simulator.
    ///
    /// # Arguments
    ///
    /// * `config` - Simulator settings
    /// * `load` - Household base load
    /// * `pv` - Solar PV array
    /// * `battery` - Battery storage
    /// * `ev` - EV charger
    /// * `heat_pump` - Electric heat pump
    /// * `boiler` - Gas boiler
    /// * `tariff` - Time-of-use pricing
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        config: SimConfig,
        load: BaseLoad,
        pv: SolarPv,
        battery: Battery,
        ev: EvCharger,
        heat_pump: HeatPump,
        boiler: GasBoiler,
        tariff: TariffSchedule,
    ) -> Self {
        Self {
            config,
            load,
            pv,
            battery,
            ev,
            heat_pump,
            boiler,
            tariff,
        }
    }

    /// Builds a simulator from a validated scenario.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` with the first validation failure.
    pub fn from_scenario(scenario: &ScenarioConfig) -> Result<Self> {
        if let Some(err) = scenario.validate().into_iter().next() {
            return Err(err.into());
        }
        Ok(Self::new(
            scenario.sim_config(),
            scenario.base_load(),
            scenario.solar_pv(),
            scenario.battery(),
            scenario.ev_charger(),
            scenario.heat_pump(),
            scenario.gas_boiler(),
            scenario.tariff_schedule(),
        ))
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Produces the snapshot for the instant `time`.
    ///
    /// Only the hour of `time` drives the model. `previous` is the battery
    /// state of the preceding tick; the sampled SoC model ignores it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the hour is out of range.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        time: DateTime<Utc>,
        previous: Option<&BatteryState>,
        rng: &mut R,
    ) -> Result<EnergyFlowSnapshot> {
        let hour = validate_hour(time.hour())?;
        let ctx = DeviceContext::new(hour);
        let tick_hours = self.config.tick_hours;

        // 1. Sample devices
        let production_kw = self.pv.power_kw(&ctx, rng);
        let base_kw = self.load.power_kw(&ctx, rng);
        let hp = self.heat_pump.sample(hour, rng);
        let ev_kw = self.ev.power_kw(&ctx, rng);
        let gas_flow = self.boiler.sample_flow(hour, rng);
        let consumption_kw = base_kw + hp.power_kw + ev_kw;

        // 2. Battery dispatch
        let soc_before = match self.config.soc_model {
            SocModel::Sampled => {
                let (lo, hi) = self.config.sampled_soc_pct;
                sample_range(rng, lo, hi)
            }
            SocModel::Integrated => previous.map_or(self.config.initial_soc_pct, |b| b.soc_pct),
        };
        let battery_kw = self
            .battery
            .dispatch_kw(production_kw - consumption_kw, soc_before, tick_hours);
        let soc_pct = match self.config.soc_model {
            SocModel::Sampled => soc_before,
            SocModel::Integrated => self.battery.next_soc_pct(soc_before, battery_kw, tick_hours),
        };
        let runtime_load_kw = if battery_kw < 0.0 {
            -battery_kw
        } else {
            consumption_kw
        };

        // 3. Power balance
        let solar = split_solar(production_kw, consumption_kw, battery_kw);
        let (import_kw, export_kw) = settle_grid(production_kw, battery_kw, consumption_kw);
        let (tariff, price) = self.tariff.at(hour);

        let to_shares = |samples: Vec<(String, f64)>| {
            samples
                .into_iter()
                .map(|(name, power_kw)| LoadShare { name, power_kw })
                .collect::<Vec<_>>()
        };

        let snapshot = EnergyFlowSnapshot {
            timestamp: time,
            hour,
            solar,
            battery: BatteryState {
                soc_pct,
                power_kw: battery_kw,
                capacity_kwh: self.battery.capacity_kwh,
                estimated_runtime_minutes: self
                    .battery
                    .estimated_runtime_minutes(soc_pct, runtime_load_kw),
            },
            grid: GridFlow {
                import_kw,
                export_kw,
                current_price_per_kwh: price,
                tariff,
            },
            consumption: ConsumptionBreakdown {
                total_kw: consumption_kw,
                base_kw,
                by_room: to_shares(self.load.sample_rooms(rng)),
                by_device: to_shares(self.load.sample_appliances(rng)),
            },
            ev: EvState {
                charging: ev_kw > 0.0,
                power_kw: ev_kw,
            },
            gas: GasState {
                active: gas_flow > 0.0,
                flow_m3_per_hour: gas_flow,
                power_kw: gas_flow * GAS_KWH_PER_M3,
            },
            heat_pump: HeatPumpState {
                active: hp.active,
                power_kw: hp.power_kw,
                cop: hp.cop,
                heat_output_kw: hp.power_kw * hp.cop,
            },
        };

        debug!(
            hour,
            solar_kw = production_kw,
            load_kw = consumption_kw,
            battery_kw,
            soc_pct,
            import_kw,
            export_kw,
            "simulated tick"
        );
        for violation in snapshot.check_invariants() {
            warn!(hour, %violation, "snapshot invariant violated");
        }

        Ok(snapshot)
    }

    /// Produces the snapshot for `hour` on `date`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `hour > 23`.
    pub fn simulate_hour<R: Rng + ?Sized>(
        &self,
        date: NaiveDate,
        hour: u32,
        previous: Option<&BatteryState>,
        rng: &mut R,
    ) -> Result<EnergyFlowSnapshot> {
        let hour = validate_hour(hour)?;
        let time = date
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| Error::invalid_input("hour", format!("no such time: {hour}:00")))?
            .and_utc();
        self.simulate(time, previous, rng)
    }

    /// Simulates every tick of `date`, threading battery state from one
    /// tick to the next.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`FlowSimulator::simulate`].
    pub fn simulate_day<R: Rng + ?Sized>(
        &self,
        date: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<EnergyFlowSnapshot>> {
        let clock = DayClock::new(date, self.config.tick_hours);
        let mut snapshots: Vec<EnergyFlowSnapshot> = Vec::with_capacity(clock.remaining());
        for time in clock {
            let previous = snapshots.last().map(|s| s.battery);
            snapshots.push(self.simulate(time, previous.as_ref(), rng)?);
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
    }

    fn simulator(soc_model: SocModel) -> FlowSimulator {
        let mut scenario = ScenarioConfig::baseline();
        scenario.simulation.soc_model = soc_model;
        FlowSimulator::from_scenario(&scenario).unwrap()
    }

    #[test]
    fn night_has_no_solar_and_imports() {
        let sim = simulator(SocModel::Sampled);
        let mut rng = StdRng::seed_from_u64(1);
        let s = sim.simulate_hour(date(), 2, None, &mut rng).unwrap();
        assert_eq!(s.solar.production_kw, 0.0);
        assert_eq!(s.grid.export_kw, 0.0);
        // EV charging window
        assert!(s.ev.charging);
        assert!(s.battery.power_kw <= 0.0);
    }

    #[test]
    fn midday_exports_or_charges() {
        let sim = simulator(SocModel::Sampled);
        let mut rng = StdRng::seed_from_u64(2);
        let s = sim.simulate_hour(date(), 13, None, &mut rng).unwrap();
        assert!(s.solar.production_kw >= 3.0);
        assert_eq!(s.grid.import_kw, 0.0);
        assert!(s.battery.power_kw >= 0.0);
        assert!(s.check_invariants().is_empty());
    }

    #[test]
    fn hour_24_is_rejected() {
        let sim = simulator(SocModel::Sampled);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            sim.simulate_hour(date(), 24, None, &mut rng),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn day_has_one_snapshot_per_hour() {
        let sim = simulator(SocModel::Sampled);
        let mut rng = StdRng::seed_from_u64(4);
        let day = sim.simulate_day(date(), &mut rng).unwrap();
        assert_eq!(day.len(), 24);
        for (h, s) in day.iter().enumerate() {
            assert_eq!(s.hour, h as u32);
            assert!(s.check_invariants().is_empty(), "hour {h}: {:?}", s.check_invariants());
        }
    }

    #[test]
    fn consumption_total_adds_components() {
        let sim = simulator(SocModel::Sampled);
        let mut rng = StdRng::seed_from_u64(5);
        let s = sim.simulate_hour(date(), 7, None, &mut rng).unwrap();
        assert_relative_eq!(
            s.consumption.total_kw,
            s.consumption.base_kw + s.heat_pump.power_kw + s.ev.power_kw,
            epsilon = 1e-12
        );
        assert!(s.heat_pump.active);
        assert_relative_eq!(s.gas.power_kw, s.gas.flow_m3_per_hour * GAS_KWH_PER_M3);
        assert_eq!(s.consumption.by_room.len(), 5);
        assert_eq!(s.consumption.by_device.len(), 6);
    }

    #[test]
    fn tariff_follows_the_hour() {
        let sim = simulator(SocModel::Sampled);
        let mut rng = StdRng::seed_from_u64(6);
        let peak = sim.simulate_hour(date(), 18, None, &mut rng).unwrap();
        let night = sim.simulate_hour(date(), 3, None, &mut rng).unwrap();
        assert_eq!(peak.grid.current_price_per_kwh, 0.35);
        assert_eq!(night.grid.current_price_per_kwh, 0.18);
    }

    #[test]
    fn sampled_soc_stays_in_sampling_range() {
        let sim = simulator(SocModel::Sampled);
        let mut rng = StdRng::seed_from_u64(7);
        for s in sim.simulate_day(date(), &mut rng).unwrap() {
            assert!((20.0..95.0).contains(&s.battery.soc_pct));
        }
    }

    #[test]
    fn integrated_soc_starts_from_previous() {
        let sim = simulator(SocModel::Integrated);
        let mut rng = StdRng::seed_from_u64(8);
        let previous = BatteryState {
            soc_pct: 80.0,
            power_kw: 0.0,
            capacity_kwh: 13.5,
            estimated_runtime_minutes: None,
        };
        // night: discharging lowers SoC from the previous value
        let s = sim.simulate_hour(date(), 2, Some(&previous), &mut rng).unwrap();
        assert!(s.battery.power_kw < 0.0);
        assert!(s.battery.soc_pct < 80.0);
    }

    #[test]
    fn runtime_uses_discharge_power() {
        let sim = simulator(SocModel::Integrated);
        let mut rng = StdRng::seed_from_u64(9);
        let s = sim.simulate_hour(date(), 2, None, &mut rng).unwrap();
        let expected = sim
            .battery()
            .estimated_runtime_minutes(s.battery.soc_pct, -s.battery.power_kw);
        assert_eq!(s.battery.estimated_runtime_minutes, expected);
    }

    #[test]
    fn invalid_scenario_is_a_config_error() {
        let mut scenario = ScenarioConfig::baseline();
        scenario.battery.capacity_kwh = 0.0;
        assert!(matches!(
            FlowSimulator::from_scenario(&scenario),
            Err(Error::Config(_))
        ));
    }
}
