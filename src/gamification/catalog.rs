//! Data-driven certification and badge catalogs.
//!
//! Predicates are lists of [`Criterion`] values rather than closures, so a
//! catalog is plain data: it can be built in code, compared, serialized and
//! loaded from TOML. "Earned" is always computed on demand.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::scoring::SustainabilityMetrics;

/// A metric field a criterion can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    EnergySavedKwh,
    AnnualEnergyReduction,
    Co2AvoidedKg,
    TreesSaved,
    WaterSavedLiters,
    RenewablePercentage,
    SelfConsumptionPercentage,
    PeerPercentile,
    DeviceEfficiency,
    CarbonNeutralityProgress,
    EnergyHealthIndex,
    CostSavings,
    StandbyReduction,
    PeakLoadReduction,
    EvEfficiency,
    LightingEfficiency,
    HvacEfficiency,
    ApplianceHealth,
    OverallSustainabilityScore,
}

impl MetricKind {
    /// Reads this field from `metrics`.
    pub fn value(self, metrics: &SustainabilityMetrics) -> f64 {
        match self {
            Self::EnergySavedKwh => metrics.energy_saved_kwh,
            Self::AnnualEnergyReduction => metrics.annual_energy_reduction,
            Self::Co2AvoidedKg => metrics.co2_avoided_kg,
            Self::TreesSaved => metrics.trees_saved,
            Self::WaterSavedLiters => metrics.water_saved_liters,
            Self::RenewablePercentage => metrics.renewable_percentage,
            Self::SelfConsumptionPercentage => metrics.self_consumption_percentage,
            Self::PeerPercentile => metrics.peer_percentile,
            Self::DeviceEfficiency => metrics.device_efficiency,
            Self::CarbonNeutralityProgress => metrics.carbon_neutrality_progress,
            Self::EnergyHealthIndex => metrics.energy_health_index,
            Self::CostSavings => metrics.cost_savings,
            Self::StandbyReduction => metrics.standby_reduction,
            Self::PeakLoadReduction => metrics.peak_load_reduction,
            Self::EvEfficiency => metrics.ev_efficiency,
            Self::LightingEfficiency => metrics.lighting_efficiency,
            Self::HvacEfficiency => metrics.hvac_efficiency,
            Self::ApplianceHealth => metrics.appliance_health,
            Self::OverallSustainabilityScore => metrics.overall_sustainability_score,
        }
    }
}

/// Half-open bound on one metric: `min <= value < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Criterion {
    pub metric: MetricKind,
    pub min: f64,
    /// Exclusive upper bound; open-ended when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Criterion {
    /// `value >= min`.
    pub const fn at_least(metric: MetricKind, min: f64) -> Self {
        Self {
            metric,
            min,
            max: None,
        }
    }

    /// `min <= value < max`.
    pub const fn between(metric: MetricKind, min: f64, max: f64) -> Self {
        Self {
            metric,
            min,
            max: Some(max),
        }
    }

    pub fn holds(&self, metrics: &SustainabilityMetrics) -> bool {
        let value = self.metric.value(metrics);
        value >= self.min && self.max.is_none_or(|max| value < max)
    }
}

fn all_hold(criteria: &[Criterion], metrics: &SustainabilityMetrics) -> bool {
    !criteria.is_empty() && criteria.iter().all(|c| c.holds(metrics))
}

/// A certification tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Tier rank; higher is better.
    pub level: u8,
    pub criteria: Vec<Criterion>,
}

impl Certification {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        level: u8,
        criteria: Vec<Criterion>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            level,
            criteria,
        }
    }

    pub fn is_earned(&self, metrics: &SustainabilityMetrics) -> bool {
        all_hold(&self.criteria, metrics)
    }
}

/// How hard a badge is to get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        };
        f.write_str(name)
    }
}

/// An achievement badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub criteria: Vec<Criterion>,
}

impl Badge {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        rarity: Rarity,
        criteria: Vec<Criterion>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            rarity,
            criteria,
        }
    }

    pub fn is_earned(&self, metrics: &SustainabilityMetrics) -> bool {
        all_hold(&self.criteria, metrics)
    }
}

/// Ordered list of certifications. Declaration order breaks level ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificationCatalog(Vec<Certification>);

impl CertificationCatalog {
    pub fn new(entries: Vec<Certification>) -> Self {
        Self(entries)
    }

    /// The built-in catalog: five energy-reduction tiers plus two
    /// stand-alone certifications.
    pub fn standard() -> Self {
        use MetricKind::{AnnualEnergyReduction, CarbonNeutralityProgress, RenewablePercentage};

        Self(vec![
            Certification::new(
                "bronze",
                "Bronze Saver",
                "Cut consumption by 5-10% against the baseline",
                1,
                vec![Criterion::between(AnnualEnergyReduction, 5.0, 10.0)],
            ),
            Certification::new(
                "silver",
                "Silver Saver",
                "Cut consumption by 10-20% against the baseline",
                2,
                vec![Criterion::between(AnnualEnergyReduction, 10.0, 20.0)],
            ),
            Certification::new(
                "gold",
                "Gold Saver",
                "Cut consumption by 20-35% against the baseline",
                3,
                vec![Criterion::between(AnnualEnergyReduction, 20.0, 35.0)],
            ),
            Certification::new(
                "platinum",
                "Platinum Saver",
                "Cut consumption by 35-50% against the baseline",
                4,
                vec![Criterion::between(AnnualEnergyReduction, 35.0, 50.0)],
            ),
            Certification::new(
                "diamond",
                "Diamond Saver",
                "Cut consumption by half or more",
                5,
                vec![Criterion::at_least(AnnualEnergyReduction, 50.0)],
            ),
            Certification::new(
                "renewable-champion",
                "Renewable Champion",
                "Cover at least 80% of consumption with renewables",
                3,
                vec![Criterion::at_least(RenewablePercentage, 80.0)],
            ),
            Certification::new(
                "carbon-neutral",
                "Carbon Neutral Home",
                "Eliminate grid emissions against the baseline",
                5,
                vec![Criterion::at_least(CarbonNeutralityProgress, 100.0)],
            ),
        ])
    }

    pub fn entries(&self) -> &[Certification] {
        &self.0
    }

    /// Earned entries in declaration order.
    pub fn earned<'a>(&'a self, metrics: &SustainabilityMetrics) -> Vec<&'a Certification> {
        self.0.iter().filter(|c| c.is_earned(metrics)).collect()
    }

    /// Earned entry with the highest level; the first declared wins a tie.
    pub fn highest<'a>(&'a self, metrics: &SustainabilityMetrics) -> Option<&'a Certification> {
        self.0
            .iter()
            .filter(|c| c.is_earned(metrics))
            .fold(None, |best: Option<&Certification>, c| match best {
                Some(b) if b.level >= c.level => Some(b),
                _ => Some(c),
            })
    }
}

impl Default for CertificationCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Ordered list of badges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeCatalog(Vec<Badge>);

impl BadgeCatalog {
    pub fn new(entries: Vec<Badge>) -> Self {
        Self(entries)
    }

    /// The built-in badges. Every criterion is a lower bound, so improving
    /// any metric can only add badges.
    pub fn standard() -> Self {
        use MetricKind::*;
        use Rarity::*;

        Self(vec![
            Badge::new(
                "solar-starter",
                "Solar Starter",
                "25% renewable share",
                Common,
                vec![Criterion::at_least(RenewablePercentage, 25.0)],
            ),
            Badge::new(
                "green-powered",
                "Green Powered",
                "50% renewable share",
                Rare,
                vec![Criterion::at_least(RenewablePercentage, 50.0)],
            ),
            Badge::new(
                "tree-hugger",
                "Tree Hugger",
                "Savings equal to 10 trees",
                Common,
                vec![Criterion::at_least(TreesSaved, 10.0)],
            ),
            Badge::new(
                "water-guardian",
                "Water Guardian",
                "1000 litres of water saved",
                Rare,
                vec![Criterion::at_least(WaterSavedLiters, 1000.0)],
            ),
            Badge::new(
                "carbon-cutter",
                "Carbon Cutter",
                "100 kg of CO2 avoided",
                Rare,
                vec![Criterion::at_least(Co2AvoidedKg, 100.0)],
            ),
            Badge::new(
                "efficiency-expert",
                "Efficiency Expert",
                "Device efficiency of 85 or more",
                Epic,
                vec![Criterion::at_least(DeviceEfficiency, 85.0)],
            ),
            Badge::new(
                "community-leader",
                "Community Leader",
                "Use less than 75% of your peers",
                Epic,
                vec![Criterion::at_least(PeerPercentile, 75.0)],
            ),
            Badge::new(
                "standby-slayer",
                "Standby Slayer",
                "Standby draw down by 30%",
                Common,
                vec![Criterion::at_least(StandbyReduction, 30.0)],
            ),
            Badge::new(
                "peak-shaver",
                "Peak Shaver",
                "Peak load down by 20%",
                Rare,
                vec![Criterion::at_least(PeakLoadReduction, 20.0)],
            ),
            Badge::new(
                "bright-idea",
                "Bright Idea",
                "Lighting efficiency of 90 or more",
                Common,
                vec![Criterion::at_least(LightingEfficiency, 90.0)],
            ),
            Badge::new(
                "ev-champion",
                "EV Champion",
                "EV charging efficiency of 90 or more",
                Legendary,
                vec![Criterion::at_least(EvEfficiency, 90.0)],
            ),
        ])
    }

    pub fn entries(&self) -> &[Badge] {
        &self.0
    }

    pub fn earned<'a>(&'a self, metrics: &SustainabilityMetrics) -> Vec<&'a Badge> {
        self.0.iter().filter(|b| b.is_earned(metrics)).collect()
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Certification and badge catalogs loaded together.
///
/// A TOML file may override either list; a missing list keeps the
/// built-in one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSet {
    pub certifications: CertificationCatalog,
    pub badges: BadgeCatalog,
}

impl CatalogSet {
    /// Parses catalogs from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "catalog".to_string(),
            message: e.to_string(),
        })
    }

    /// Parses catalogs from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scoring.catalog".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks ids are unique and every criterion is well formed.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let certs = self
            .certifications
            .entries()
            .iter()
            .map(|c| (c.id.as_str(), c.criteria.as_slice()));
        check_entries("certifications", certs, &mut errors);

        let badges = self
            .badges
            .entries()
            .iter()
            .map(|b| (b.id.as_str(), b.criteria.as_slice()));
        check_entries("badges", badges, &mut errors);

        errors
    }
}

fn check_entries<'a>(
    section: &str,
    entries: impl Iterator<Item = (&'a str, &'a [Criterion])>,
    errors: &mut Vec<ConfigError>,
) {
    let mut seen = HashSet::new();
    for (id, criteria) in entries {
        if !seen.insert(id) {
            errors.push(ConfigError {
                field: format!("{section}.{id}"),
                message: "duplicate id".into(),
            });
        }
        if criteria.is_empty() {
            errors.push(ConfigError {
                field: format!("{section}.{id}.criteria"),
                message: "must contain at least one criterion".into(),
            });
        }
        for c in criteria {
            if let Some(max) = c.max.filter(|max| *max <= c.min) {
                errors.push(ConfigError {
                    field: format!("{section}.{id}.criteria"),
                    message: format!("max {max} must be > min {}", c.min),
                });
            }
        }
    }
}
