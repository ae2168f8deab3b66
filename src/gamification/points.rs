//! Points and level derivation.

use serde::Serialize;

use super::catalog::MetricKind;
use crate::scoring::SustainabilityMetrics;

/// Points per earned certification.
pub const POINTS_PER_CERTIFICATION: u64 = 100;
/// Points per earned badge.
pub const POINTS_PER_BADGE: u64 = 50;

/// A one-off bonus for crossing a metric threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Milestone {
    pub metric: MetricKind,
    pub threshold: f64,
    pub bonus: u64,
}

const fn milestone(metric: MetricKind, threshold: f64, bonus: u64) -> Milestone {
    Milestone {
        metric,
        threshold,
        bonus,
    }
}

/// Bonus thresholds. Bonuses for the same metric accumulate.
pub const MILESTONES: [Milestone; 7] = [
    milestone(MetricKind::TreesSaved, 10.0, 50),
    milestone(MetricKind::TreesSaved, 50.0, 150),
    milestone(MetricKind::TreesSaved, 100.0, 300),
    milestone(MetricKind::WaterSavedLiters, 1000.0, 50),
    milestone(MetricKind::WaterSavedLiters, 5000.0, 150),
    milestone(MetricKind::Co2AvoidedKg, 100.0, 100),
    milestone(MetricKind::Co2AvoidedKg, 500.0, 250),
];

/// Milestones reached by `metrics`, in table order.
pub fn reached_milestones(metrics: &SustainabilityMetrics) -> Vec<Milestone> {
    MILESTONES
        .iter()
        .filter(|m| m.metric.value(metrics) >= m.threshold)
        .copied()
        .collect()
}

/// Total points:
/// `round(overall × 10) + 100 × certifications + 50 × badges + milestone bonuses`.
pub fn total_points(
    metrics: &SustainabilityMetrics,
    certifications: usize,
    badges: usize,
) -> u64 {
    let score = (metrics.overall_sustainability_score.clamp(0.0, 100.0) * 10.0).round() as u64;
    let bonus: u64 = reached_milestones(metrics).iter().map(|m| m.bonus).sum();
    score
        + POINTS_PER_CERTIFICATION * certifications as u64
        + POINTS_PER_BADGE * badges as u64
        + bonus
}

/// Level band floors and titles, ascending.
pub const LEVEL_BANDS: [(u64, &str); 10] = [
    (0, "Energy Novice"),
    (100, "Power Saver"),
    (250, "Eco Apprentice"),
    (500, "Green Guardian"),
    (1000, "Efficiency Expert"),
    (2000, "Sustainability Star"),
    (3500, "Climate Champion"),
    (5000, "Planet Protector"),
    (7500, "Eco Legend"),
    (10000, "Energy Master"),
];

/// Position on the level ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Level {
    /// 1-based rank.
    pub rank: u32,
    pub title: String,
    pub min_points: u64,
    /// Floor of the next band; `None` at the top.
    pub next_level_points: Option<u64>,
}

/// Level reached with `points`.
pub fn level_for(points: u64) -> Level {
    let idx = LEVEL_BANDS
        .iter()
        .rposition(|(floor, _)| points >= *floor)
        .unwrap_or(0);
    let (min_points, title) = LEVEL_BANDS[idx];
    Level {
        rank: idx as u32 + 1,
        title: title.to_string(),
        min_points,
        next_level_points: LEVEL_BANDS.get(idx + 1).map(|(floor, _)| *floor),
    }
}
