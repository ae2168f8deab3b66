//! Certifications, badges, points and levels derived from sustainability
//! metrics.
//!
//! Evaluation is stateless: the same metrics and catalogs always produce
//! the same [`GamificationReport`].

pub mod catalog;
pub mod points;

use std::fmt;

use serde::Serialize;
use tracing::debug;

pub use catalog::{
    Badge, BadgeCatalog, CatalogSet, Certification, CertificationCatalog, Criterion, MetricKind,
    Rarity,
};
pub use points::{Level, Milestone};

use crate::scoring::SustainabilityMetrics;

/// Everything a user has earned for one set of metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamificationReport {
    pub certifications: Vec<Certification>,
    pub highest_certification: Option<Certification>,
    pub badges: Vec<Badge>,
    pub milestones: Vec<Milestone>,
    pub points: u64,
    pub level: Level,
}

/// Earned certification with the highest level; the first declared wins a tie.
pub fn highest_certification<'a>(
    metrics: &SustainabilityMetrics,
    certifications: &'a CertificationCatalog,
) -> Option<&'a Certification> {
    certifications.highest(metrics)
}

/// Evaluates both catalogs against `metrics`.
pub fn evaluate(
    metrics: &SustainabilityMetrics,
    certifications: &CertificationCatalog,
    badges: &BadgeCatalog,
) -> GamificationReport {
    let earned_certs: Vec<Certification> =
        certifications.earned(metrics).into_iter().cloned().collect();
    let earned_badges: Vec<Badge> = badges.earned(metrics).into_iter().cloned().collect();
    let points = points::total_points(metrics, earned_certs.len(), earned_badges.len());
    let level = points::level_for(points);

    debug!(
        certifications = earned_certs.len(),
        badges = earned_badges.len(),
        points,
        level = level.rank,
        "evaluated gamification"
    );

    GamificationReport {
        highest_certification: certifications.highest(metrics).cloned(),
        certifications: earned_certs,
        badges: earned_badges,
        milestones: points::reached_milestones(metrics),
        points,
        level,
    }
}

impl fmt::Display for GamificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Achievements ---")?;
        match &self.highest_certification {
            Some(c) => writeln!(f, "Certification: {} (level {})", c.name, c.level)?,
            None => writeln!(f, "Certification: none")?,
        }
        let names: Vec<&str> = self.badges.iter().map(|b| b.name.as_str()).collect();
        writeln!(f, "Badges ({}): {}", names.len(), names.join(", "))?;
        write!(
            f,
            "Points: {}  Level {} {}",
            self.points, self.level.rank, self.level.title
        )?;
        if let Some(next) = self.level.next_level_points {
            write!(f, " (next at {next})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_metrics() -> SustainabilityMetrics {
        SustainabilityMetrics {
            annual_energy_reduction: 33.3,
            renewable_percentage: 50.0,
            co2_avoided_kg: 142.5,
            trees_saved: 78.7,
            water_saved_liters: 750.0,
            overall_sustainability_score: 55.0,
            ..SustainabilityMetrics::default()
        }
    }

    #[test]
    fn evaluate_collects_everything() {
        let report = evaluate(
            &strong_metrics(),
            &CertificationCatalog::standard(),
            &BadgeCatalog::standard(),
        );
        let certs: Vec<&str> = report.certifications.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(certs, vec!["gold"]);
        assert_eq!(report.highest_certification.as_ref().map(|c| c.level), Some(3));
        // solar-starter, green-powered, tree-hugger, carbon-cutter
        assert_eq!(report.badges.len(), 4);
        // trees 10 + 50, CO2 100
        assert_eq!(report.milestones.len(), 3);
        assert_eq!(report.points, 550 + 100 + 200 + 50 + 150 + 100);
        assert_eq!(report.level.rank, 5);
    }

    #[test]
    fn evaluate_is_idempotent() {
        let certs = CertificationCatalog::standard();
        let badges = BadgeCatalog::standard();
        let m = strong_metrics();
        assert_eq!(evaluate(&m, &certs, &badges), evaluate(&m, &certs, &badges));
    }

    #[test]
    fn empty_catalogs_still_score_points() {
        let report = evaluate(
            &strong_metrics(),
            &CertificationCatalog::new(Vec::new()),
            &BadgeCatalog::new(Vec::new()),
        );
        assert!(report.certifications.is_empty());
        assert!(report.highest_certification.is_none());
        assert_eq!(report.points, 550 + 50 + 150 + 100);
    }

    #[test]
    fn display_names_level() {
        let report = evaluate(
            &SustainabilityMetrics::default(),
            &CertificationCatalog::standard(),
            &BadgeCatalog::standard(),
        );
        let text = report.to_string();
        assert!(text.contains("Certification: none"));
        assert!(text.contains("Level 1 Energy Novice"));
    }
}
