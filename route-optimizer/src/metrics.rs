//! Route metrics: fuel, durations and savings.
//!
//! Everything here is a pure function of [`RouteRecord`]s and a
//! [`FuelConfig`].

use crate::domain::RouteRecord;

/// Default fuel consumption of a small urban delivery van (L/100 km).
pub const DEFAULT_CONSUMPTION_L_PER_100KM: f64 = 8.5;

/// Default diesel price (EUR/L).
pub const DEFAULT_PRICE_PER_LITRE: f64 = 1.50;

/// Vehicle and price parameters for fuel estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelConfig {
    /// Litres burned per 100 km.
    pub consumption_l_per_100km: f64,
    /// Price per litre.
    pub price_per_litre: f64,
}

impl FuelConfig {
    /// Create a config with explicit consumption and price.
    pub fn new(consumption_l_per_100km: f64, price_per_litre: f64) -> Self {
        Self {
            consumption_l_per_100km,
            price_per_litre,
        }
    }

    /// Litres of fuel needed to drive `distance_m` meters.
    pub fn fuel_litres(&self, distance_m: u64) -> f64 {
        distance_m as f64 / 1000.0 / 100.0 * self.consumption_l_per_100km
    }

    /// Fuel cost of driving `distance_m` meters.
    pub fn fuel_cost(&self, distance_m: u64) -> f64 {
        self.fuel_litres(distance_m) * self.price_per_litre
    }
}

impl Default for FuelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONSUMPTION_L_PER_100KM, DEFAULT_PRICE_PER_LITRE)
    }
}

/// Format seconds as `HH:MM`.
///
/// Seconds are truncated, and hours keep counting past 23.
///
/// # Examples
///
/// ```
/// use route_optimizer::metrics::format_duration;
///
/// assert_eq!(format_duration(5400), "01:30");
/// assert_eq!(format_duration(90000), "25:00");
/// ```
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours:02}:{minutes:02}")
}

/// `saved` as a percentage of `baseline`.
///
/// A zero baseline yields 0% rather than dividing by zero.
pub fn percent_saved(saved: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        saved * 100.0 / baseline
    }
}

/// Per-route figures for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    /// Distance in kilometres.
    pub distance_km: f64,
    /// Driving time in seconds.
    pub duration_s: u64,
    /// Fuel burned in litres.
    pub fuel_litres: f64,
    /// Fuel cost.
    pub fuel_cost: f64,
}

impl RouteSummary {
    /// Summarize a route.
    pub fn new(record: &RouteRecord, fuel: &FuelConfig) -> Self {
        Self {
            distance_km: record.distance_m() as f64 / 1000.0,
            duration_s: record.duration_s(),
            fuel_litres: fuel.fuel_litres(record.distance_m()),
            fuel_cost: fuel.fuel_cost(record.distance_m()),
        }
    }
}

/// Differences between a baseline route and an alternative.
///
/// Each delta is `baseline - alternative`: positive values mean the
/// alternative is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteComparison {
    /// Meters saved.
    pub distance_saved_m: i64,
    /// Seconds saved.
    pub time_saved_s: i64,
    /// Fuel cost saved.
    pub fuel_cost_saved: f64,
    baseline_distance_m: u64,
    baseline_duration_s: u64,
    baseline_fuel_cost: f64,
}

impl RouteComparison {
    /// Distance saved as a percentage of the baseline distance.
    pub fn distance_percent(&self) -> f64 {
        percent_saved(
            self.distance_saved_m as f64,
            self.baseline_distance_m as f64,
        )
    }

    /// Time saved as a percentage of the baseline duration.
    pub fn time_percent(&self) -> f64 {
        percent_saved(self.time_saved_s as f64, self.baseline_duration_s as f64)
    }

    /// Fuel cost saved as a percentage of the baseline fuel cost.
    pub fn fuel_cost_percent(&self) -> f64 {
        percent_saved(self.fuel_cost_saved, self.baseline_fuel_cost)
    }
}

/// Compare `alternative` against `baseline`.
pub fn compare(
    baseline: &RouteRecord,
    alternative: &RouteRecord,
    fuel: &FuelConfig,
) -> RouteComparison {
    let baseline_fuel_cost = fuel.fuel_cost(baseline.distance_m());
    RouteComparison {
        distance_saved_m: signed_delta(baseline.distance_m(), alternative.distance_m()),
        time_saved_s: signed_delta(baseline.duration_s(), alternative.duration_s()),
        fuel_cost_saved: baseline_fuel_cost - fuel.fuel_cost(alternative.distance_m()),
        baseline_distance_m: baseline.distance_m(),
        baseline_duration_s: baseline.duration_s(),
        baseline_fuel_cost,
    }
}

fn signed_delta(a: u64, b: u64) -> i64 {
    let a = i64::try_from(a).unwrap_or(i64::MAX);
    let b = i64::try_from(b).unwrap_or(i64::MAX);
    a.saturating_sub(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn record(distance_m: u64, duration_s: u64) -> RouteRecord {
        RouteRecord::new(
            vec!["A".to_string(), "B".to_string()],
            distance_m,
            duration_s,
            None,
        )
    }

    #[test]
    fn fuel_for_ten_km() {
        let fuel = FuelConfig::default();
        assert!((fuel.fuel_litres(10_000) - 0.85).abs() < EPSILON);
        assert!((fuel.fuel_cost(10_000) - 1.275).abs() < EPSILON);
    }

    #[test]
    fn fuel_uses_configured_rates() {
        let fuel = FuelConfig::new(10.0, 2.0);
        assert!((fuel.fuel_litres(50_000) - 5.0).abs() < EPSILON);
        assert!((fuel.fuel_cost(50_000) - 10.0).abs() < EPSILON);
        assert_eq!(fuel.fuel_cost(0), 0.0);
    }

    #[test]
    fn format_duration_examples() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(59), "00:00");
        assert_eq!(format_duration(5400), "01:30");
        assert_eq!(format_duration(5459), "01:30");
        assert_eq!(format_duration(90000), "25:00");
        assert_eq!(format_duration(360_000), "100:00");
    }

    #[test]
    fn savings_example() {
        let comparison = compare(
            &record(15_000, 1800),
            &record(12_000, 1500),
            &FuelConfig::default(),
        );
        assert_eq!(comparison.distance_saved_m, 3000);
        assert_eq!(comparison.time_saved_s, 300);
        assert!((comparison.distance_percent() - 20.0).abs() < EPSILON);
        assert!((comparison.fuel_cost_percent() - 20.0).abs() < EPSILON);
        assert!((comparison.fuel_cost_saved - 0.3825).abs() < EPSILON);
    }

    #[test]
    fn worse_alternative_gives_negative_savings() {
        let comparison = compare(
            &record(10_000, 600),
            &record(11_000, 900),
            &FuelConfig::default(),
        );
        assert_eq!(comparison.distance_saved_m, -1000);
        assert_eq!(comparison.time_saved_s, -300);
        assert!(comparison.fuel_cost_saved < 0.0);
        assert!((comparison.time_percent() + 50.0).abs() < EPSILON);
    }

    #[test]
    fn zero_baseline_reports_zero_percent() {
        let comparison = compare(&record(0, 0), &record(0, 0), &FuelConfig::default());
        assert_eq!(comparison.distance_percent(), 0.0);
        assert_eq!(comparison.time_percent(), 0.0);
        assert_eq!(comparison.fuel_cost_percent(), 0.0);
        assert_eq!(percent_saved(5.0, 0.0), 0.0);
    }

    #[test]
    fn summary_figures() {
        let summary = RouteSummary::new(&record(12_340, 3700), &FuelConfig::default());
        assert!((summary.distance_km - 12.34).abs() < EPSILON);
        assert_eq!(summary.duration_s, 3700);
        assert!((summary.fuel_litres - 1.0489).abs() < EPSILON);
    }

    #[test]
    fn signed_delta_saturates() {
        assert_eq!(signed_delta(u64::MAX, 0), i64::MAX);
        assert_eq!(signed_delta(0, u64::MAX), -i64::MAX);
    }
}
