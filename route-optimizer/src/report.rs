//! Human-readable comparison report.

use std::fmt;

use crate::domain::RouteRecord;
use crate::metrics::{FuelConfig, RouteSummary, compare, format_duration};

const RULE: &str = "============================================================";

/// Report comparing the input-order route with the optimized route.
///
/// Rendered through [`fmt::Display`].
#[derive(Debug, Clone)]
pub struct Report<'a> {
    /// Stops as entered, origin first.
    pub inputs: &'a [String],
    /// Route visiting stops in input order.
    pub original: &'a RouteRecord,
    /// Route visiting stops in the provider's order.
    pub optimized: &'a RouteRecord,
    /// Fuel parameters for cost estimates.
    pub fuel: FuelConfig,
    /// Shareable link to the optimized route.
    pub viewer_url: Option<&'a str>,
}

impl Report<'_> {
    fn write_route(
        &self,
        f: &mut fmt::Formatter<'_>,
        title: &str,
        record: &RouteRecord,
    ) -> fmt::Result {
        let summary = RouteSummary::new(record, &self.fuel);

        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "{title}")?;
        writeln!(f, "{RULE}")?;
        write_numbered(f, record.addresses())?;
        writeln!(f)?;
        writeln!(f, "Total Distance:      {:.2} km", summary.distance_km)?;
        writeln!(
            f,
            "Total Time:          {}",
            format_duration(summary.duration_s)
        )?;
        writeln!(f, "Fuel Consumption:    {:.2} L", summary.fuel_litres)?;
        writeln!(f, "Estimated Fuel Cost: €{:.2}", summary.fuel_cost)
    }

    fn write_savings(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let savings = compare(self.original, self.optimized, &self.fuel);
        let time_label = match savings.time_saved_s {
            t if t > 0 => "saved",
            t if t < 0 => "added",
            _ => "unchanged",
        };

        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "SAVINGS")?;
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "Distance Saved:      {:.2} km ({:.1}%)",
            savings.distance_saved_m as f64 / 1000.0,
            savings.distance_percent()
        )?;
        writeln!(
            f,
            "Time Saved:          {} ({time_label})",
            format_duration(savings.time_saved_s.unsigned_abs())
        )?;
        writeln!(
            f,
            "Fuel Cost Saved:     €{:.2} ({:.1}%)",
            savings.fuel_cost_saved,
            savings.fuel_cost_percent()
        )?;
        writeln!(f, "{RULE}")
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input addresses:")?;
        write_numbered(f, self.inputs)?;

        self.write_route(f, "ORIGINAL ROUTE (Input Order)", self.original)?;
        self.write_route(f, "OPTIMIZED ROUTE (Provider Optimized)", self.optimized)?;
        self.write_savings(f)?;

        if let Some(url) = self.viewer_url {
            writeln!(f)?;
            writeln!(f, "{RULE}")?;
            writeln!(f, "MAP LINK (Optimized Route)")?;
            writeln!(f, "{RULE}")?;
            writeln!(f, "Open this link to view the optimized route:")?;
            writeln!(f)?;
            writeln!(f, "{url}")?;
            writeln!(f)?;
            writeln!(f, "{RULE}")?;
        }
        Ok(())
    }
}

fn write_numbered(f: &mut fmt::Formatter<'_>, addresses: &[String]) -> fmt::Result {
    for (i, address) in addresses.iter().enumerate() {
        writeln!(f, "  {}. {address}", i + 1)?;
    }
    Ok(())
}
