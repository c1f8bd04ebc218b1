use chrono::NaiveDate;

use crate::error::Result;
use crate::models::series::{is_missing, DailySeries};
use crate::models::triplet::{StationTriplet, Variable};

/// The data slice handed to a context renderer: one window of daily rows per
/// panel in fixed 2x2 order (tmax, tmean, tmin, pr), the anomaly date, and
/// the variables implicated by the anomaly for highlighting. The core
/// decides what to render and when; pixels are the renderer's business.
#[derive(Debug, Clone)]
pub struct ContextSlice {
    pub station: String,
    pub date: NaiveDate,
    pub window_days: i64,
    pub implicated: Vec<Variable>,
    pub panels: Vec<(Variable, Vec<(NaiveDate, f64)>)>,
}

impl ContextSlice {
    /// Panel ordering mirrors the review chart layout.
    pub const PANEL_ORDER: [Variable; 4] =
        [Variable::Tmax, Variable::Tmean, Variable::Tmin, Variable::Pr];

    pub fn from_triplet(
        triplet: &StationTriplet,
        date: NaiveDate,
        window_days: i64,
        implicated: &[Variable],
    ) -> Self {
        let panels = Self::PANEL_ORDER
            .iter()
            .map(|variable| {
                let rows = triplet
                    .get(*variable)
                    .map(|series| series.window(date, window_days))
                    .unwrap_or_default();
                (*variable, rows)
            })
            .collect();

        Self {
            station: triplet.station.clone(),
            date,
            window_days,
            implicated: implicated.to_vec(),
            panels,
        }
    }
}

/// Renders the context window around an anomaly for the reviewer.
pub trait ContextRenderer {
    fn render_context(&self, slice: &ContextSlice) -> Result<()>;
}

/// Renders an original-vs-corrected comparison for one variable.
pub trait ComparisonRenderer {
    fn render_comparison(
        &self,
        original: &DailySeries,
        corrected: &DailySeries,
        variable: Variable,
        station: &str,
    ) -> Result<()>;
}

/// Plain-text renderer for terminal review sessions. Prints the windowed
/// rows of each panel and marks the anomaly date and implicated variables.
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self
    }

    fn format_value(value: f64) -> String {
        if is_missing(value) {
            "   --".to_string()
        } else {
            format!("{value:5.1}")
        }
    }
}

impl ContextRenderer for ConsoleRenderer {
    fn render_context(&self, slice: &ContextSlice) -> Result<()> {
        println!(
            "\nContext for {} around {} (±{} days):",
            slice.station, slice.date, slice.window_days
        );
        for (variable, rows) in &slice.panels {
            if rows.is_empty() {
                continue;
            }
            let marker = if slice.implicated.contains(variable) {
                " <-- implicated"
            } else {
                ""
            };
            println!("  {}{}", variable, marker);
            for (date, value) in rows {
                let flag = if *date == slice.date { " *" } else { "" };
                println!("    {}  {}{}", date, Self::format_value(*value), flag);
            }
        }
        Ok(())
    }
}

impl ComparisonRenderer for ConsoleRenderer {
    fn render_comparison(
        &self,
        original: &DailySeries,
        corrected: &DailySeries,
        variable: Variable,
        station: &str,
    ) -> Result<()> {
        println!("\nComparison for {} at {}: original vs corrected", variable, station);
        let mut changed = 0usize;
        for (date, after) in corrected.iter() {
            let before = original.value_or_missing(date);
            if before != after {
                changed += 1;
                println!(
                    "  {}  {} -> {}",
                    date,
                    Self::format_value(before),
                    Self::format_value(after)
                );
            }
        }
        if changed == 0 {
            println!("  no changes");
        }
        Ok(())
    }
}
