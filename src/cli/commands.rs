use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::audit::AuditLog;
use crate::cli::args::{Cli, Commands};
use crate::error::{QcError, Result};
use crate::io::resolver::{CsvSeriesResolver, Provenance};
use crate::io::snapshot::CsvSnapshotStore;
use crate::models::params::QcParams;
use crate::models::triplet::Variable;
use crate::qc::bounds::compute_bounds;
use crate::qc::outliers::detect_outliers;
use crate::qc::review::{ReviewLoop, ReviewOutcome, ReviewerPrompt};
use crate::qc::thermal::detect_inconsistencies;
use crate::render::context::ConsoleRenderer;
use crate::utils::constants::{DEFAULT_CONTEXT_WINDOW_DAYS, JOURNAL_FILE};

/// Reads reviewer answers from standard input.
struct StdinPrompt;

impl ReviewerPrompt for StdinPrompt {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::Review {
            input_dir,
            output_dir,
            station,
            period,
            variable,
            lower_percentile,
            upper_percentile,
            iqr_multiplier,
            window_days,
        } => {
            let params = QcParams::new(
                lower_percentile,
                upper_percentile,
                iqr_multiplier,
                window_days,
            )?;
            let variable = parse_variable(&variable)?;
            review(
                &input_dir, &output_dir, &station, &period, variable, params,
            )
        }

        Commands::Audit {
            input_dir,
            output_dir,
            station,
            period,
            lower_percentile,
            upper_percentile,
            iqr_multiplier,
        } => {
            let params = QcParams::new(
                lower_percentile,
                upper_percentile,
                iqr_multiplier,
                DEFAULT_CONTEXT_WINDOW_DAYS,
            )?;
            audit_report(&input_dir, &output_dir, &station, &period, params)
        }

        Commands::History {
            output_dir,
            station,
            date,
        } => history(&output_dir, &station, date),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_variable(name: &str) -> Result<Variable> {
    Variable::from_name(name)
        .filter(Variable::is_thermal)
        .ok_or_else(|| {
            QcError::InvalidFormat(format!(
                "'{name}' is not a reviewable variable (expected tmin, tmean, or tmax)"
            ))
        })
}

fn review(
    input_dir: &Path,
    output_dir: &Path,
    station: &str,
    period: &str,
    variable: Variable,
    params: QcParams,
) -> Result<()> {
    let resolver = CsvSeriesResolver::new(input_dir, output_dir);
    let (mut triplet, sources) = resolver.load_triplet(period, station)?;

    if triplet.get(variable).is_none() {
        return Err(QcError::SeriesNotFound {
            variable: variable.to_string(),
            station: station.to_string(),
        });
    }
    if sources[&variable].provenance == Provenance::Finalized {
        warn!(%variable, station, "series is already finalized; reviewing it again");
    }

    let mut store = CsvSnapshotStore::new(output_dir, station, period);
    for v in Variable::THERMAL {
        if let Some(found) = sources[&v].period.as_deref() {
            store.set_period(v, found);
        }
    }

    let mut audit = AuditLog::open(output_dir.join(JOURNAL_FILE));
    let renderer = ConsoleRenderer::new();
    let mut prompt = StdinPrompt;
    let mut session = ReviewLoop::new(&mut prompt, &mut store, &renderer, params);

    let thermal = session.run_thermal(&mut triplet, &mut audit)?;
    report_outcome("thermal review", thermal);
    if thermal == ReviewOutcome::Deferred {
        return Ok(());
    }

    let statistical = session.run_statistical(&mut triplet, variable, &mut audit)?;
    report_outcome("statistical review", statistical);
    Ok(())
}

fn report_outcome(stage: &str, outcome: ReviewOutcome) {
    match outcome {
        ReviewOutcome::Clean => info!("{stage}: nothing flagged"),
        ReviewOutcome::Completed { decisions } => {
            info!("{stage}: completed with {decisions} decisions")
        }
        ReviewOutcome::Deferred => info!("{stage}: deferred, nothing changed"),
    }
}

/// Read-only pass: print what a review session would flag.
fn audit_report(
    input_dir: &Path,
    output_dir: &Path,
    station: &str,
    period: &str,
    params: QcParams,
) -> Result<()> {
    let resolver = CsvSeriesResolver::new(input_dir, output_dir);
    let (triplet, _sources) = resolver.load_triplet(period, station)?;
    if !triplet.has_thermal_data() {
        return Err(QcError::MissingData(format!(
            "no thermal series found for station {station}"
        )));
    }
    let audit = AuditLog::open(output_dir.join(JOURNAL_FILE));

    let inconsistencies = detect_inconsistencies(
        triplet.tmin.as_ref(),
        triplet.tmean.as_ref(),
        triplet.tmax.as_ref(),
    );
    println!("Station {station}: {} thermal inconsistencies", inconsistencies.len());
    for inc in &inconsistencies {
        println!(
            "  {} {}: tmin={} tmean={} tmax={}",
            inc.date, inc.kind, inc.tmin, inc.tmean, inc.tmax
        );
    }

    for variable in Variable::THERMAL {
        let Some(series) = triplet.get(variable) else {
            continue;
        };
        let bounds = compute_bounds(
            &series.valid_values(),
            params.lower_percentile,
            params.upper_percentile,
            params.iqr_multiplier,
        );
        let outliers = detect_outliers(series, &bounds, &audit, &triplet.station, variable);
        println!(
            "{variable}: {} outliers (bounds {:.1} .. {:.1})",
            outliers.len(),
            bounds.lim_inf,
            bounds.lim_sup
        );
        for outlier in &outliers {
            println!("  {} {variable} = {}", outlier.date, outlier.value);
        }
    }
    Ok(())
}

fn history(output_dir: &Path, station: &str, date: Option<NaiveDate>) -> Result<()> {
    let audit = AuditLog::open(output_dir.join(JOURNAL_FILE));
    let station = station.to_uppercase();
    let entries: Vec<_> = audit
        .query(|e| e.station == station && date.map_or(true, |d| e.date == d))
        .collect();

    if entries.is_empty() {
        println!("No journal entries for station {station}");
        return Ok(());
    }
    for entry in entries {
        let scope = entry
            .variable
            .map_or_else(|| "triplet".to_string(), |v| v.to_string());
        println!(
            "{} {} [{}] action={} {} -> {} ({})",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.date,
            scope,
            entry.action,
            format_values(&entry.values_before),
            format_values(&entry.values_after),
            entry.note
        );
    }
    Ok(())
}

fn format_values(values: &crate::audit::TripletValues) -> String {
    let show = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    format!(
        "[{}/{}/{}]",
        show(values.tmin),
        show(values.tmean),
        show(values.tmax)
    )
}
