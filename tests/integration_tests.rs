use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use station_qc::audit::AuditLog;
use station_qc::error::{QcError, Result};
use station_qc::io::resolver::{CsvSeriesResolver, Provenance, SeriesResolver};
use station_qc::io::snapshot::{read_series, CsvSnapshotStore, SnapshotSink};
use station_qc::models::params::QcParams;
use station_qc::models::triplet::Variable;
use station_qc::qc::review::{ReviewLoop, ReviewOutcome, ReviewerPrompt};
use station_qc::render::context::ConsoleRenderer;

const STATION: &str = "S-12";
const PERIOD: &str = "1990-2000";

struct ScriptedPrompt {
    answers: Vec<String>,
    next: usize,
}

impl ScriptedPrompt {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            next: 0,
        }
    }
}

impl ReviewerPrompt for ScriptedPrompt {
    fn ask(&mut self, _prompt: &str) -> Result<String> {
        let answer = self
            .answers
            .get(self.next)
            .cloned()
            .ok_or_else(|| QcError::Prompt("script exhausted".into()))?;
        self.next += 1;
        Ok(answer)
    }
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
}

fn write_org(dir: &Path, variable: &str, rows: &[(u32, f64)]) {
    let mut body = format!("FECHA,{STATION}\n");
    for (day, value) in rows {
        body.push_str(&format!("202001{day:02},{value}\n"));
    }
    fs::write(
        dir.join(format!("{variable}_{PERIOD}_{STATION}_org.csv")),
        body,
    )
    .unwrap();
}

/// Station fixture: fifteen ordinary days plus one inverted day where the
/// bounds were transposed at digitization.
fn write_inverted_fixture(input: &Path) {
    let mut tmin = Vec::new();
    let mut ts = Vec::new();
    let mut tmax = Vec::new();
    for day in 1..=15 {
        let (lo, hi) = if day == 5 { (9.0, 2.0) } else { (2.0, 9.0) };
        tmin.push((day, lo));
        tmax.push((day, hi));
        ts.push((day, 5.0));
    }
    write_org(input, "tmin", &tmin);
    // legacy spelling of the mean series
    write_org(input, "ts", &ts);
    write_org(input, "tmax", &tmax);
}

fn store_for(output: &Path, sources: &std::collections::HashMap<Variable, station_qc::io::resolver::ResolvedSeries>) -> CsvSnapshotStore {
    let mut store = CsvSnapshotStore::new(output, STATION, PERIOD);
    for v in Variable::THERMAL {
        if let Some(period) = sources[&v].period.as_deref() {
            store.set_period(v, period);
        }
    }
    store
}

#[test]
fn test_full_session_swap_then_finalize() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_inverted_fixture(input.path());

    let resolver = CsvSeriesResolver::new(input.path(), output.path());
    let (mut triplet, sources) = resolver.load_triplet(PERIOD, STATION).unwrap();
    assert_eq!(sources[&Variable::Tmean].provenance, Provenance::Original);

    let mut store = store_for(output.path(), &sources);
    let mut audit = AuditLog::open(output.path().join("changes_applied.json"));
    let renderer = ConsoleRenderer::new();

    // accept the batch, then accept the suggested swap with empty input
    let mut prompt = ScriptedPrompt::new(&["y", ""]);
    let mut session = ReviewLoop::new(&mut prompt, &mut store, &renderer, QcParams::default());
    let outcome = session.run_thermal(&mut triplet, &mut audit).unwrap();
    assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });

    // no outliers left in tmax, so statistical review finalizes directly
    let outcome = session
        .run_statistical(&mut triplet, Variable::Tmax, &mut audit)
        .unwrap();
    assert_eq!(outcome, ReviewOutcome::Clean);

    let qc_path = output
        .path()
        .join(format!("tmax_{PERIOD}_{STATION}_QC.csv"));
    assert!(qc_path.exists());
    assert!(!output
        .path()
        .join(format!("tmax_{PERIOD}_{STATION}_tmp.csv"))
        .exists());
    // the other thermal variables keep their in-progress snapshots
    assert!(output
        .path()
        .join(format!("tmin_{PERIOD}_{STATION}_tmp.csv"))
        .exists());

    let finalized = read_series(&qc_path).unwrap();
    assert_eq!(finalized.get(d(5)), Some(9.0));

    // a fresh resolver prefers the finalized snapshot
    let resolved = resolver.resolve(Variable::Tmax, PERIOD, STATION).unwrap();
    assert_eq!(resolved.provenance, Provenance::Finalized);

    // the journal recorded one swap
    let journal: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.path().join("changes_applied.json")).unwrap())
            .unwrap();
    assert_eq!(journal["swaps"].as_array().unwrap().len(), 1);
    assert_eq!(journal["swaps"][0]["action"], "i");
    assert!(journal["single_changes"].as_array().unwrap().is_empty());
}

#[test]
fn test_correction_snapshots_series_absent_at_load() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    // only the bounds were digitized for this station, no mean series
    let mut tmin = Vec::new();
    let mut tmax = Vec::new();
    for day in 1..=15 {
        let (lo, hi) = if day == 5 { (9.0, 2.0) } else { (2.0, 9.0) };
        tmin.push((day, lo));
        tmax.push((day, hi));
    }
    write_org(input.path(), "tmin", &tmin);
    write_org(input.path(), "tmax", &tmax);

    let resolver = CsvSeriesResolver::new(input.path(), output.path());
    let (mut triplet, sources) = resolver.load_triplet(PERIOD, STATION).unwrap();
    assert!(triplet.get(Variable::Tmean).is_none());

    let mut store = store_for(output.path(), &sources);
    let mut audit = AuditLog::open(output.path().join("changes_applied.json"));
    let renderer = ConsoleRenderer::new();

    // accept the batch, then accept the suggested swap with empty input
    let mut prompt = ScriptedPrompt::new(&["y", ""]);
    let mut session = ReviewLoop::new(&mut prompt, &mut store, &renderer, QcParams::default());
    let outcome = session.run_thermal(&mut triplet, &mut audit).unwrap();
    assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });
    assert_eq!(audit.len(), 1);

    assert_eq!(triplet.get(Variable::Tmax).unwrap().get(d(5)), Some(9.0));

    // the swap materialized a mean series; its snapshot lands under the
    // session period alongside the others
    for variable in ["tmin", "tmean", "tmax"] {
        assert!(output
            .path()
            .join(format!("{variable}_{PERIOD}_{STATION}_tmp.csv"))
            .exists());
    }
}

#[test]
fn test_keep_decision_survives_across_sessions() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    // one date where min and max collapsed to the same value
    let rows: Vec<(u32, f64)> = (1..=10).map(|day| (day, 2.0)).collect();
    let mut tmax: Vec<(u32, f64)> = (1..=10).map(|day| (day, 9.0)).collect();
    tmax[4] = (5, 2.0);
    write_org(input.path(), "tmin", &rows);
    write_org(input.path(), "tmax", &tmax);

    let resolver = CsvSeriesResolver::new(input.path(), output.path());
    let journal_path = output.path().join("changes_applied.json");
    let renderer = ConsoleRenderer::new();

    {
        let (mut triplet, sources) = resolver.load_triplet(PERIOD, STATION).unwrap();
        let mut store = store_for(output.path(), &sources);
        let mut audit = AuditLog::open(&journal_path);
        let mut prompt = ScriptedPrompt::new(&["y", "m"]);
        let mut session =
            ReviewLoop::new(&mut prompt, &mut store, &renderer, QcParams::default());
        let outcome = session.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });
    }

    // second session: same data, fresh journal handle; the keep suppresses
    // the flag so no prompt is needed at all
    let (mut triplet, sources) = resolver.load_triplet(PERIOD, STATION).unwrap();
    let mut store = store_for(output.path(), &sources);
    let mut audit = AuditLog::open(&journal_path);
    let mut prompt = ScriptedPrompt::new(&[]);
    let mut session = ReviewLoop::new(&mut prompt, &mut store, &renderer, QcParams::default());
    let outcome = session.run_thermal(&mut triplet, &mut audit).unwrap();
    assert_eq!(outcome, ReviewOutcome::Clean);
}

#[test]
fn test_outlier_substitution_writes_sentinel_verbatim() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let mut tmax: Vec<(u32, f64)> = (1..=20).map(|day| (day, 9.0 + day as f64 * 0.1)).collect();
    tmax.push((21, 80.0));
    let tmin: Vec<(u32, f64)> = (1..=21).map(|day| (day, 2.0)).collect();
    write_org(input.path(), "tmin", &tmin);
    write_org(input.path(), "tmax", &tmax);

    let resolver = CsvSeriesResolver::new(input.path(), output.path());
    let (mut triplet, sources) = resolver.load_triplet(PERIOD, STATION).unwrap();
    let mut store = store_for(output.path(), &sources);
    let mut audit = AuditLog::open(output.path().join("changes_applied.json"));
    let renderer = ConsoleRenderer::new();

    let mut prompt = ScriptedPrompt::new(&["y", "s"]);
    let mut session = ReviewLoop::new(&mut prompt, &mut store, &renderer, QcParams::default());
    let outcome = session
        .run_statistical(&mut triplet, Variable::Tmax, &mut audit)
        .unwrap();
    assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });

    let qc_path = output
        .path()
        .join(format!("tmax_{PERIOD}_{STATION}_QC.csv"));
    let text = fs::read_to_string(&qc_path).unwrap();
    assert!(text.lines().any(|line| line == "20200121,-99"));

    let journal: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.path().join("changes_applied.json")).unwrap())
            .unwrap();
    let single = &journal["single_changes"];
    assert_eq!(single.as_array().unwrap().len(), 1);
    assert_eq!(single[0]["action"], "s");
    assert_eq!(single[0]["variable"], "tmax");
}

#[test]
fn test_resume_from_interrupted_session() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_inverted_fixture(input.path());

    // first session corrects the inversion but never finalizes
    let resolver = CsvSeriesResolver::new(input.path(), output.path());
    let (mut triplet, sources) = resolver.load_triplet(PERIOD, STATION).unwrap();
    let mut store = store_for(output.path(), &sources);
    let mut audit = AuditLog::open(output.path().join("changes_applied.json"));
    let renderer = ConsoleRenderer::new();
    let mut prompt = ScriptedPrompt::new(&["y", ""]);
    let mut session = ReviewLoop::new(&mut prompt, &mut store, &renderer, QcParams::default());
    session.run_thermal(&mut triplet, &mut audit).unwrap();

    // a new resolver picks up the in-progress state, already corrected
    let (resumed, sources) = resolver.load_triplet(PERIOD, STATION).unwrap();
    assert_eq!(sources[&Variable::Tmax].provenance, Provenance::InProgress);
    assert_eq!(resumed.tmax.as_ref().unwrap().get(d(5)), Some(9.0));
    assert_eq!(resumed.tmin.as_ref().unwrap().get(d(5)), Some(2.0));
}

#[test]
fn test_precipitation_is_reference_only() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_inverted_fixture(input.path());
    write_org(input.path(), "pr", &[(1, 0.0), (2, 12.5)]);

    let resolver = CsvSeriesResolver::new(input.path(), output.path());
    let (triplet, _sources) = resolver.load_triplet(PERIOD, STATION).unwrap();
    assert!(triplet.pr.is_some());

    // the review machinery never finalizes precipitation
    let mut triplet = triplet;
    let mut audit = AuditLog::in_memory();
    let mut store = CsvSnapshotStore::new(output.path(), STATION, PERIOD);
    let renderer = ConsoleRenderer::new();
    let mut prompt = ScriptedPrompt::new(&[]);
    let mut session = ReviewLoop::new(&mut prompt, &mut store, &renderer, QcParams::default());
    let result = session.run_statistical(&mut triplet, Variable::Pr, &mut audit);
    // pr resolves but has no snapshot period registered; finalizing it is
    // rejected rather than silently writing a pr_..._QC.csv
    assert!(result.is_err() || !output.path().join(format!("pr_{PERIOD}_{STATION}_QC.csv")).exists());
}

#[test]
fn test_missing_primary_variable_is_fatal() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_org(input.path(), "tmin", &[(1, 2.0)]);

    let resolver = CsvSeriesResolver::new(input.path(), output.path());
    let (mut triplet, _sources) = resolver.load_triplet(PERIOD, STATION).unwrap();

    let mut audit = AuditLog::in_memory();
    let mut store = CsvSnapshotStore::new(output.path(), STATION, PERIOD);
    let renderer = ConsoleRenderer::new();
    let mut prompt = ScriptedPrompt::new(&[]);
    let mut session = ReviewLoop::new(&mut prompt, &mut store, &renderer, QcParams::default());
    let result = session.run_statistical(&mut triplet, Variable::Tmax, &mut audit);
    assert!(matches!(result, Err(QcError::SeriesNotFound { .. })));
}

#[test]
fn test_deferred_batch_leaves_no_artifacts() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_inverted_fixture(input.path());

    let resolver = CsvSeriesResolver::new(input.path(), output.path());
    let (mut triplet, sources) = resolver.load_triplet(PERIOD, STATION).unwrap();
    let before = triplet.clone();
    let mut store = store_for(output.path(), &sources);
    let mut audit = AuditLog::open(output.path().join("changes_applied.json"));
    let renderer = ConsoleRenderer::new();

    let mut prompt = ScriptedPrompt::new(&["n"]);
    let mut session = ReviewLoop::new(&mut prompt, &mut store, &renderer, QcParams::default());
    let outcome = session.run_thermal(&mut triplet, &mut audit).unwrap();
    assert_eq!(outcome, ReviewOutcome::Deferred);
    assert_eq!(triplet, before);
    assert!(fs::read_dir(output.path()).unwrap().next().is_none());
}
