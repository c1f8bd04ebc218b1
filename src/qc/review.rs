use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::audit::AuditLog;
use crate::error::{QcError, Result};
use crate::io::snapshot::SnapshotSink;
use crate::models::action::{CorrectionAction, ManualEdit, StatDecision};
use crate::models::inconsistency::{InconsistencyKind, ThermalInconsistency};
use crate::models::params::QcParams;
use crate::models::series::{is_missing, DailySeries};
use crate::models::triplet::{StationTriplet, Variable};
use crate::qc::bounds::compute_bounds;
use crate::qc::correction::CorrectionEngine;
use crate::qc::outliers::detect_outliers;
use crate::qc::suggest::{suggest_outlier_decision, suggest_thermal_action};
use crate::qc::thermal::{classify_date, detect_inconsistencies};
use crate::render::context::{ComparisonRenderer, ContextRenderer, ContextSlice};

/// Source of reviewer answers. The production implementation reads stdin;
/// tests script the session.
pub trait ReviewerPrompt {
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Nothing was flagged.
    Clean,
    /// The session ran to the end.
    Completed { decisions: usize },
    /// The reviewer declined the whole batch; no state was changed.
    Deferred,
}

const THERMAL_MENU: &str = "  m=keep  i=swap min/max  t=blank mean  u=blank max  l=blank min\n  x=blank mean+bound  e=edit values  s=blank all  r=reorder  p=pass";
const STAT_MENU: &str =
    "  s=substitute missing  m=keep  n=new value  1=blank tmin  2=blank tmax  3=blank tmean  a=blank all";

/// Drives an interactive QC session over one station triplet.
///
/// Thermal review runs to a fixpoint: after every applied correction the
/// triplet is re-scanned, so corrections that introduce a new inconsistency
/// surface immediately. A date whose correction leaves its own
/// inconsistency kind in place is dropped with a warning so the loop always
/// terminates. Statistical review is a single pass per variable.
pub struct ReviewLoop<'a, P, S, R> {
    prompt: &'a mut P,
    sink: &'a mut S,
    renderer: &'a R,
    params: QcParams,
    engine: CorrectionEngine,
}

impl<'a, P, S, R> ReviewLoop<'a, P, S, R>
where
    P: ReviewerPrompt,
    S: SnapshotSink,
    R: ContextRenderer + ComparisonRenderer,
{
    pub fn new(prompt: &'a mut P, sink: &'a mut S, renderer: &'a R, params: QcParams) -> Self {
        Self {
            prompt,
            sink,
            renderer,
            params,
            engine: CorrectionEngine::new(),
        }
    }

    /// Review thermal inconsistencies until none remain. Mutates `triplet`
    /// in place with the accumulated corrections.
    pub fn run_thermal(
        &mut self,
        triplet: &mut StationTriplet,
        audit: &mut AuditLog,
    ) -> Result<ReviewOutcome> {
        let mut passed: HashSet<NaiveDate> = HashSet::new();
        let mut dropped: HashSet<(NaiveDate, InconsistencyKind)> = HashSet::new();

        let pending = self.pending_thermal(triplet, audit, &passed, &dropped);
        if pending.is_empty() {
            info!(station = %triplet.station, "no thermal inconsistencies");
            return Ok(ReviewOutcome::Clean);
        }

        let answer = self.prompt.ask(&format!(
            "{} thermal inconsistencies at {}. Review now? [Y/n] ",
            pending.len(),
            triplet.station
        ))?;
        if answer.trim().eq_ignore_ascii_case("n") {
            info!(station = %triplet.station, "thermal review deferred");
            return Ok(ReviewOutcome::Deferred);
        }

        let mut decisions = 0usize;
        loop {
            let pending = self.pending_thermal(triplet, audit, &passed, &dropped);
            let Some(inc) = pending.into_iter().next() else {
                break;
            };

            // A correction on an earlier date may have fixed this one in
            // passing; trust the current triplet over the stale flag.
            let (tmin, tmean, tmax) = current_values(triplet, inc.date);
            let Some(kind) = classify_date(tmin, tmean, tmax) else {
                continue;
            };

            let slice =
                ContextSlice::from_triplet(triplet, inc.date, self.params.window_days, &kind.implicated());
            self.renderer.render_context(&slice)?;

            let action = self.prompt_thermal_action(&inc, kind, tmin, tmean, tmax)?;
            let Some(action) = action else {
                passed.insert(inc.date);
                continue;
            };

            let note = format!("thermal review: {kind}");
            let updated =
                self.engine
                    .apply_thermal_correction(action, inc.date, triplet, audit, &note)?;
            *triplet = updated;
            decisions += 1;
            self.sink.save_in_progress(triplet)?;

            let (tmin, tmean, tmax) = current_values(triplet, inc.date);
            if classify_date(tmin, tmean, tmax) == Some(kind)
                && !matches!(action, CorrectionAction::Keep)
            {
                warn!(
                    station = %triplet.station,
                    date = %inc.date,
                    %kind,
                    "correction did not resolve the inconsistency, dropping from this session"
                );
                dropped.insert((inc.date, kind));
            }
        }

        Ok(ReviewOutcome::Completed { decisions })
    }

    /// Single-pass statistical review of one variable, finalizing its
    /// snapshot at the end.
    pub fn run_statistical(
        &mut self,
        triplet: &mut StationTriplet,
        variable: Variable,
        audit: &mut AuditLog,
    ) -> Result<ReviewOutcome> {
        let original = triplet
            .get(variable)
            .cloned()
            .ok_or_else(|| QcError::SeriesNotFound {
                variable: variable.to_string(),
                station: triplet.station.clone(),
            })?;

        let bounds = compute_bounds(
            &original.valid_values(),
            self.params.lower_percentile,
            self.params.upper_percentile,
            self.params.iqr_multiplier,
        );
        let outliers = detect_outliers(&original, &bounds, audit, &triplet.station, variable);

        if outliers.is_empty() {
            info!(station = %triplet.station, %variable, "no statistical outliers");
            self.finalize(triplet, variable, &original)?;
            return Ok(ReviewOutcome::Clean);
        }

        let answer = self.prompt.ask(&format!(
            "{} outliers in {} at {} (bounds {:.1} .. {:.1}). Review now? [Y/n] ",
            outliers.len(),
            variable,
            triplet.station,
            bounds.lim_inf,
            bounds.lim_sup
        ))?;
        if answer.trim().eq_ignore_ascii_case("n") {
            info!(station = %triplet.station, %variable, "statistical review deferred");
            return Ok(ReviewOutcome::Deferred);
        }

        let mut decisions = 0usize;
        for outlier in outliers {
            let slice = ContextSlice::from_triplet(
                triplet,
                outlier.date,
                self.params.window_days,
                &[variable],
            );
            self.renderer.render_context(&slice)?;

            let (suggestion, reason) = suggest_outlier_decision(outlier.value, &bounds);
            let answer = self.prompt.ask(&format!(
                "{} {} = {} outside [{:.1}, {:.1}]\n{}\n  suggestion: {} ({}), enter accepts: ",
                outlier.date,
                variable,
                outlier.value,
                bounds.lim_inf,
                bounds.lim_sup,
                STAT_MENU,
                suggestion.code(),
                reason
            ))?;
            let note = format!("statistical review: {variable}");

            match answer.trim().to_lowercase().as_str() {
                "1" | "2" | "3" | "a" => {
                    let action = match answer.trim() {
                        "1" => CorrectionAction::BlankTmin,
                        "2" => CorrectionAction::BlankTmax,
                        "3" => CorrectionAction::BlankTmean,
                        _ => CorrectionAction::BlankAll,
                    };
                    let updated = self.engine.apply_thermal_correction(
                        action,
                        outlier.date,
                        triplet,
                        audit,
                        &note,
                    )?;
                    *triplet = updated;
                }
                text => {
                    let decision = self.parse_stat_decision(text, suggestion)?;
                    let series = triplet
                        .get(variable)
                        .ok_or_else(|| QcError::SeriesNotFound {
                            variable: variable.to_string(),
                            station: triplet.station.clone(),
                        })?;
                    let updated = self.engine.apply_statistical_decision(
                        series,
                        outlier.date,
                        decision,
                        &triplet.station,
                        variable,
                        audit,
                        &note,
                    )?;
                    triplet.set(variable, updated);
                }
            }
            decisions += 1;
            self.sink.save_in_progress(triplet)?;
        }

        let corrected = triplet
            .get(variable)
            .cloned()
            .ok_or_else(|| QcError::SeriesNotFound {
                variable: variable.to_string(),
                station: triplet.station.clone(),
            })?;
        self.renderer
            .render_comparison(&original, &corrected, variable, &triplet.station)?;
        self.finalize(triplet, variable, &corrected)?;
        Ok(ReviewOutcome::Completed { decisions })
    }

    fn finalize(
        &mut self,
        triplet: &StationTriplet,
        variable: Variable,
        series: &DailySeries,
    ) -> Result<()> {
        self.sink.save_finalized(series, variable)?;
        info!(station = %triplet.station, %variable, "series finalized");
        Ok(())
    }

    fn pending_thermal(
        &self,
        triplet: &StationTriplet,
        audit: &AuditLog,
        passed: &HashSet<NaiveDate>,
        dropped: &HashSet<(NaiveDate, InconsistencyKind)>,
    ) -> Vec<ThermalInconsistency> {
        detect_inconsistencies(
            triplet.tmin.as_ref(),
            triplet.tmean.as_ref(),
            triplet.tmax.as_ref(),
        )
        .into_iter()
        .filter(|inc| !passed.contains(&inc.date))
        .filter(|inc| !dropped.contains(&(inc.date, inc.kind)))
        .filter(|inc| !thermal_kept(audit, &triplet.station, inc.date))
        .collect()
    }

    /// Returns `None` when the reviewer passes on the date. Unrecognized
    /// input re-prompts; empty input accepts the suggestion (keep when
    /// there is none).
    fn prompt_thermal_action(
        &mut self,
        inc: &ThermalInconsistency,
        kind: InconsistencyKind,
        tmin: f64,
        tmean: f64,
        tmax: f64,
    ) -> Result<Option<CorrectionAction>> {
        let suggestion = suggest_thermal_action(tmin, tmean, tmax);
        let (default_code, reason) = match &suggestion {
            Some((action, reason)) => (action.code(), *reason),
            None => ("m", "no automatic suggestion"),
        };

        loop {
            let answer = self.prompt.ask(&format!(
                "{} {}: tmin={} tmean={} tmax={}\n{}\n  suggestion: {} ({}), enter accepts: ",
                inc.date, kind, tmin, tmean, tmax, THERMAL_MENU, default_code, reason
            ))?;
            let code = answer.trim();
            if code.eq_ignore_ascii_case("p") {
                return Ok(None);
            }
            let action = if code.is_empty() {
                CorrectionAction::from_code(default_code)
            } else {
                CorrectionAction::from_code(code)
            };
            match action {
                CorrectionAction::Unknown => {
                    warn!(input = code, "unrecognized action");
                }
                CorrectionAction::ManualEdit(_) => {
                    return Ok(Some(CorrectionAction::ManualEdit(self.prompt_manual_edit()?)));
                }
                other => return Ok(Some(other)),
            }
        }
    }

    fn prompt_manual_edit(&mut self) -> Result<ManualEdit> {
        Ok(ManualEdit {
            tmin: self.prompt_value("new tmin (blank keeps current): ")?,
            tmean: self.prompt_value("new tmean (blank keeps current): ")?,
            tmax: self.prompt_value("new tmax (blank keeps current): ")?,
        })
    }

    fn prompt_value(&mut self, label: &str) -> Result<Option<f64>> {
        loop {
            let answer = self.prompt.ask(label)?;
            let text = answer.trim();
            if text.is_empty() {
                return Ok(None);
            }
            match text.parse::<f64>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => warn!(input = text, "not a number"),
            }
        }
    }

    fn parse_stat_decision(&mut self, text: &str, suggestion: StatDecision) -> Result<StatDecision> {
        let decision = match text {
            "" => suggestion,
            "s" => StatDecision::Substitute,
            "m" => StatDecision::Keep,
            "n" => match self.prompt_value("replacement value: ")? {
                Some(value) if is_missing(value) => StatDecision::Substitute,
                Some(value) => StatDecision::NewValue(value),
                None => StatDecision::Keep,
            },
            other => {
                warn!(input = other, "unrecognized decision, keeping value");
                StatDecision::Keep
            }
        };
        Ok(decision)
    }
}

fn current_values(triplet: &StationTriplet, date: NaiveDate) -> (f64, f64, f64) {
    let at = |series: &Option<DailySeries>| {
        series
            .as_ref()
            .map_or(crate::utils::constants::MISSING_SENTINEL, |s| {
                s.value_or_missing(date)
            })
    };
    (at(&triplet.tmin), at(&triplet.tmean), at(&triplet.tmax))
}

fn thermal_kept(audit: &AuditLog, station: &str, date: NaiveDate) -> bool {
    audit
        .query(|e| e.is_keep() && e.station == station && e.date == date && e.variable.is_none())
        .next()
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::context::ConsoleRenderer;
    use pretty_assertions::assert_eq;

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

    #[derive(Default)]
    struct MemorySink {
        in_progress_saves: usize,
        finalized: Vec<Variable>,
    }

    impl SnapshotSink for MemorySink {
        fn save_in_progress(&mut self, _triplet: &StationTriplet) -> Result<()> {
            self.in_progress_saves += 1;
            Ok(())
        }

        fn save_finalized(&mut self, _series: &DailySeries, variable: Variable) -> Result<()> {
            self.finalized.push(variable);
            Ok(())
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
    }

    fn triplet_with(rows: &[(u32, f64, f64, f64)]) -> StationTriplet {
        let mut triplet = StationTriplet::new("S-12");
        triplet.set(
            Variable::Tmin,
            rows.iter().map(|(day, v, _, _)| (d(*day), *v)).collect(),
        );
        triplet.set(
            Variable::Tmean,
            rows.iter().map(|(day, _, v, _)| (d(*day), *v)).collect(),
        );
        triplet.set(
            Variable::Tmax,
            rows.iter().map(|(day, _, _, v)| (d(*day), *v)).collect(),
        );
        triplet
    }

    #[test]
    fn test_clean_triplet_needs_no_prompts() {
        let mut prompt = ScriptedPrompt::new(&[]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut triplet = triplet_with(&[(1, 2.0, 5.0, 9.0)]);
        let mut audit = AuditLog::in_memory();
        let outcome = review.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Clean);
        assert_eq!(sink.in_progress_saves, 0);
    }

    #[test]
    fn test_batch_decline_defers_without_changes() {
        let mut prompt = ScriptedPrompt::new(&["n"]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut triplet = triplet_with(&[(1, 9.0, 5.0, 2.0)]);
        let before = triplet.clone();
        let mut audit = AuditLog::in_memory();
        let outcome = review.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Deferred);
        assert_eq!(triplet, before);
        assert!(audit.is_empty());
    }

    #[test]
    fn test_swap_resolves_inversion_and_persists() {
        // accept batch, then empty input accepts the swap suggestion
        let mut prompt = ScriptedPrompt::new(&["y", ""]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut triplet = triplet_with(&[(1, 9.0, 5.0, 2.0), (2, 1.0, 4.0, 8.0)]);
        let mut audit = AuditLog::in_memory();
        let outcome = review.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });
        assert_eq!(triplet.tmin.as_ref().unwrap().get(d(1)), Some(2.0));
        assert_eq!(triplet.tmax.as_ref().unwrap().get(d(1)), Some(9.0));
        assert_eq!(sink.in_progress_saves, 1);
        assert_eq!(audit.len(), 1);
    }

    #[test]
    fn test_keep_decision_suppresses_reflagging() {
        let mut prompt = ScriptedPrompt::new(&["y", "m"]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut triplet = triplet_with(&[(1, 9.0, 5.0, 2.0)]);
        let mut audit = AuditLog::in_memory();
        let outcome = review.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });
        // values untouched, but the date no longer surfaces
        assert_eq!(triplet.tmax.as_ref().unwrap().get(d(1)), Some(2.0));

        let mut prompt = ScriptedPrompt::new(&[]);
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());
        let outcome = review.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Clean);
    }

    #[test]
    fn test_pass_skips_date_for_the_session() {
        let mut prompt = ScriptedPrompt::new(&["y", "p"]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut triplet = triplet_with(&[(1, 9.0, 5.0, 2.0)]);
        let mut audit = AuditLog::in_memory();
        let outcome = review.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Completed { decisions: 0 });
        assert!(audit.is_empty());
        // passing records nothing, so a later session flags the date again
        assert!(!thermal_kept(&audit, "S-12", d(1)));
    }

    #[test]
    fn test_ineffective_correction_is_force_dropped() {
        // Swap on a date where tmax is missing is a no-op; the inversion
        // tmean > tmax cannot be fixed by it, so the loop must drop the
        // date instead of prompting forever.
        let mut prompt = ScriptedPrompt::new(&["y", "i"]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut triplet = triplet_with(&[(1, -99.0, 5.0, 2.0)]);
        let mut audit = AuditLog::in_memory();
        let outcome = review.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });
    }

    #[test]
    fn test_incidentally_fixed_dates_drop_silently() {
        // Day 1 swap also fixes nothing else; manual edit on day 1 fixes
        // the only inconsistency, so no second prompt is needed.
        let mut prompt = ScriptedPrompt::new(&["y", "e", "1.0", "5.0", "9.0"]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut triplet = triplet_with(&[(1, 9.0, 5.0, 2.0)]);
        let mut audit = AuditLog::in_memory();
        let outcome = review.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });
        assert_eq!(triplet.tmin.as_ref().unwrap().get(d(1)), Some(1.0));
        assert_eq!(triplet.tmax.as_ref().unwrap().get(d(1)), Some(9.0));
    }

    #[test]
    fn test_duplicated_mean_blanked_via_suggestion() {
        // tmean duplicates tmin; the suggested blank-tmean is accepted with
        // empty input and the date stops flagging
        let mut prompt = ScriptedPrompt::new(&["y", ""]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut triplet = triplet_with(&[(1, 5.0, 5.0, 20.0)]);
        let mut audit = AuditLog::in_memory();
        let outcome = review.run_thermal(&mut triplet, &mut audit).unwrap();
        assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });
        assert_eq!(triplet.tmin.as_ref().unwrap().get(d(1)), Some(5.0));
        assert_eq!(triplet.tmean.as_ref().unwrap().get(d(1)), Some(-99.0));
        assert_eq!(triplet.tmax.as_ref().unwrap().get(d(1)), Some(20.0));
        assert!(classify_date(5.0, -99.0, 20.0).is_none());
    }

    #[test]
    fn test_statistical_review_substitutes_and_finalizes() {
        let mut prompt = ScriptedPrompt::new(&["y", "s"]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut rows: Vec<(u32, f64, f64, f64)> = (1..=20)
            .map(|day| (day, 1.0 + day as f64 * 0.1, 5.0, 9.0))
            .collect();
        rows.push((21, 80.0, 5.0, 9.0));
        let mut triplet = triplet_with(&rows);
        let mut audit = AuditLog::in_memory();

        let outcome = review
            .run_statistical(&mut triplet, Variable::Tmin, &mut audit)
            .unwrap();
        assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });
        assert_eq!(triplet.tmin.as_ref().unwrap().get(d(21)), Some(-99.0));
        assert_eq!(sink.finalized, vec![Variable::Tmin]);
        assert_eq!(audit.len(), 1);
    }

    #[test]
    fn test_statistical_clean_series_finalizes_directly() {
        let mut prompt = ScriptedPrompt::new(&[]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let rows: Vec<(u32, f64, f64, f64)> = (1..=20)
            .map(|day| (day, 1.0 + day as f64 * 0.1, 5.0, 9.0))
            .collect();
        let mut triplet = triplet_with(&rows);
        let mut audit = AuditLog::in_memory();

        let outcome = review
            .run_statistical(&mut triplet, Variable::Tmin, &mut audit)
            .unwrap();
        assert_eq!(outcome, ReviewOutcome::Clean);
        assert_eq!(sink.finalized, vec![Variable::Tmin]);
    }

    #[test]
    fn test_statistical_blank_all_routes_through_thermal_engine() {
        let mut prompt = ScriptedPrompt::new(&["y", "a"]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut rows: Vec<(u32, f64, f64, f64)> = (1..=20)
            .map(|day| (day, 1.0 + day as f64 * 0.1, 5.0, 9.0))
            .collect();
        rows.push((21, 80.0, 5.0, 9.0));
        let mut triplet = triplet_with(&rows);
        let mut audit = AuditLog::in_memory();

        let outcome = review
            .run_statistical(&mut triplet, Variable::Tmin, &mut audit)
            .unwrap();
        assert_eq!(outcome, ReviewOutcome::Completed { decisions: 1 });
        assert_eq!(triplet.tmin.as_ref().unwrap().get(d(21)), Some(-99.0));
        assert_eq!(triplet.tmean.as_ref().unwrap().get(d(21)), Some(-99.0));
        assert_eq!(triplet.tmax.as_ref().unwrap().get(d(21)), Some(-99.0));
    }

    #[test]
    fn test_statistical_missing_series_is_fatal() {
        let mut prompt = ScriptedPrompt::new(&[]);
        let mut sink = MemorySink::default();
        let renderer = ConsoleRenderer::new();
        let mut review = ReviewLoop::new(&mut prompt, &mut sink, &renderer, QcParams::default());

        let mut triplet = StationTriplet::new("S-12");
        let mut audit = AuditLog::in_memory();
        let result = review.run_statistical(&mut triplet, Variable::Tmax, &mut audit);
        assert!(matches!(result, Err(QcError::SeriesNotFound { .. })));
    }
}
