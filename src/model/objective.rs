//! Soft-objective terms added on the optimize-mode retry: per-cohort day
//! span and per-session early/late penalties. Only invoked when the
//! feasibility-only attempt fails.

use super::SessionVars;
use cp_sat::builder::{CpModelBuilder, LinearExpr};
use std::collections::HashMap;

pub fn add_phase_objectives(
    model: &mut CpModelBuilder,
    sessions: &[SessionVars],
    num_days: i64,
    inc_day: i64,
) {
    let mut terms: Vec<LinearExpr> = Vec::new();

    // Day span per (program, year): max(day_vars) - min(day_vars).
    let mut program_year_days: HashMap<(String, i64), Vec<_>> = HashMap::new();
    for s in sessions {
        program_year_days
            .entry((s.program.clone(), s.year))
            .or_default()
            .push(s.day.clone());
    }
    for days in program_year_days.values() {
        if days.len() > 1 {
            let min_day = model.new_int_var(vec![(0, num_days - 1)]);
            let max_day = model.new_int_var(vec![(0, num_days - 1)]);
            model.add_min_equality(min_day.clone(), days.clone());
            model.add_max_equality(max_day.clone(), days.clone());
            let span = model.new_int_var(vec![(0, num_days - 1)]);
            model.add_eq(
                span.clone(),
                LinearExpr::from(max_day) - LinearExpr::from(min_day),
            );
            terms.push(LinearExpr::from(span));
        }
    }

    // Early/late penalties per session.
    for s in sessions {
        let tod = model.new_int_var(vec![(0, inc_day - 1)]);
        model.add_modulo_equality(tod.clone(), s.start.clone(), inc_day);

        let is_early = model.new_bool_var();
        model
            .add_le(LinearExpr::from(tod.clone()), LinearExpr::from(1))
            .only_enforce_if(is_early.clone());
        model
            .add_ge(LinearExpr::from(tod.clone()), LinearExpr::from(2))
            .only_enforce_if(is_early.not());

        let is_late = model.new_bool_var();
        model
            .add_ge(LinearExpr::from(tod.clone()), LinearExpr::from(inc_day - 5))
            .only_enforce_if(is_late.clone());
        model
            .add_le(LinearExpr::from(tod), LinearExpr::from(inc_day - 6))
            .only_enforce_if(is_late.not());

        terms.push(LinearExpr::from(is_early));
        terms.push(LinearExpr::from(is_late));
    }

    if !terms.is_empty() {
        let mut objective = LinearExpr::from(0);
        for t in terms {
            objective = objective + t;
        }
        model.minimize(objective);
    }
}
