//! The candidate-filter pipeline: everything that turns "these solvables
//! all provide what's wanted" into "this is the one (or few) the solver
//! should actually decide on". Individual passes live in their own module;
//! this file wires them into the two entry points callers actually use -
//! [`filter_unwanted`] during solving and [`best_solvables`] for the
//! standalone "what's the best match" pool query.

pub mod arch_prune;
pub mod best_version;
pub mod conda;
pub mod legality;
pub mod obsoletes;
pub mod priority;
pub mod recommends;
pub mod reorder;
pub mod sort_key;
pub mod tarjan;
pub mod update_candidates;

use crate::pool::{Pool, SolvableId};
use crate::solver_state::SolverState;

/// Mirrors `POLICY_MODE_*`. `Choose` runs every pass including the final
/// reordering; `ChooseNoReorder` stops after `prune_to_recommended`;
/// `Recommend` and `Suggest` skip the recommends prune entirely (used while
/// the solver is still deciding what's merely recommended, not required).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Choose,
    ChooseNoReorder,
    Recommend,
    Suggest,
    /// Reorder-only pass used for supplement/enhance candidates - no
    /// pruning, since by definition every entry here already qualifies.
    Supplement,
}

fn filter_unwanted_favored(pool: &Pool, state: &mut SolverState, candidates: &mut Vec<SolvableId>, mode: FilterMode) {
    let mut groups: Vec<(i32, Vec<SolvableId>)> = Vec::new();
    for &c in candidates.iter() {
        let favor = state.favor(c);
        match groups.iter_mut().find(|(f, _)| *f == favor) {
            Some((_, g)) => g.push(c),
            None => groups.push((favor, vec![c])),
        }
    }
    let mut out = Vec::new();
    for (_, mut group) in groups {
        filter_unwanted(pool, state, &mut group, mode);
        out.extend(group);
    }
    *candidates = out;
}

/// Runs the full candidate-narrowing pipeline in place. Mirrors
/// `policy_filter_unwanted`/`policy_filter_unwanted_favored`.
pub fn filter_unwanted(pool: &Pool, state: &mut SolverState, candidates: &mut Vec<SolvableId>, mode: FilterMode) {
    if mode == FilterMode::Supplement {
        reorder::dislike_old_versions(pool, candidates);
        reorder::sort_by_common_dep(pool, candidates);
        if state.flags.urpmreorder {
            reorder::urpm_reorder(pool, state, candidates);
        }
        recommends::prefer_suggested(pool, state, candidates);
        reorder::prefer_favored(state, candidates);
        return;
    }

    if candidates.len() > 1 {
        let mut favors = candidates.iter().map(|&c| state.favor(c));
        let first = favors.next();
        if first.is_some() && favors.any(|f| Some(f) != first) {
            filter_unwanted_favored(pool, state, candidates, mode);
            return;
        }
    }

    if candidates.len() > 1 {
        if mode == FilterMode::Suggest {
            priority::prune_to_highest_prio_per_name(pool, state, candidates);
        } else {
            priority::prune_to_highest_prio_dup_aware(pool, state, candidates);
        }
    }
    if candidates.len() > 1 {
        arch_prune::prune_to_best_arch(pool, candidates);
    }
    if candidates.len() > 1 {
        best_version::prune_to_best_version(pool, candidates);
    }
    if candidates.len() > 1 && matches!(mode, FilterMode::Choose | FilterMode::ChooseNoReorder) {
        recommends::prune_to_recommended(pool, state, candidates);
        if candidates.len() > 1 && mode != FilterMode::ChooseNoReorder {
            reorder::dislike_old_versions(pool, candidates);
            reorder::sort_by_common_dep(pool, candidates);
            reorder::move_installed_to_front(pool, candidates);
            if state.flags.urpmreorder {
                reorder::urpm_reorder(pool, state, candidates);
            }
            recommends::prefer_suggested(pool, state, candidates);
            reorder::prefer_favored(state, candidates);
        }
    }
}

/// Pool-level "what's the best match" query: priority, arch, version, then
/// light reordering, with no recommends/favor logic at all. Mirrors
/// `pool_best_solvables`.
pub fn best_solvables(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    if candidates.len() > 1 {
        priority::prune_to_highest_prio(pool, candidates);
    }
    if candidates.len() > 1 {
        arch_prune::prune_to_best_arch(pool, candidates);
    }
    if candidates.len() > 1 {
        best_version::prune_to_best_version(pool, candidates);
    }
    if candidates.len() > 1 {
        reorder::dislike_old_versions(pool, candidates);
        reorder::sort_by_common_dep(pool, candidates);
        reorder::move_installed_to_front(pool, candidates);
    }
}
