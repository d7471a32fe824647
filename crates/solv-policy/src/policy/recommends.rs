//! Recommend/suggest tracking (C6): incrementally mirror which solvables are
//! pulled in by a `recommends`/`suggests` dependency as decisions accumulate,
//! including the postponed-cache path for complex (boolean) dependencies.

use crate::pool::cplxdeps::{self, CplxDep, DepBlock};
use crate::pool::{Pool, SolvableId};
use crate::solver_state::{PostponedCplxDeps, SolverState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Recommends,
    Suggests,
}

fn mark(state: &mut SolverState, target: Target, id: SolvableId) {
    match target {
        Target::Recommends => state.mark_recommended(id),
        Target::Suggests => state.mark_suggested(id),
    }
}

fn cplxq_mut(state: &mut SolverState, target: Target) -> &mut PostponedCplxDeps {
    match target {
        Target::Recommends => &mut state.recommendscplxq,
        Target::Suggests => &mut state.suggestscplxq,
    }
}

fn might_involve(state: &SolverState, target: Target, id: SolvableId) -> bool {
    match target {
        Target::Recommends => state.recommendscplxq.might_involve(id),
        Target::Suggests => state.suggestscplxq.might_involve(id),
    }
}

enum BlockOutcome {
    /// Every negative literal (the `if` guards) is decided true - the
    /// positive literals become relevant.
    Resolve,
    /// Nothing decided yet that would settle this block either way.
    Postpone,
    /// A negative literal is decided false, so the block is vacuously
    /// satisfied via its own guard - there's nothing left to recommend.
    Vacuous,
}

fn evaluate_block(state: &SolverState, block: &DepBlock) -> BlockOutcome {
    let mut undecided = false;
    for &neg in &block.negative {
        match state.decision(neg) {
            Some(false) => return BlockOutcome::Vacuous,
            Some(true) => continue,
            None => undecided = true,
        }
    }
    if undecided {
        BlockOutcome::Postpone
    } else {
        BlockOutcome::Resolve
    }
}

/// Normalizes `expr` and immediately resolves every block it can, parking
/// the rest in the owner's postponed-cache entry. Mirrors `check_complex_dep`.
fn check_complex_dep(state: &mut SolverState, owner: SolvableId, expr: &CplxDep, target: Target) {
    let blocks = match cplxdeps::normalize(expr) {
        Ok(blocks) => blocks,
        Err(err) => {
            log::warn!("skipping unsupported complex dependency on {owner:?}: {err}");
            return;
        }
    };

    let mut pending = Vec::new();
    let mut resolved = Vec::new();
    for block in blocks {
        match evaluate_block(state, &block) {
            BlockOutcome::Resolve => resolved.extend(block.positive.iter().copied()),
            BlockOutcome::Vacuous => {}
            BlockOutcome::Postpone => pending.push(block),
        }
    }
    for id in resolved {
        mark(state, target, id);
    }
    if !pending.is_empty() {
        cplxq_mut(state, target).push(owner, pending);
    }
}

/// Re-evaluates every postponed block now that `changed` has a new decision,
/// dropping anything that resolves or goes vacuous and re-parking the rest.
/// Mirrors `recheck_complex_deps`.
fn recheck_postponed(state: &mut SolverState, target: Target, changed: SolvableId) {
    if !might_involve(state, target, changed) {
        return;
    }
    let entries = cplxq_mut(state, target).take();
    let mut resolved = Vec::new();
    let mut rebuilt = Vec::new();
    for (owner, blocks) in entries {
        let mut pending = Vec::new();
        for block in blocks {
            match evaluate_block(state, &block) {
                BlockOutcome::Resolve => resolved.extend(block.positive.iter().copied()),
                BlockOutcome::Vacuous => {}
                BlockOutcome::Postpone => pending.push(block),
            }
        }
        if !pending.is_empty() {
            rebuilt.push((owner, pending));
        }
    }
    for (owner, blocks) in rebuilt {
        cplxq_mut(state, target).push(owner, blocks);
    }
    for id in resolved {
        mark(state, target, id);
    }
}

/// Walks every decision made since the last call, folding newly-reachable
/// `recommends`/`suggests` targets into `recommendsmap`/`suggestsmap`.
/// Mirrors `policy_update_recommendsmap`.
pub fn update_recommendsmap(pool: &Pool, state: &mut SolverState) {
    while state.recommends_index < state.decisionq.len() {
        let decision = state.decisionq[state.recommends_index];
        state.recommends_index += 1;
        if !decision.value {
            continue;
        }
        let p = decision.solvable;

        recheck_postponed(state, Target::Recommends, p);
        recheck_postponed(state, Target::Suggests, p);

        let Ok(s) = pool.solvable(p) else { continue };
        let recommends = s.recommends.clone();
        let complex_recommends = s.complex_recommends.clone();
        let suggests = s.suggests.clone();
        let complex_suggests = s.complex_suggests.clone();

        for dep in recommends {
            for &cand in pool.whatprovides(dep) {
                state.mark_recommended(cand);
            }
        }
        for expr in &complex_recommends {
            check_complex_dep(state, p, expr, Target::Recommends);
        }
        for dep in suggests {
            for &cand in pool.whatprovides(dep) {
                state.mark_suggested(cand);
            }
        }
        for expr in &complex_suggests {
            check_complex_dep(state, p, expr, Target::Suggests);
        }
    }
}

/// Whether a solvable is pulled in as a supplement of something already
/// installed. Supplements/freshens aren't part of this crate's dependency
/// model, so this is always `false` - the real predicate belongs to the
/// pool's "what does an installed package's supplements provide" index,
/// which is out of scope here. Its one call site in `prune_to_recommended`
/// still runs: a candidate only needs `is_recommended` to survive, it just
/// never survives on supplements grounds alone.
fn is_supplementing(_pool: &Pool, _s: SolvableId) -> bool {
    false
}

/// Whether a solvable enhances something already installed. Enhances isn't
/// part of this crate's dependency model either, so this is always `false`
/// for the same reason as [`is_supplementing`]. Its call site in
/// `prefer_suggested` still runs: a candidate just falls back to
/// `is_suggested`/installed-ness to stay out of the deprioritized half.
fn is_enhancing(_pool: &Pool, _s: SolvableId) -> bool {
    false
}

/// Keeps only installed packages plus recommended/supplemented candidates,
/// provided that leaves at least two non-installed entries to choose among.
/// Mirrors `prune_to_recommended`.
pub fn prune_to_recommended(pool: &Pool, state: &mut SolverState, candidates: &mut Vec<SolvableId>) {
    let ninst = candidates.iter().filter(|&&c| pool.is_installed(c)).count();
    if candidates.len() - ninst < 2 {
        return;
    }

    if state.recommends_index < state.decisionq.len() {
        update_recommendsmap(pool, state);
    }

    let mut kept_installed = Vec::new();
    let mut kept_rest = Vec::new();
    for &c in candidates.iter() {
        if pool.is_installed(c) {
            kept_installed.push(c);
            continue;
        }
        if !state.is_recommended(c) && !is_supplementing(pool, c) {
            continue;
        }
        kept_rest.push(c);
    }
    if !kept_rest.is_empty() {
        kept_installed.extend(kept_rest);
        *candidates = kept_installed;
    }
}

/// Moves everything that isn't installed, recommended/suggested, or
/// enhancing something installed to the back of the list. Mirrors
/// `prefer_suggested` ("bring suggested/enhanced packages to front").
pub fn prefer_suggested(pool: &Pool, state: &mut SolverState, candidates: &mut Vec<SolvableId>) {
    if state.recommends_index < state.decisionq.len() {
        update_recommendsmap(pool, state);
    }

    let (good, rest): (Vec<SolvableId>, Vec<SolvableId>) = candidates.iter().copied().partition(|&c| {
        pool.is_installed(c) || state.is_suggested(c) || is_enhancing(pool, c)
    });
    let mut out = good;
    out.extend(rest);
    *candidates = out;
}
