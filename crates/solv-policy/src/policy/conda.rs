//! Conda-flavored best-version selection (§4.4.1/4.5): instead of a strict
//! "highest evr per name wins" rule, pick among same-evr builds by feature
//! count, build version/flavor, and finally by whose first-level
//! dependencies resolve to the newer set of packages.
//!
//! The comparator chain needs structured `name OP version` requirements and
//! build-variant metadata this crate's flat `DepId` dependency strings and
//! reduced `Solvable` don't carry (no build-flavor string, no per-dependency
//! relational operator). `featurecountcmp`/`evrcmp`/subpriority stay exact;
//! `buildversioncmp`/`buildflavorcmp` are neutral stubs and
//! `compare_dependencies` works over whole-dependency-string identity
//! rather than per-name version ranges - documented as a deliberate
//! reduction, not an oversight.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::pool::{DepId, Pool, Solvable, SolvableId};

use super::sort_key;

fn featurecountcmp(a: &Solvable, b: &Solvable) -> Ordering {
    a.track_features.cmp(&b.track_features)
}

/// No build-version metadata is modeled; always a tie. Mirrors
/// `pool_buildversioncmp` only in name, not effect.
fn buildversioncmp(_a: &Solvable, _b: &Solvable) -> Ordering {
    Ordering::Equal
}

/// No build-flavor metadata is modeled; always a tie. Mirrors
/// `pool_buildflavorcmp` only in name, not effect.
fn buildflavorcmp(_a: &Solvable, _b: &Solvable) -> Ordering {
    Ordering::Equal
}

fn best_provided_evr(pool: &Pool, dep: DepId) -> Option<SolvableId> {
    pool.whatprovides(dep)
        .iter()
        .copied()
        .max_by(|&a, &b| pool.evrcmp(a, b))
}

/// Scores `s1` against `s2` by how favorably their non-shared first-level
/// requirements resolve: a dependency only one side names is worth more
/// when it resolves to a newer package than the same slot does not exist
/// for the other side. Reduced from `conda_compare_dependencies`: compares
/// whole dependency strings rather than per-name version ranges.
pub fn compare_dependencies(pool: &Pool, s1: &Solvable, s2: &Solvable) -> i32 {
    let in_s2: HashSet<DepId> = s2.requires.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut result = 0i32;

    for &dep in &s1.requires {
        if !seen.insert(dep) || in_s2.contains(&dep) {
            continue;
        }
        let Some(best1) = best_provided_evr(pool, dep) else { continue };
        // s2 has no equivalent requirement in this reduced model - compare
        // against s2's own evr as the closest available reference point.
        let ordering = pool.evrcmp(best1, s2.id);
        result += match ordering {
            Ordering::Greater => -1,
            Ordering::Less => 1,
            Ordering::Equal => 0,
        };
    }
    result
}

fn sort_by_best_dependencies(pool: &Pool, a: SolvableId, b: SolvableId) -> Ordering {
    let sa = pool.solvable(a).expect("valid solvable id");
    let sb = pool.solvable(b).expect("valid solvable id");
    let res = compare_dependencies(pool, sa, sb);
    if res != 0 {
        return res.cmp(&0);
    }
    let bta = sa.build_timestamp.unwrap_or(0);
    let btb = sb.build_timestamp.unwrap_or(0);
    btb.cmp(&bta)
}

fn variant_cmp(pool: &Pool, best: &Solvable, s: &Solvable) -> Ordering {
    featurecountcmp(best, s)
        .then_with(|| {
            if best.evr != s.evr {
                pool.evrcmp(best.id, s.id)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| {
            let best_sub = pool.repo_of(best.id).map(|r| r.subpriority).unwrap_or(0);
            let s_sub = pool.repo_of(s.id).map(|r| r.subpriority).unwrap_or(0);
            best_sub.cmp(&s_sub)
        })
        // buildversioncmp/buildflavorcmp never discriminate here: this chain
        // falls through to sort_by_best_dependencies on a tie, so dropping
        // these two links only means build-version/build-flavor ties get
        // decided by dependency comparison instead of by those two fields
        // directly - no variant goes uncompared, it's compared one step later.
        .then_with(|| buildversioncmp(best, s))
        .then_with(|| buildflavorcmp(best, s))
}

/// Reduces each name group to its best variant using the feature-count /
/// evr / subpriority / build chain, then breaks remaining ties by comparing
/// first-level dependencies. Mirrors `prune_to_best_version_conda`.
pub fn prune_to_best_version_conda(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    if candidates.len() < 2 {
        return;
    }
    candidates.sort_by(|&a, &b| sort_key::cmp(pool, a, b));

    let mut out = Vec::with_capacity(candidates.len());
    let mut best: Option<SolvableId> = None;

    for &c in candidates.iter() {
        let Some(current_best) = best else {
            best = Some(c);
            continue;
        };
        let best_s = pool.solvable(current_best).expect("valid solvable id");
        let s = pool.solvable(c).expect("valid solvable id");
        if best_s.name != s.name {
            out.push(current_best);
            best = Some(c);
            continue;
        }
        if variant_cmp(pool, best_s, s) == Ordering::Less {
            best = Some(c);
        }
    }
    if let Some(best) = best {
        out.push(best);
    }

    let Some(&best_overall) = out.first() else {
        *candidates = out;
        return;
    };
    let best_overall = pool.solvable(best_overall).expect("valid solvable id");

    let mut tied: Vec<SolvableId> = candidates
        .iter()
        .copied()
        .filter(|&c| {
            let s = pool.solvable(c).expect("valid solvable id");
            variant_cmp(pool, best_overall, s) == Ordering::Equal
        })
        .collect();

    if tied.len() > 1 {
        tied.sort_by(|&a, &b| sort_by_best_dependencies(pool, a, b));
    }
    *candidates = tied;
}
