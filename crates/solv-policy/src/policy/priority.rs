//! Repository-priority pruning (C3): keep only the candidates whose
//! repository has the highest priority, with special handling for
//! installed packages caught up in a distribution-upgrade ("dup") decision.

use crate::pool::{Pool, SolvableId};
use crate::solver_state::SolverState;

use super::sort_key;

/// Prune to the repository with the highest priority. Installed solvables
/// are never pruned by priority alone - only non-installed repos compete.
pub fn prune_to_highest_prio(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    let mut best_prio = None;
    for &c in candidates.iter() {
        if pool.is_installed(c) {
            continue;
        }
        let prio = pool.repo_of(c).expect("valid repo").priority;
        best_prio = Some(match best_prio {
            Some(b) if b >= prio => b,
            _ => prio,
        });
    }
    let Some(best_prio) = best_prio else { return };
    candidates.retain(|&c| {
        pool.is_installed(c) || pool.repo_of(c).expect("valid repo").priority == best_prio
    });
}

/// Two solvables are "identical" for dup-pruning purposes if everything a
/// consumer could observe about them (besides id/repo) matches.
fn solvable_identical(pool: &Pool, a: SolvableId, b: SolvableId) -> bool {
    let sa = pool.solvable(a).expect("valid solvable id");
    let sb = pool.solvable(b).expect("valid solvable id");
    sa.name == sb.name
        && sa.evr == sb.evr
        && sa.arch == sb.arch
        && sa.vendor == sb.vendor
        && sa.provides == sb.provides
        && sa.requires == sb.requires
        && sa.recommends == sb.recommends
        && sa.suggests == sb.suggests
        && sa.obsoletes == sb.obsoletes
}

/// Installed packages involved in a dup operation can only survive pruning
/// if an available, at-least-as-prioritized solvable is identical to them.
pub fn prune_installed_dup_packages(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    let Some(mut best_prio) = candidates
        .iter()
        .find(|&&c| !pool.is_installed(c))
        .map(|&c| pool.repo_of(c).expect("valid repo").priority)
    else {
        return;
    };

    let mut kept = Vec::with_capacity(candidates.len());
    for &c in candidates.iter() {
        let repo = pool.repo_of(c).expect("valid repo");
        if !pool.is_installed(c) && repo.priority < best_prio {
            continue;
        }
        if pool.is_installed(c) {
            let name = pool.solvable(c).expect("valid solvable id").name;
            let same_name_dep = crate::pool::DepId(name);
            let mut keep_it = false;
            for &other in pool.whatprovides(same_name_dep) {
                if pool.is_installed(other) {
                    continue;
                }
                let other_repo = pool.repo_of(other).expect("valid repo");
                if pool.evrcmp(other, c) != std::cmp::Ordering::Equal
                    || other_repo.priority < best_prio
                {
                    continue;
                }
                if !solvable_identical(pool, c, other) {
                    continue;
                }
                keep_it = true;
                if other_repo.priority > best_prio {
                    best_prio = other_repo.priority;
                    kept.clear();
                }
            }
            if !keep_it {
                continue;
            }
        }
        kept.push(c);
    }
    if !kept.is_empty() {
        *candidates = kept;
    }
}

/// Like [`prune_to_highest_prio`], but also runs the dup-aware pass when
/// any candidate is actually dup-involved.
pub fn prune_to_highest_prio_dup_aware(
    pool: &Pool,
    state: &SolverState,
    candidates: &mut Vec<SolvableId>,
) {
    prune_to_highest_prio(pool, candidates);
    if candidates.len() > 1 && candidates.iter().any(|&c| state.is_dupinvolved(c)) {
        prune_installed_dup_packages(pool, candidates);
    }
}

/// `POLICY_MODE_SUGGEST` variant: priority-prune each name group
/// independently rather than the whole candidate list at once.
pub fn prune_to_highest_prio_per_name(
    pool: &Pool,
    state: &SolverState,
    candidates: &mut Vec<SolvableId>,
) {
    candidates.sort_by(|&a, &b| sort_key::cmp(pool, a, b));

    let mut out = Vec::with_capacity(candidates.len());
    let mut group: Vec<SolvableId> = Vec::new();
    let mut group_name = None;

    for &c in candidates.iter() {
        let name = pool.solvable(c).expect("valid solvable id").name;
        if group_name.is_some() && group_name != Some(name) {
            if group.len() > 2 {
                prune_to_highest_prio_dup_aware(pool, state, &mut group);
            }
            out.append(&mut group);
        }
        group_name = Some(name);
        group.push(c);
    }
    if group.len() > 2 {
        prune_to_highest_prio_dup_aware(pool, state, &mut group);
    }
    out.append(&mut group);

    *candidates = out;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::RepoKind;

    fn setup() -> Pool {
        let mut pool = Pool::new();
        pool.intern_arch("x86_64");
        pool
    }

    #[test]
    fn keeps_only_highest_priority_repo() {
        let mut pool = setup();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let low = pool.add_repository("low", RepoKind::Regular, 1, 0);
        let high = pool.add_repository("high", RepoKind::Regular, 10, 0);
        let a = pool.add_solvable(low, "zlib", "1-1", arch, vendor).unwrap();
        let b = pool.add_solvable(high, "zlib", "2-1", arch, vendor).unwrap();
        let mut candidates = vec![a, b];
        prune_to_highest_prio(&pool, &mut candidates);
        assert_eq!(candidates, vec![b]);
    }

    #[test]
    fn installed_solvables_are_never_pruned_by_priority_alone() {
        let mut pool = setup();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let installed_repo = pool.add_repository("@System", RepoKind::Installed, 0, 0);
        let repo = pool.add_repository("r", RepoKind::Regular, 10, 0);
        let installed = pool.add_solvable(installed_repo, "zlib", "1-1", arch, vendor).unwrap();
        let avail = pool.add_solvable(repo, "zlib", "2-1", arch, vendor).unwrap();
        let mut candidates = vec![installed, avail];
        prune_to_highest_prio(&pool, &mut candidates);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn ties_keep_every_candidate() {
        let mut pool = setup();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let repo = pool.add_repository("r", RepoKind::Regular, 5, 0);
        let a = pool.add_solvable(repo, "zlib", "1-1", arch, vendor).unwrap();
        let b = pool.add_solvable(repo, "zlib", "2-1", arch, vendor).unwrap();
        let mut candidates = vec![a, b];
        prune_to_highest_prio(&pool, &mut candidates);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn per_name_grouping_prunes_each_name_independently() {
        let mut pool = setup();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let low = pool.add_repository("low", RepoKind::Regular, 1, 0);
        let high = pool.add_repository("high", RepoKind::Regular, 10, 0);
        let a = pool.add_solvable(low, "zlib", "1-1", arch, vendor).unwrap();
        let b = pool.add_solvable(high, "zlib", "2-1", arch, vendor).unwrap();
        let c = pool.add_solvable(low, "openssl", "1-1", arch, vendor).unwrap();
        let d = pool.add_solvable(high, "openssl", "2-1", arch, vendor).unwrap();
        let e = pool.add_solvable(low, "openssl", "3-1", arch, vendor).unwrap();
        let state = SolverState::new();
        let mut candidates = vec![a, b, c, d, e];
        prune_to_highest_prio_per_name(&pool, &state, &mut candidates);
        assert!(candidates.contains(&d));
        assert!(!candidates.contains(&c) && !candidates.contains(&e));
    }
}
