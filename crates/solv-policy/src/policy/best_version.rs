//! Best-version pruning (C5): reduce a sorted candidate list to one entry
//! per name (the highest evr wins ties going to the earlier-sorted entry,
//! matching `r < 0` in the original), then let the Tarjan obsoletes pass
//! trim cross-name obsoletes.

use std::cmp::Ordering;

use crate::pool::{Pool, SolvableId};

use super::sort_key;
use super::tarjan;

pub fn prune_to_best_version(pool: &Pool, candidates: &mut Vec<SolvableId>) {
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
        let best_name = pool.solvable(current_best).expect("valid solvable id").name;
        let name = pool.solvable(c).expect("valid solvable id").name;
        if best_name != name {
            out.push(current_best);
            best = Some(c);
            continue;
        }
        if pool.evrcmp(current_best, c) == Ordering::Less {
            best = Some(c);
        }
    }
    if let Some(best) = best {
        out.push(best);
    }

    *candidates = out;
    if candidates.len() > 1 {
        tarjan::prune_obsoleted(pool, candidates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::RepoKind;

    #[test]
    fn keeps_one_entry_per_name_picking_the_highest_evr() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let old = pool.add_solvable(repo, "zlib", "1.2.11-1", arch, vendor).unwrap();
        let new = pool.add_solvable(repo, "zlib", "1.2.13-1", arch, vendor).unwrap();
        let mut candidates = vec![old, new];
        prune_to_best_version(&pool, &mut candidates);
        assert_eq!(candidates, vec![new]);
    }

    #[test]
    fn different_names_each_keep_their_own_best() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let a = pool.add_solvable(repo, "zlib", "1-1", arch, vendor).unwrap();
        let b = pool.add_solvable(repo, "openssl", "1-1", arch, vendor).unwrap();
        let mut candidates = vec![a, b];
        prune_to_best_version(&pool, &mut candidates);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn cross_name_obsoletes_still_applies_after_best_version_pick() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let old = pool.add_solvable(repo, "old-name", "1-1", arch, vendor).unwrap();
        let new = pool.add_solvable(repo, "new-name", "2-1", arch, vendor).unwrap();
        let obs = pool.intern_dep("old-name");
        pool.add_provides(old, obs);
        pool.solvable_mut(new).unwrap().obsoletes.push(obs);

        let mut candidates = vec![old, new];
        prune_to_best_version(&pool, &mut candidates);
        assert_eq!(candidates, vec![new]);
    }
}
