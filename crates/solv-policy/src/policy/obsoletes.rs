//! Reverse-obsoletes index (C9): for every installed solvable, which
//! available (different-named) solvables obsolete it. `update_candidates`
//! falls back to this index when a name-based update search turns up
//! nothing, so it's built once per solve rather than scanned on demand.

use crate::pool::{Pool, SolvableId};

#[derive(Debug, Clone, Default)]
pub struct ObsoleteIndex {
    by_installed: std::collections::HashMap<SolvableId, Vec<SolvableId>>,
}

impl ObsoleteIndex {
    /// Obsoletes of `installed`, in the order the obsoleting packages were
    /// scanned. Empty if nothing obsoletes it.
    pub fn obsoletes_of(&self, installed: SolvableId) -> &[SolvableId] {
        self.by_installed
            .get(&installed)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn obsoletes_installed(pool: &Pool, obsoleter: SolvableId, installed: SolvableId) -> bool {
    let ob = pool.solvable(obsoleter).expect("valid solvable id");
    let is = pool.solvable(installed).expect("valid solvable id");
    if ob.name == is.name {
        return false;
    }
    for &obs in &ob.obsoletes {
        if !pool.whatprovides(obs).contains(&installed) {
            continue;
        }
        if !pool.match_nevr(obs, installed) {
            continue;
        }
        if pool.obsoleteusescolors && !pool.colormatch(obsoleter, installed) {
            continue;
        }
        return true;
    }
    false
}

/// Builds the reverse-obsoletes index over every installed solvable.
/// Mirrors `policy_create_obsolete_index`'s two-pass count/backfill
/// structure, reduced to a plain `Vec` per installed solvable instead of
/// the packed prefix-sum arena (the original packs everything into one
/// flat array purely to avoid a per-solvable allocation).
pub fn build_obsolete_index(pool: &Pool, installed: &[SolvableId], available: &[SolvableId]) -> ObsoleteIndex {
    let mut index = ObsoleteIndex::default();
    for &is in installed {
        let mut obsoleters = Vec::new();
        for &avail in available {
            if pool.solvable(avail).expect("valid solvable id").obsoletes.is_empty() {
                continue;
            }
            if obsoletes_installed(pool, avail, is) {
                obsoleters.push(avail);
            }
        }
        if !obsoleters.is_empty() {
            index.by_installed.insert(is, obsoleters);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::RepoKind;

    #[test]
    fn finds_packages_that_obsolete_an_installed_package_by_a_different_name() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let installed_repo = pool.add_repository("@System", RepoKind::Installed, 0, 0);
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let old = pool.add_solvable(installed_repo, "old-name", "1-1", arch, vendor).unwrap();
        let new = pool.add_solvable(repo, "new-name", "2-1", arch, vendor).unwrap();
        let obs = pool.intern_dep("old-name");
        pool.add_provides(old, obs);
        pool.solvable_mut(new).unwrap().obsoletes.push(obs);

        let index = build_obsolete_index(&pool, &[old], &[new]);
        assert_eq!(index.obsoletes_of(old), &[new]);
    }

    #[test]
    fn same_name_replacement_is_not_an_obsoletes_entry() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let installed_repo = pool.add_repository("@System", RepoKind::Installed, 0, 0);
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let old = pool.add_solvable(installed_repo, "zlib", "1-1", arch, vendor).unwrap();
        let new = pool.add_solvable(repo, "zlib", "2-1", arch, vendor).unwrap();
        let obs = pool.intern_dep("zlib");
        pool.add_provides(old, obs);
        pool.solvable_mut(new).unwrap().obsoletes.push(obs);

        let index = build_obsolete_index(&pool, &[old], &[new]);
        assert!(index.obsoletes_of(old).is_empty());
    }
}
