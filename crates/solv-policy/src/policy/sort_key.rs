//! Canonical candidate ordering, `prune_to_best_version_sortcmp` in the
//! original: name first (real string compare, so the result never depends
//! on pool insertion order), then architecture score, then installed-first,
//! then repository subpriority, then id as a last-resort tiebreak.

use std::cmp::Ordering;

use crate::pool::{Pool, SolvableId};

pub fn cmp(pool: &Pool, a: SolvableId, b: SolvableId) -> Ordering {
    let sa = pool.solvable(a).expect("valid solvable id");
    let sb = pool.solvable(b).expect("valid solvable id");

    if sa.name != sb.name {
        return pool.name_str(sa.name).cmp(pool.name_str(sb.name));
    }

    if sa.arch != sb.arch {
        let aa = pool.arch_policy.score(sa.arch);
        let ab = pool.arch_policy.score(sb.arch);
        if aa != ab && aa.0 > 1 && ab.0 > 1 {
            // lowest score first, matching the original's "-1 for lower"
            return aa.0.cmp(&ab.0);
        }
    }

    let a_installed = pool.is_installed(a);
    let b_installed = pool.is_installed(b);
    match (a_installed, b_installed) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    let ra = pool.repo_of(a).expect("valid repo");
    let rb = pool.repo_of(b).expect("valid repo");
    if ra.subpriority != rb.subpriority {
        // higher subpriority sorts first
        return rb.subpriority.cmp(&ra.subpriority);
    }

    a.get().cmp(&b.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Arch, RepoKind, Vendor};

    fn setup() -> (Pool, Arch, Vendor) {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        (pool, arch, vendor)
    }

    #[test]
    fn different_names_sort_lexically() {
        let (mut pool, arch, vendor) = setup();
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let a = pool.add_solvable(repo, "alpha", "1-1", arch, vendor).unwrap();
        let b = pool.add_solvable(repo, "beta", "1-1", arch, vendor).unwrap();
        assert_eq!(cmp(&pool, a, b), Ordering::Less);
    }

    #[test]
    fn installed_sorts_before_available_for_same_name() {
        let (mut pool, arch, vendor) = setup();
        let installed_repo = pool.add_repository("@System", RepoKind::Installed, 0, 0);
        let avail_repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let installed = pool.add_solvable(installed_repo, "zlib", "1-1", arch, vendor).unwrap();
        let avail = pool.add_solvable(avail_repo, "zlib", "1-1", arch, vendor).unwrap();
        assert_eq!(cmp(&pool, installed, avail), Ordering::Less);
        assert_eq!(cmp(&pool, avail, installed), Ordering::Greater);
    }

    #[test]
    fn higher_subpriority_sorts_first() {
        let (mut pool, arch, vendor) = setup();
        let low = pool.add_repository("low", RepoKind::Regular, 0, 0);
        let high = pool.add_repository("high", RepoKind::Regular, 0, 5);
        let a = pool.add_solvable(low, "zlib", "1-1", arch, vendor).unwrap();
        let b = pool.add_solvable(high, "zlib", "1-1", arch, vendor).unwrap();
        assert_eq!(cmp(&pool, b, a), Ordering::Less);
    }

    #[test]
    fn falls_back_to_id_order() {
        let (mut pool, arch, vendor) = setup();
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let a = pool.add_solvable(repo, "zlib", "1-1", arch, vendor).unwrap();
        let b = pool.add_solvable(repo, "zlib", "1-1", arch, vendor).unwrap();
        assert_eq!(cmp(&pool, a, b), Ordering::Less);
    }
}
