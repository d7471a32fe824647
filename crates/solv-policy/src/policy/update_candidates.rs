//! Update-candidate enumeration (C10): given an installed solvable, find
//! every available package that could legally replace it, in plain-update,
//! allow-all, or distribution-upgrade mode.

use crate::pool::{DepId, Pool, SolvableId};
use crate::solver_state::SolverState;

use super::legality;
use super::obsoletes::ObsoleteIndex;

/// How permissive the search is about name/version/arch/vendor changes.
/// Mirrors `policy_findupdatepackages`'s `allow_all` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowAll {
    /// No downgrades; obey the solver's own allow-* flags.
    None,
    /// Every flag is treated as permissive regardless of policy settings.
    All,
    /// Distribution-upgrade mode: use the `dup_allow*` flags instead.
    Dup,
}

struct Allowed {
    downgrade: bool,
    namechange: bool,
    archchange: bool,
    vendorchange: bool,
}

fn allowed_for(state: &SolverState, mode: AllowAll) -> Allowed {
    match mode {
        AllowAll::All => Allowed {
            downgrade: true,
            namechange: true,
            archchange: true,
            vendorchange: true,
        },
        AllowAll::None => Allowed {
            downgrade: state.flags.allowdowngrade,
            namechange: state.flags.allownamechange,
            archchange: state.flags.allowarchchange,
            vendorchange: state.flags.allowvendorchange,
        },
        AllowAll::Dup => Allowed {
            downgrade: state.flags.dup_allowdowngrade,
            namechange: state.flags.dup_allownamechange,
            archchange: state.flags.dup_allowarchchange,
            vendorchange: state.flags.dup_allowvendorchange,
        },
    }
}

fn is_obsoleting(pool: &Pool, obsoleter: SolvableId, installed: SolvableId) -> bool {
    let ob = pool.solvable(obsoleter).expect("valid solvable id");
    for &obs in &ob.obsoletes {
        if !pool.whatprovides(obs).contains(&installed) {
            continue;
        }
        if !pool.match_nevr(obs, installed) {
            continue;
        }
        return true;
    }
    false
}

/// Finds every legal update candidate for the installed solvable `s`.
/// Mirrors `policy_findupdatepackages`.
pub fn find_update_candidates(
    pool: &Pool,
    state: &SolverState,
    s: SolvableId,
    allow_all: AllowAll,
    obsolete_index: &ObsoleteIndex,
) -> Vec<SolvableId> {
    let allowed = allowed_for(state, allow_all);
    let solvable = pool.solvable(s).expect("valid solvable id");
    let self_dep = DepId(solvable.name);

    let mut out = Vec::new();
    let mut have_provobs = false;

    for &p in pool.whatprovides(self_dep) {
        if p == s {
            continue;
        }
        let ps = pool.solvable(p).expect("valid solvable id");
        if solvable.name == ps.name {
            if !allowed.downgrade && solvable.evr > ps.evr {
                continue;
            }
        } else if !allowed.namechange {
            continue;
        } else if (!state.flags.noupdateprovide || state.flags.needupdateprovide) && !ps.obsoletes.is_empty() {
            if !is_obsoleting(pool, p, s) {
                continue;
            }
            have_provobs = true;
        } else {
            continue;
        }
        if !allowed.archchange && solvable.arch != ps.arch && legality::illegal_archchange(pool, s, p) {
            continue;
        }
        if !allowed.vendorchange && solvable.vendor != ps.vendor && legality::illegal_vendorchange(pool, s, p) {
            continue;
        }
        out.push(p);
    }

    if !allowed.namechange {
        return out;
    }
    if state.flags.needupdateprovide || (!state.flags.noupdateprovide && have_provobs) {
        return out;
    }

    for &p in obsolete_index.obsoletes_of(s) {
        let ps = pool.solvable(p).expect("valid solvable id");
        if !allowed.archchange && solvable.arch != ps.arch && legality::illegal_archchange(pool, s, p) {
            continue;
        }
        if !allowed.vendorchange && solvable.vendor != ps.vendor && legality::illegal_vendorchange(pool, s, p) {
            continue;
        }
        out.push(p);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::obsoletes::build_obsolete_index;
    use crate::pool::RepoKind;
    use crate::solver_state::PolicyFlags;

    #[test]
    fn name_match_finds_newer_same_named_candidates() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let installed_repo = pool.add_repository("@System", RepoKind::Installed, 0, 0);
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let installed = pool.add_solvable(installed_repo, "zlib", "1-1", arch, vendor).unwrap();
        let newer = pool.add_solvable(repo, "zlib", "2-1", arch, vendor).unwrap();
        let self_dep = pool.intern_dep("zlib");
        pool.add_provides(installed, self_dep);
        pool.add_provides(newer, self_dep);

        let state = SolverState::new();
        let index = build_obsolete_index(&pool, &[installed], &[newer]);
        let candidates = find_update_candidates(&pool, &state, installed, AllowAll::None, &index);
        assert_eq!(candidates, vec![newer]);
    }

    #[test]
    fn downgrade_excluded_unless_allowed() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let installed_repo = pool.add_repository("@System", RepoKind::Installed, 0, 0);
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let installed = pool.add_solvable(installed_repo, "zlib", "2-1", arch, vendor).unwrap();
        let older = pool.add_solvable(repo, "zlib", "1-1", arch, vendor).unwrap();
        let self_dep = pool.intern_dep("zlib");
        pool.add_provides(installed, self_dep);
        pool.add_provides(older, self_dep);

        let state = SolverState::new();
        let index = build_obsolete_index(&pool, &[installed], &[older]);
        let candidates = find_update_candidates(&pool, &state, installed, AllowAll::None, &index);
        assert!(candidates.is_empty());

        let state = SolverState::with_flags(PolicyFlags::new().allowdowngrade(true));
        let candidates = find_update_candidates(&pool, &state, installed, AllowAll::None, &index);
        assert_eq!(candidates, vec![older]);
    }

    #[test]
    fn allow_all_mode_accepts_a_name_change_via_obsoletes() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let installed_repo = pool.add_repository("@System", RepoKind::Installed, 0, 0);
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let installed = pool.add_solvable(installed_repo, "old-name", "1-1", arch, vendor).unwrap();
        let replacement = pool.add_solvable(repo, "new-name", "2-1", arch, vendor).unwrap();
        let obs = pool.intern_dep("old-name");
        pool.add_provides(installed, obs);
        pool.solvable_mut(replacement).unwrap().obsoletes.push(obs);

        let state = SolverState::new();
        let index = build_obsolete_index(&pool, &[installed], &[replacement]);
        let candidates = find_update_candidates(&pool, &state, installed, AllowAll::All, &index);
        assert_eq!(candidates, vec![replacement]);
    }
}
