//! Legality predicates (C11): whether replacing an installed solvable with
//! a candidate is a downgrade, name/arch/vendor change, and whether the
//! active policy flags permit it.

use bitflags::bitflags;

use crate::pool::{Pool, SolvableId};
use crate::solver_state::SolverState;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Illegal: u32 {
        const DOWNGRADE = 1 << 0;
        const NAMECHANGE = 1 << 1;
        const ARCHCHANGE = 1 << 2;
        const VENDORCHANGE = 1 << 3;
    }
}

/// Whether replacing `installed` with `candidate` crosses an architecture
/// class boundary. noarch is always a legal crossing point. Mirrors
/// `policy_illegal_archchange`.
pub fn illegal_archchange(pool: &Pool, installed: SolvableId, candidate: SolvableId) -> bool {
    let a1 = pool.solvable(installed).expect("valid solvable id").arch;
    let a2 = pool.solvable(candidate).expect("valid solvable id").arch;
    if a1 == a2 || Some(a1) == pool.noarch || Some(a2) == pool.noarch {
        return false;
    }
    let s1 = pool.arch_policy.score(a1).0;
    let s2 = pool.arch_policy.score(a2).0;
    (s1 ^ s2) & 0xffff_0000 != 0
}

/// Whether replacing `installed` with `candidate` crosses a vendor-mask
/// boundary. Mirrors `policy_illegal_vendorchange`.
pub fn illegal_vendorchange(pool: &Pool, installed: SolvableId, candidate: SolvableId) -> bool {
    let v1 = pool.solvable(installed).expect("valid solvable id").vendor;
    let v2 = pool.solvable(candidate).expect("valid solvable id").vendor;
    !pool.vendor_policy.compatible(v1, v2)
}

/// Computes every active flag rule a replacement actually violates.
/// `ignore` lets the caller skip checks it already knows don't apply
/// (mirroring the `ignore` bitmask parameter of `policy_is_illegal`).
pub fn is_illegal(
    pool: &Pool,
    state: &SolverState,
    installed: SolvableId,
    candidate: SolvableId,
    ignore: Illegal,
) -> Illegal {
    let duppkg = state.is_dupinvolved(installed);
    let flags = state.flags;
    let mut ret = Illegal::empty();

    let is = pool.solvable(installed).expect("valid solvable id");
    let s = pool.solvable(candidate).expect("valid solvable id");

    let allowdowngrade = if duppkg { flags.dup_allowdowngrade } else { flags.allowdowngrade };
    if !ignore.contains(Illegal::DOWNGRADE) && !allowdowngrade && is.name == s.name && is.evr > s.evr {
        ret |= Illegal::DOWNGRADE;
    }

    let allowarchchange = if duppkg { flags.dup_allowarchchange } else { flags.allowarchchange };
    if !ignore.contains(Illegal::ARCHCHANGE)
        && !allowarchchange
        && is.arch != s.arch
        && illegal_archchange(pool, installed, candidate)
    {
        ret |= Illegal::ARCHCHANGE;
    }

    let allowvendorchange = if duppkg { flags.dup_allowvendorchange } else { flags.allowvendorchange };
    if !ignore.contains(Illegal::VENDORCHANGE)
        && !allowvendorchange
        && is.vendor != s.vendor
        && illegal_vendorchange(pool, installed, candidate)
    {
        ret |= Illegal::VENDORCHANGE;
    }

    let allownamechange = if duppkg { flags.dup_allownamechange } else { flags.allownamechange };
    if !ignore.contains(Illegal::NAMECHANGE) && !allownamechange && is.name != s.name {
        ret |= Illegal::NAMECHANGE;
    }

    ret
}

/// Human-readable description of a single illegality flag, for diagnostics.
/// Mirrors `policy_illegal2str` (reduced to one flag at a time, matching how
/// callers report the first/worst violation rather than a combined string).
pub fn illegal2str(pool: &Pool, illegal: Illegal, installed: SolvableId, candidate: SolvableId) -> String {
    let is = pool.solvable(installed).expect("valid solvable id");
    let s = pool.solvable(candidate).expect("valid solvable id");
    let is_name = pool.name_str(is.name);
    let s_name = pool.name_str(s.name);
    if illegal.contains(Illegal::DOWNGRADE) {
        return format!("downgrade of {is_name}-{} to {s_name}-{}", is.evr, s.evr);
    }
    if illegal.contains(Illegal::NAMECHANGE) {
        return format!("name change of {is_name} to {s_name}");
    }
    if illegal.contains(Illegal::ARCHCHANGE) {
        return format!(
            "architecture change of {is_name} ({}) to {s_name} ({})",
            pool.arch_str(is.arch),
            pool.arch_str(s.arch)
        );
    }
    if illegal.contains(Illegal::VENDORCHANGE) {
        return format!(
            "vendor change from '{}' ({is_name}) to '{}' ({s_name})",
            pool.vendor_str(is.vendor),
            pool.vendor_str(s.vendor)
        );
    }
    "unknown illegal change".to_string()
}
