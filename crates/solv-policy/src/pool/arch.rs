use std::collections::HashMap;

use super::Arch;

/// An architecture score as libsolv packs it: the high 16 bits group
/// mutually-compatible architectures into a "class" (e.g. i386..x86_64 all
/// share the x86 class), the low 16 bits rank preference within that class
/// (higher wins). A score of `0` means the architecture cannot run on this
/// system at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArchScore(pub u32);

impl ArchScore {
    pub const INCOMPATIBLE: ArchScore = ArchScore(0);

    pub fn class(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub fn rank(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    pub fn is_compatible(self) -> bool {
        self.0 != 0
    }
}

/// Per-pool architecture compatibility table, libsolv's `id2arch`/`arch2score`.
#[derive(Debug, Default, Clone)]
pub struct ArchPolicy {
    scores: HashMap<Arch, ArchScore>,
    noarch: Option<Arch>,
}

impl ArchPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_noarch(&mut self, arch: Arch) {
        self.noarch = Some(arch);
        self.scores.insert(arch, ArchScore(1));
    }

    pub fn is_noarch(&self, arch: Arch) -> bool {
        self.noarch == Some(arch)
    }

    /// Registers `arch` at `class`, with `rank` preference inside that
    /// class (lower `rank` values should be passed for more-preferred
    /// architectures further up the compatibility chain by the caller;
    /// internally we store `0xffff - rank` so that higher `ArchScore`
    /// still means "more preferred", matching `pool_arch2score` callers).
    pub fn register(&mut self, arch: Arch, class: u16, rank: u16) {
        let score = ((class as u32) << 16) | (0xffffu32 - rank as u32);
        self.scores.insert(arch, ArchScore(score));
    }

    pub fn score(&self, arch: Arch) -> ArchScore {
        self.scores
            .get(&arch)
            .copied()
            .unwrap_or(ArchScore::INCOMPATIBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_arch_is_incompatible() {
        let policy = ArchPolicy::new();
        assert_eq!(policy.score(Arch(42)), ArchScore::INCOMPATIBLE);
        assert!(!policy.score(Arch(42)).is_compatible());
    }

    #[test]
    fn same_class_ranks_against_each_other() {
        let mut policy = ArchPolicy::new();
        let x86_64 = Arch(1);
        let i686 = Arch(2);
        policy.register(x86_64, 10, 0);
        policy.register(i686, 10, 5);
        assert_eq!(policy.score(x86_64).class(), policy.score(i686).class());
        assert!(policy.score(x86_64) > policy.score(i686));
    }

    #[test]
    fn different_classes_do_not_rank_across() {
        let mut policy = ArchPolicy::new();
        let x86 = Arch(1);
        let arm = Arch(2);
        policy.register(x86, 10, 0);
        policy.register(arm, 20, 0);
        assert_ne!(policy.score(x86).class(), policy.score(arm).class());
    }

    #[test]
    fn noarch_has_fixed_low_score() {
        let mut policy = ArchPolicy::new();
        let noarch = Arch(99);
        policy.set_noarch(noarch);
        assert!(policy.is_noarch(noarch));
        assert_eq!(policy.score(noarch), ArchScore(1));
    }
}
