//! Decision-state bookkeeping the policy engine consumes: which solvables
//! are currently decided in or out, which distupgrade/favor groups they
//! belong to, and the incremental recommend/suggest bitmaps libsolv keeps
//! alongside the solver's own clause state.

use indexmap::{IndexMap, IndexSet};

use crate::pool::cplxdeps::DepBlock;
use crate::pool::SolvableId;

/// Policy toggles, one field per flag `policy.c` reads off the job/solver.
/// Builder-style setters so call sites read as a short configuration chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyFlags {
    pub allowdowngrade: bool,
    pub allownamechange: bool,
    pub allowarchchange: bool,
    pub allowvendorchange: bool,
    pub dup_allowdowngrade: bool,
    pub dup_allownamechange: bool,
    pub dup_allowarchchange: bool,
    pub dup_allowvendorchange: bool,
    pub noupdateprovide: bool,
    pub needupdateprovide: bool,
    pub urpmreorder: bool,
}

impl PolicyFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowdowngrade(mut self, value: bool) -> Self {
        self.allowdowngrade = value;
        self
    }

    pub fn allownamechange(mut self, value: bool) -> Self {
        self.allownamechange = value;
        self
    }

    pub fn allowarchchange(mut self, value: bool) -> Self {
        self.allowarchchange = value;
        self
    }

    pub fn allowvendorchange(mut self, value: bool) -> Self {
        self.allowvendorchange = value;
        self
    }

    pub fn urpmreorder(mut self, value: bool) -> Self {
        self.urpmreorder = value;
        self
    }
}

/// A single entry in the decision queue: `solvable` was decided `value`
/// (true = install, false = keep out), in the order the solver reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub solvable: SolvableId,
    pub value: bool,
}

/// 256-bit Bloom filter over decision literals (solvable ids), used to skip
/// the expensive block-list scan for solvables whose complex recommends/
/// suggests clearly cannot yet be satisfied by anything decided so far.
/// Mirrors the fixed 256-word `CPLXDEPHASH_*` macros.
#[derive(Debug, Clone, Default)]
struct CplxDepHash {
    words: [u64; 4],
}

impl CplxDepHash {
    fn bit(solvable: SolvableId) -> (usize, u64) {
        let h = solvable.get().wrapping_mul(2654435761);
        ((h as usize >> 6) % 4, 1u64 << (h & 63))
    }

    fn insert(&mut self, solvable: SolvableId) {
        let (word, bit) = Self::bit(solvable);
        self.words[word] |= bit;
    }

    fn might_contain(&self, solvable: SolvableId) -> bool {
        let (word, bit) = Self::bit(solvable);
        self.words[word] & bit != 0
    }
}

/// Postponed complex-recommends/suggests cache: solvables whose recommends
/// or suggests expand to more than a single literal are parked here instead
/// of being resolved eagerly, and re-checked only when a newly decided
/// literal might actually satisfy one of their blocks.
#[derive(Debug, Clone, Default)]
pub struct PostponedCplxDeps {
    entries: Vec<(SolvableId, Vec<DepBlock>)>,
    hash: CplxDepHash,
}

impl PostponedCplxDeps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, solvable: SolvableId, blocks: Vec<DepBlock>) {
        for block in &blocks {
            for lit in block.negative.iter().chain(block.positive.iter()) {
                self.hash.insert(*lit);
            }
        }
        self.entries.push((solvable, blocks));
    }

    /// Whether `solvable` could plausibly appear in any postponed block. A
    /// `false` result is exact; a `true` result still requires scanning.
    pub fn might_involve(&self, solvable: SolvableId) -> bool {
        self.hash.might_contain(solvable)
    }

    pub fn entries(&self) -> &[(SolvableId, Vec<DepBlock>)] {
        &self.entries
    }

    /// Drops every postponed entry for which `is_satisfied` now holds,
    /// returning the solvables that just became satisfied.
    pub fn drain_satisfied(&mut self, mut is_satisfied: impl FnMut(&[DepBlock]) -> bool) -> Vec<SolvableId> {
        let mut satisfied = Vec::new();
        self.entries.retain(|(solvable, blocks)| {
            if is_satisfied(blocks) {
                satisfied.push(*solvable);
                false
            } else {
                true
            }
        });
        satisfied
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the cache, handing back everything it held - used when
    /// rebuilding the hash after a partial recheck pass.
    pub fn take(&mut self) -> Vec<(SolvableId, Vec<DepBlock>)> {
        self.hash = CplxDepHash::default();
        std::mem::take(&mut self.entries)
    }
}

/// All solver-side state the policy engine reads or incrementally updates.
/// Mirrors libsolv's `Pool`/`Solver` fields the policy functions touch,
/// without any of the clause/rule/watch-list machinery that belongs to the
/// SAT core.
#[derive(Debug, Clone, Default)]
pub struct SolverState {
    decisionmap: IndexMap<SolvableId, i32>,
    pub decisionq: Vec<Decision>,
    dupinvolvedmap: IndexSet<SolvableId>,
    dupinvolvedmap_all: bool,
    favormap: IndexMap<SolvableId, i32>,
    recommendsmap: IndexSet<SolvableId>,
    suggestsmap: IndexSet<SolvableId>,
    pub recommends_index: usize,
    pub recommendscplxq: PostponedCplxDeps,
    pub suggestscplxq: PostponedCplxDeps,
    pub flags: PolicyFlags,
}

impl SolverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: PolicyFlags) -> Self {
        Self {
            flags,
            ..Default::default()
        }
    }

    pub fn decide(&mut self, solvable: SolvableId, value: bool, level: i32) {
        self.decisionmap
            .insert(solvable, if value { level } else { -level });
        self.decisionq.push(Decision { solvable, value });
    }

    /// `None` = undecided, `Some(true)` = decided in, `Some(false)` = decided out.
    pub fn decision(&self, solvable: SolvableId) -> Option<bool> {
        self.decisionmap.get(&solvable).map(|&level| level > 0)
    }

    pub fn is_decided(&self, solvable: SolvableId) -> bool {
        self.decisionmap.contains_key(&solvable)
    }

    pub fn set_dupinvolved_all(&mut self, all: bool) {
        self.dupinvolvedmap_all = all;
    }

    pub fn mark_dupinvolved(&mut self, solvable: SolvableId) {
        self.dupinvolvedmap.insert(solvable);
    }

    pub fn is_dupinvolved(&self, solvable: SolvableId) -> bool {
        self.dupinvolvedmap_all || self.dupinvolvedmap.contains(&solvable)
    }

    pub fn set_favor(&mut self, solvable: SolvableId, favor: i32) {
        self.favormap.insert(solvable, favor);
    }

    pub fn favor(&self, solvable: SolvableId) -> i32 {
        self.favormap.get(&solvable).copied().unwrap_or(0)
    }

    pub fn mark_recommended(&mut self, solvable: SolvableId) {
        self.recommendsmap.insert(solvable);
    }

    pub fn is_recommended(&self, solvable: SolvableId) -> bool {
        self.recommendsmap.contains(&solvable)
    }

    pub fn mark_suggested(&mut self, solvable: SolvableId) {
        self.suggestsmap.insert(solvable);
    }

    pub fn is_suggested(&self, solvable: SolvableId) -> bool {
        self.suggestsmap.contains(&solvable)
    }
}
