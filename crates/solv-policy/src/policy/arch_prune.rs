//! Architecture pruning (C4): keep the candidates whose architecture is
//! either `noarch` or shares the "class" (high bits) of the best non-noarch
//! score seen in the list.

use crate::pool::{Pool, SolvableId};

pub fn prune_to_best_arch(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    if candidates.len() < 2 {
        return;
    }

    let mut best_score = 0u32;
    for &c in candidates.iter() {
        let arch = pool.solvable(c).expect("valid solvable id").arch;
        let score = pool.arch_policy.score(arch).0;
        if score != 0 && score != 1 && (best_score == 0 || score < best_score) {
            best_score = score;
        }
    }
    if best_score == 0 {
        return;
    }

    candidates.retain(|&c| {
        let arch = pool.solvable(c).expect("valid solvable id").arch;
        let score = pool.arch_policy.score(arch).0;
        if score == 0 {
            return false;
        }
        score == 1 || ((score ^ best_score) & 0xffff_0000) == 0
    });
}
