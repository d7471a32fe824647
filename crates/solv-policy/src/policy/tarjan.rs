//! Obsoletes pruning via a Tarjan-style strongly-connected-components pass.
//! After `prune_to_best_version` reduces the candidate list to one entry per
//! name, this removes entries obsoleted by another entry of a different
//! name - following cycles correctly instead of naively dropping both sides.

use crate::pool::{Pool, SolvableId};

struct TarjanCtx<'a> {
    pool: &'a Pool,
    candidates: &'a [SolvableId],
    stack: Vec<usize>,
    low: Vec<i32>,
    firstidx: i32,
    idx: i32,
}

fn obsoletes_edge(pool: &Pool, from: SolvableId, to: SolvableId) -> bool {
    let s = pool.solvable(from).expect("valid solvable id");
    let other_name = pool.solvable(to).expect("valid solvable id").name;
    if other_name == s.name {
        return false;
    }
    for &obs in &s.obsoletes {
        if pool.whatprovides(obs).contains(&to) {
            if !pool.match_nevr(obs, to) {
                continue;
            }
            if !pool.colormatch(from, to) {
                continue;
            }
            return true;
        }
    }
    false
}

fn visit(ctx: &mut TarjanCtx, node: usize) {
    let myidx = ctx.idx;
    ctx.idx += 1;
    ctx.low[node] = myidx;
    let stackstart = ctx.stack.len();
    ctx.stack.push(node);

    let me = ctx.candidates[node];
    if !pool_has_obsoletes(ctx.pool, me) {
        // nothing to chase from here
    } else {
        for i in 0..ctx.candidates.len() {
            if i == node {
                continue;
            }
            let other = ctx.candidates[i];
            if !obsoletes_edge(ctx.pool, me, other) {
                continue;
            }
            let mut l = ctx.low[i];
            if l == 0 {
                if !pool_has_obsoletes(ctx.pool, other) {
                    ctx.idx += 1;
                    ctx.low[i] = -1;
                    continue;
                }
                visit(ctx, i);
                l = ctx.low[i];
            }
            if l < 0 {
                continue;
            }
            if l < ctx.firstidx {
                // we've reached an older SCC - it is obsoleted, erase it
                let mut k = l as usize;
                loop {
                    let node_k = ctx.stack[k];
                    if ctx.low[node_k] == l {
                        ctx.low[node_k] = -1;
                        k += 1;
                    } else {
                        break;
                    }
                }
            } else if l < ctx.low[node] {
                ctx.low[node] = l;
            }
        }
    }

    if ctx.low[node] == myidx {
        let scc_id = if myidx != ctx.firstidx { -1 } else { myidx };
        for i in stackstart..ctx.stack.len() {
            ctx.low[ctx.stack[i]] = scc_id;
        }
        ctx.stack.truncate(stackstart);
    }
}

fn pool_has_obsoletes(pool: &Pool, s: SolvableId) -> bool {
    !pool.solvable(s).expect("valid solvable id").obsoletes.is_empty()
}

pub fn prune_obsoleted(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    if candidates.len() <= 1 {
        return;
    }
    if candidates.len() == 2 {
        prune_obsoleted_pair(pool, candidates);
        return;
    }

    let mut ctx = TarjanCtx {
        pool,
        candidates,
        stack: Vec::with_capacity(candidates.len()),
        low: vec![0; candidates.len()],
        firstidx: 1,
        idx: 1,
    };

    for i in 0..candidates.len() {
        if ctx.low[i] != 0 {
            continue;
        }
        if pool_has_obsoletes(pool, candidates[i]) {
            ctx.firstidx = ctx.idx;
            ctx.stack.clear();
            visit(&mut ctx, i);
        } else {
            let myidx = ctx.idx;
            ctx.idx += 1;
            ctx.low[i] = myidx;
        }
    }

    let low = ctx.low;
    let mut i = 0;
    candidates.retain(|_| {
        let keep = low[i] >= 0;
        i += 1;
        keep
    });
}

fn prune_obsoleted_pair(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    let a = candidates[0];
    let b = candidates[1];
    let a_obsoletes_b = obsoletes_edge(pool, a, b);
    let b_obsoletes_a = obsoletes_edge(pool, b, a);
    match (a_obsoletes_b, b_obsoletes_a) {
        (false, false) | (true, true) => {}
        (true, false) => candidates.truncate(1),
        (false, true) => {
            candidates[0] = b;
            candidates.truncate(1);
        }
    }
}
