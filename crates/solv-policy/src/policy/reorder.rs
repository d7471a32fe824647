//! Final list reordering (C7): push back superseded-looking entries, group
//! installed counterparts to the front, and apply explicit favor/urpm
//! heuristics. These passes never change *which* candidates survive, only
//! their order, and run after every pruning stage has already trimmed the list.

use std::cmp::Ordering;

use crate::pool::{DepId, Pool, SolvableId};
use crate::solver_state::SolverState;

/// Pushes a candidate to the back when a same-named, same-arch candidate
/// elsewhere in the pool is strictly newer at an equal-or-better repo
/// priority. Mirrors `dislike_old_versions`.
pub fn dislike_old_versions(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    let mut i = 0;
    while i < candidates.len() {
        let p = candidates[i];
        let s = pool.solvable(p).expect("valid solvable id");
        if pool.is_installed(p) {
            i += 1;
            continue;
        }
        let repo = pool.repo_of(p).expect("valid repo");
        let mut bad = false;
        for other in pool.solvables_named(s.name) {
            if other.id == p || other.arch != s.arch {
                continue;
            }
            let other_repo = pool.repository(crate::pool::RepoId(other.repo.0)).expect("valid repo");
            if repo.priority != other_repo.priority {
                if repo.priority > other_repo.priority {
                    continue;
                }
                bad = true;
                break;
            }
            if other.evr > s.evr {
                bad = true;
                break;
            }
        }
        if bad {
            let moved = candidates.remove(i);
            candidates.push(moved);
            continue;
        }
        i += 1;
    }
}

/// Groups candidates by the "common dependency" they require in the same
/// way, penalizing entries whose required version disagrees with the rest
/// of their name-group, then applies a stable insertion sort on that
/// badness score (installed candidates always sort as badness `0`).
/// A reduced stand-in for `sort_by_common_dep`/`sort_by_name_evr_array`,
/// which key off structured `name op version` rel-deps this crate's flat
/// `DepId` dependency strings don't carry.
pub fn sort_by_common_dep(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    let count = candidates.len();
    if count < 2 {
        return;
    }

    let mut entries: Vec<(usize, DepId, DepId)> = Vec::new();
    for (idx, &c) in candidates.iter().enumerate() {
        let s = pool.solvable(c).expect("valid solvable id");
        for &req in &s.requires {
            entries.push((idx, req, req));
        }
    }
    if entries.len() < 2 {
        return;
    }
    entries.sort_by(|a, b| a.1.0.cmp(&b.1.0).then(a.2.0.cmp(&b.2.0)).then(a.0.cmp(&b.0)));

    let mut badness = vec![0i32; count];
    let mut lastname: Option<DepId> = None;
    let mut bad = 0i32;
    let mut prev: Option<(usize, DepId)> = None;
    for &(idx, name, version) in &entries {
        if lastname == Some(name) {
            if let Some((prev_idx, prev_version)) = prev {
                if prev_idx != idx && prev_version.0 > version.0 {
                    bad += 1;
                }
            }
        } else {
            bad = 0;
            lastname = Some(name);
        }
        badness[idx] += bad;
        prev = Some((idx, version));
    }

    if badness.iter().all(|&b| b == 0) {
        return;
    }

    for (idx, &c) in candidates.iter().enumerate() {
        if pool.is_installed(c) {
            badness[idx] = 0;
        }
    }

    // stable insertion sort, ascending badness
    for i in 1..count {
        let mut j = i;
        while j > 0 && badness[j - 1] > badness[j] {
            badness.swap(j - 1, j);
            candidates.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Brings candidates with an installed same-named counterpart to the front,
/// preserving relative order within each group. Mirrors `move_installed_to_front`.
pub fn move_installed_to_front(pool: &Pool, candidates: &mut Vec<SolvableId>) {
    let (front, back): (Vec<SolvableId>, Vec<SolvableId>) = candidates.iter().copied().partition(|&c| {
        let name = pool.solvable(c).expect("valid solvable id").name;
        pool.is_installed(c) || pool.installed_with_name(name).is_some()
    });
    let mut out = front;
    out.extend(back);
    *candidates = out;
}

/// Brings favored candidates to the front and disfavored ones to the back.
/// Mirrors `policy_prefer_favored`/`sort_by_favor_cmp`.
pub fn prefer_favored(state: &SolverState, candidates: &mut Vec<SolvableId>) {
    if candidates.len() < 2 {
        return;
    }
    candidates.sort_by(|&a, &b| state.favor(b).cmp(&state.favor(a)));
}

/// "kernel-<flavor>-devel-<release>" names the development headers for
/// "kernel-<flavor>-<release>"; a "<flavor>-kernel-<release>-..." name
/// encodes the same split the other way around. Returns the matching
/// runtime kernel package name, if the candidate's name has this shape.
/// A reduced, `&str`-slicing stand-in for `urpm_reorder`'s fixed `char[256]`
/// buffer splicing.
fn kernel_counterpart_name(name: &str) -> Option<String> {
    if let Some(rest) = name.strip_prefix("kernel-") {
        let idx = rest.find("-devel-")?;
        let flavor = &rest[..idx];
        let release = &rest[idx + "-devel-".len()..];
        return Some(format!("kernel-{flavor}-{release}"));
    }
    let idx = name.find("-kernel-")?;
    let flavor = &name[..idx];
    let rest = &name[idx + "-kernel-".len()..];
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return Some(format!("kernel-{rest}-{flavor}"));
    }
    None
}

/// Scores a (possibly not-yet-interned) package name by how settled its
/// providers are: decided-in beats installed beats neither.
fn score_via_name(pool: &Pool, state: &SolverState, name: &str) -> i32 {
    let Some(name_id) = pool.lookup_name(name) else {
        return 1;
    };
    let dep = DepId(name_id);
    let mut score = 1;
    for &p in pool.whatprovides(dep) {
        if state.decision(p) == Some(true) {
            return 4;
        }
        if pool.is_installed(p) {
            score = 3;
        }
    }
    score
}

/// If `requires` names a `locales-<lang>` dependency, scores it: English
/// locales are always acceptable (score 2); other locales score like
/// `score_via_name` over their own providers.
fn locale_score(pool: &Pool, state: &SolverState, requires: &[DepId], locale_re: &regex::Regex) -> Option<i32> {
    for &req in requires {
        let text = pool.name_str(req.0);
        let Some(caps) = locale_re.captures(text) else {
            continue;
        };
        if caps[1].starts_with("en") {
            return Some(2);
        }
        let mut score = 0;
        for &p in pool.whatprovides(req) {
            if state.decision(p) == Some(true) {
                return Some(4);
            }
            if pool.is_installed(p) {
                score = 3;
            }
        }
        return Some(score);
    }
    None
}

/// Locale/kernel package reordering used by urpm-derived distros: prefer a
/// kernel-devel/locale package whose runtime counterpart is already decided
/// or installed over one whose counterpart is neither. Mirrors `urpm_reorder`.
pub fn urpm_reorder(pool: &Pool, state: &SolverState, candidates: &mut Vec<SolvableId>) {
    if candidates.len() < 2 {
        return;
    }
    let locale_re = regex::Regex::new(r"locales-(\w+)").expect("valid regex");

    let mut scored: Vec<(i32, SolvableId)> = candidates
        .iter()
        .map(|&c| {
            let s = pool.solvable(c).expect("valid solvable id");
            let name = pool.name_str(s.name).to_string();
            let mut score = 1;
            if let Some(counterpart) = kernel_counterpart_name(&name) {
                score = score_via_name(pool, state, &counterpart);
            }
            if score == 1 {
                if let Some(locale) = locale_score(pool, state, &s.requires, &locale_re) {
                    score = locale;
                }
            }
            (score, c)
        })
        .collect();

    if scored.iter().all(|&(score, _)| score == 1) {
        return;
    }
    scored.sort_by_key(|&(score, _)| std::cmp::Reverse(score));
    *candidates = scored.into_iter().map(|(_, c)| c).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::RepoKind;

    #[test]
    fn dislike_old_versions_bumps_the_stale_candidate_to_the_back() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let stale = pool.add_solvable(repo, "zlib", "1-1", arch, vendor).unwrap();
        let fresh = pool.add_solvable(repo, "zlib", "2-1", arch, vendor).unwrap();
        let mut candidates = vec![stale, fresh];
        dislike_old_versions(&pool, &mut candidates);
        assert_eq!(candidates, vec![fresh, stale]);
    }

    #[test]
    fn move_installed_to_front_keeps_installed_counterpart_first() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let installed_repo = pool.add_repository("@System", RepoKind::Installed, 0, 0);
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let installed = pool.add_solvable(installed_repo, "zlib", "1-1", arch, vendor).unwrap();
        let avail_other = pool.add_solvable(repo, "openssl", "1-1", arch, vendor).unwrap();
        let avail_same = pool.add_solvable(repo, "zlib", "2-1", arch, vendor).unwrap();
        let mut candidates = vec![avail_other, avail_same, installed];
        move_installed_to_front(&pool, &mut candidates);
        assert!(candidates[0] == installed || candidates[0] == avail_same);
        assert!(candidates.iter().position(|&c| c == avail_other) == Some(2));
    }

    #[test]
    fn urpm_reorder_prefers_kernel_devel_matching_an_installed_kernel() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let installed_repo = pool.add_repository("@System", RepoKind::Installed, 0, 0);
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let running_kernel = pool
            .add_solvable(installed_repo, "kernel-default-5.14.0", arch, vendor)
            .unwrap();
        let matching_devel = pool
            .add_solvable(repo, "kernel-default-devel-5.14.0", arch, vendor)
            .unwrap();
        let other_devel = pool
            .add_solvable(repo, "kernel-rt-devel-5.14.0", arch, vendor)
            .unwrap();
        let dep = pool.intern_dep("kernel-default-5.14.0");
        pool.add_provides(running_kernel, dep);

        let state = SolverState::new();
        let mut candidates = vec![other_devel, matching_devel];
        urpm_reorder(&pool, &state, &mut candidates);
        assert_eq!(candidates[0], matching_devel);
    }

    #[test]
    fn prefer_favored_sorts_descending_by_favor() {
        let mut pool = Pool::new();
        let arch = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let repo = pool.add_repository("r", RepoKind::Regular, 0, 0);
        let a = pool.add_solvable(repo, "a", "1-1", arch, vendor).unwrap();
        let b = pool.add_solvable(repo, "b", "1-1", arch, vendor).unwrap();
        let mut state = SolverState::new();
        state.set_favor(a, 1);
        state.set_favor(b, 5);
        let mut candidates = vec![a, b];
        prefer_favored(&state, &mut candidates);
        assert_eq!(candidates, vec![b, a]);
    }
}
