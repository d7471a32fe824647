//! The solvable/repository/pool data model the policy engine operates on.
//! This is a reduced stand-in for libsolv's `Pool`: it carries exactly the
//! fields the policy algorithms read (names, evrs, archs, vendors, the four
//! dependency lists, and repository priorities), not the on-disk repo
//! parser or the SAT clause storage, both of which are external collaborators.

pub mod arch;
pub mod cplxdeps;
mod intern;
pub mod vendor;

use std::cmp::Ordering;
use std::num::NonZeroU32;

use indexmap::IndexMap;
use solv_evr::Evr;

use crate::error::{PolicyError, Result};
use arch::ArchPolicy;
use intern::Interner;
use vendor::VendorPolicy;

macro_rules! interned_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);
    };
}

interned_id!(Arch);
interned_id!(Vendor);
interned_id!(DepId);
interned_id!(RepoId);

/// A solvable's pool-wide id. `0` is the reserved "unused" slot, matching
/// libsolv's convention that id 0 never names a real solvable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolvableId(pub NonZeroU32);

impl SolvableId {
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(SolvableId)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoKind {
    Installed,
    Regular,
}

#[derive(Debug, Clone)]
pub struct Repository {
    pub id: RepoId,
    pub name: String,
    pub kind: RepoKind,
    pub priority: i32,
    pub subpriority: i32,
}

impl Repository {
    pub fn is_installed(&self) -> bool {
        self.kind == RepoKind::Installed
    }
}

/// A single candidate package. Dependency lists are interned `DepId`s;
/// resolving a `DepId` back to the solvables providing it goes through
/// `Pool::whatprovides`.
#[derive(Debug, Clone)]
pub struct Solvable {
    pub id: SolvableId,
    pub repo: RepoId,
    pub name: u32,
    pub evr: Evr,
    pub arch: Arch,
    pub vendor: Vendor,
    pub provides: Vec<DepId>,
    pub obsoletes: Vec<DepId>,
    pub recommends: Vec<DepId>,
    pub suggests: Vec<DepId>,
    pub requires: Vec<DepId>,
    /// Recommends/suggests expressed as a boolean combination of other
    /// solvables rather than a single dependency string - `pool_is_complex_dep`
    /// entries in the original are interleaved with `recommends`/`suggests`;
    /// here they're a separate channel since `DepId` carries no expression
    /// structure of its own.
    pub complex_recommends: Vec<cplxdeps::CplxDep>,
    pub complex_suggests: Vec<cplxdeps::CplxDep>,
    /// Track-features count and build timestamp used only by the conda
    /// comparator variant (`policy::conda`); zero/None for every other use.
    pub track_features: u32,
    pub build_timestamp: Option<u64>,
}

#[derive(Debug, Default)]
pub struct Pool {
    names: Interner,
    vendors: Interner,
    archs: Interner,
    pub arch_policy: ArchPolicy,
    pub vendor_policy: VendorPolicy,
    solvables: IndexMap<u32, Solvable>,
    repositories: IndexMap<u32, Repository>,
    next_solvable_id: u32,
    next_repo_id: u32,
    whatprovides: IndexMap<DepId, Vec<SolvableId>>,
    pub noarch: Option<Arch>,
    /// When false, an obsoletes entry only matches a provider whose own
    /// name exactly names the dependency (no version range match) -
    /// `pool_match_nevr` in the original. Defaults to the common case.
    pub obsoleteusesprovides: bool,
    pub obsoleteusescolors: bool,
}

impl Pool {
    pub fn new() -> Self {
        Self {
            next_solvable_id: 1,
            next_repo_id: 1,
            obsoleteusesprovides: true,
            ..Default::default()
        }
    }

    pub fn intern_name(&mut self, name: &str) -> u32 {
        self.names.intern(name)
    }

    pub fn intern_vendor(&mut self, vendor: &str) -> Vendor {
        Vendor(self.vendors.intern(vendor))
    }

    pub fn intern_arch(&mut self, arch: &str) -> Arch {
        Arch(self.archs.intern(arch))
    }

    pub fn name_str(&self, name: u32) -> &str {
        self.names.resolve(name)
    }

    /// Looks up an already-interned name without creating a new one.
    /// Mirrors `pool_str2id(pool, name, 0)`'s "don't create" mode.
    pub fn lookup_name(&self, name: &str) -> Option<u32> {
        self.names.lookup(name)
    }

    pub fn vendor_str(&self, vendor: Vendor) -> &str {
        self.vendors.resolve(vendor.0)
    }

    pub fn arch_str(&self, arch: Arch) -> &str {
        self.archs.resolve(arch.0)
    }

    pub fn add_repository(&mut self, name: &str, kind: RepoKind, priority: i32, subpriority: i32) -> RepoId {
        let id = RepoId(self.next_repo_id);
        self.next_repo_id += 1;
        self.repositories.insert(
            id.0,
            Repository {
                id,
                name: name.to_string(),
                kind,
                priority,
                subpriority,
            },
        );
        id
    }

    pub fn repository(&self, id: RepoId) -> Result<&Repository> {
        self.repositories
            .get(&id.0)
            .ok_or(PolicyError::UnknownRepository(id.0))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_solvable(
        &mut self,
        repo: RepoId,
        name: &str,
        evr: &str,
        arch: Arch,
        vendor: Vendor,
    ) -> Result<SolvableId> {
        let id = SolvableId::new(self.next_solvable_id).expect("ids start at 1");
        self.next_solvable_id += 1;
        let name_id = self.names.intern(name);
        let evr = Evr::parse(evr).map_err(|source| PolicyError::InvalidEvr {
            name: name.to_string(),
            source,
        })?;
        let solvable = Solvable {
            id,
            repo,
            name: name_id,
            evr,
            arch,
            vendor,
            provides: Vec::new(),
            obsoletes: Vec::new(),
            recommends: Vec::new(),
            suggests: Vec::new(),
            requires: Vec::new(),
            complex_recommends: Vec::new(),
            complex_suggests: Vec::new(),
            track_features: 0,
            build_timestamp: None,
        };
        self.solvables.insert(id.get(), solvable);
        Ok(id)
    }

    pub fn solvable(&self, id: SolvableId) -> Result<&Solvable> {
        self.solvables
            .get(&id.get())
            .ok_or(PolicyError::UnknownSolvable(id.get()))
    }

    pub fn solvable_mut(&mut self, id: SolvableId) -> Result<&mut Solvable> {
        self.solvables
            .get_mut(&id.get())
            .ok_or(PolicyError::UnknownSolvable(id.get()))
    }

    pub fn intern_dep(&mut self, provides_str: &str) -> DepId {
        DepId(self.names.intern(provides_str))
    }

    /// Registers that `solvable` provides `dep`, keeping `whatprovides`
    /// consistent. Real pools rebuild this index in one pass after all
    /// solvables are loaded; we maintain it incrementally since there is no
    /// bulk-load step here.
    pub fn add_provides(&mut self, solvable: SolvableId, dep: DepId) {
        self.whatprovides.entry(dep).or_default().push(solvable);
    }

    pub fn whatprovides(&self, dep: DepId) -> &[SolvableId] {
        self.whatprovides
            .get(&dep)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_installed(&self, solvable: SolvableId) -> bool {
        self.repo_of(solvable)
            .map(|r| r.is_installed())
            .unwrap_or(false)
    }

    /// The dependency id a solvable's own name resolves to when treated as
    /// an unversioned "provides myself" entry.
    pub fn self_dep(&self, solvable: SolvableId) -> DepId {
        DepId(self.solvables[&solvable.get()].name)
    }

    /// Whether `candidate` actually satisfies `obs` the way an obsoletes
    /// entry requires: when `obsoleteusesprovides` is set, any provider is
    /// good enough (the common, loose case); otherwise the candidate must
    /// be the literal name the obsoletes entry names.
    pub fn match_nevr(&self, obs: DepId, candidate: SolvableId) -> bool {
        self.obsoleteusesprovides || self.self_dep(candidate) == obs
    }

    /// Color compatibility is out of scope (no multi-arch/biarch color
    /// model here); always compatible, matching `obsoleteusescolors = false`
    /// pools.
    pub fn colormatch(&self, _a: SolvableId, _b: SolvableId) -> bool {
        true
    }

    pub fn evrcmp(&self, a: SolvableId, b: SolvableId) -> Ordering {
        let a = self.solvables.get(&a.get()).expect("valid solvable id");
        let b = self.solvables.get(&b.get()).expect("valid solvable id");
        a.evr.cmp(&b.evr)
    }

    /// Every solvable sharing `name`, wherever it's loaded from. Stands in
    /// for a `FOR_PROVIDES` walk over the package's own (self-providing) name.
    pub fn solvables_named(&self, name: u32) -> impl Iterator<Item = &Solvable> {
        self.solvables.values().filter(move |s| s.name == name)
    }

    /// The installed solvable sharing `name`, if one is currently loaded.
    /// Used by reordering passes that need "is there an installed
    /// counterpart" without a full FOR_PROVIDES expansion.
    pub fn installed_with_name(&self, name: u32) -> Option<SolvableId> {
        self.solvables
            .values()
            .find(|s| s.name == name && self.is_installed(s.id))
            .map(|s| s.id)
    }

    pub fn repo_of(&self, solvable: SolvableId) -> Result<&Repository> {
        let s = self.solvable(solvable)?;
        self.repository(RepoId(s.repo.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_pool() -> (Pool, RepoId) {
        let mut pool = Pool::new();
        let repo = pool.add_repository("local", RepoKind::Regular, 0, 0);
        (pool, repo)
    }

    #[test]
    fn adding_a_solvable_assigns_sequential_nonzero_ids() {
        let (mut pool, repo) = fresh_pool();
        let x86_64 = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let a = pool.add_solvable(repo, "zlib", "1.2.11-1", x86_64, vendor).unwrap();
        let b = pool.add_solvable(repo, "zlib", "1.2.13-1", x86_64, vendor).unwrap();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
    }

    #[test]
    fn evrcmp_orders_by_version() {
        let (mut pool, repo) = fresh_pool();
        let x86_64 = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let old = pool.add_solvable(repo, "zlib", "1.2.11-1", x86_64, vendor).unwrap();
        let new = pool.add_solvable(repo, "zlib", "1.2.13-1", x86_64, vendor).unwrap();
        assert_eq!(pool.evrcmp(new, old), Ordering::Greater);
    }

    #[test]
    fn whatprovides_collects_all_providers() {
        let (mut pool, repo) = fresh_pool();
        let x86_64 = pool.intern_arch("x86_64");
        let vendor = pool.intern_vendor("acme");
        let a = pool.add_solvable(repo, "libfoo1", "1.0-1", x86_64, vendor).unwrap();
        let b = pool.add_solvable(repo, "libfoo2", "2.0-1", x86_64, vendor).unwrap();
        let dep = pool.intern_dep("libfoo");
        pool.add_provides(a, dep);
        pool.add_provides(b, dep);
        assert_eq!(pool.whatprovides(dep), &[a, b]);
    }

    #[test]
    fn unknown_solvable_id_is_an_error_not_a_panic() {
        let (pool, _repo) = fresh_pool();
        let bogus = SolvableId::new(999).unwrap();
        assert!(matches!(pool.solvable(bogus), Err(PolicyError::UnknownSolvable(999))));
    }
}
