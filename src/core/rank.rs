//! Rank lookup.
//!
//! The printer only needs one integer from the parallel runtime, so that query
//! sits behind the [`RankProvider`] trait. [`LauncherEnv`] answers it from the
//! variables that `mpirun`/`mpiexec`/`srun` export into every spawned process,
//! and [`FixedRank`] answers it with a constant (single-process runs, tests).
//! A rank read from the MPI runtime itself lives in [`MpiWorld`](crate::MpiWorld).

use crate::core::error::{PrintError, Result};

/// Identifier of a process within a parallel job.
pub type Rank = u32;

/// Variables carrying the rank, in lookup order. The first one is an explicit override.
pub const RANK_VARS: &[&str] = &[
    "MPI_PRINT_RANK",
    "OMPI_COMM_WORLD_RANK",
    "PMIX_RANK",
    "PMI_RANK",
    "MV2_COMM_WORLD_RANK",
    "PALS_RANKID",
    "ALPS_APP_PE",
    "JSM_NAMESPACE_RANK",
    "SLURM_PROCID",
];

/// Variables carrying the number of processes in the job, in lookup order.
pub const SIZE_VARS: &[&str] = &[
    "MPI_PRINT_SIZE",
    "OMPI_COMM_WORLD_SIZE",
    "PMI_SIZE",
    "MV2_COMM_WORLD_SIZE",
    "JSM_NAMESPACE_SIZE",
    "SLURM_NTASKS",
];

/// Capability to report the rank of the calling process.
pub trait RankProvider: Send + Sync {
    fn rank(&self) -> Result<Rank>;
}

/// A provider that always reports the same rank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedRank(pub Rank);

impl RankProvider for FixedRank {
    fn rank(&self) -> Result<Rank> {
        Ok(self.0)
    }
}

impl<P: RankProvider + ?Sized> RankProvider for &P {
    fn rank(&self) -> Result<Rank> {
        (**self).rank()
    }
}

impl<P: RankProvider + ?Sized> RankProvider for Box<P> {
    fn rank(&self) -> Result<Rank> {
        (**self).rank()
    }
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads the rank from the launcher environment.
///
/// Only the launchers listed in [`RANK_VARS`] are recognised. Under any other
/// launcher, and for children created with `MPI_Comm_spawn`, no variable is
/// found and a non-strict provider reports rank 0 for every process. Use
/// [`LauncherEnv::strict`] or an attached [`MpiWorld`](crate::MpiWorld) when
/// that matters.
pub struct LauncherEnv {
    lookup: Lookup,
    strict: bool,
}

impl LauncherEnv {
    /// Without any launcher variable the process is treated as a singleton run (rank 0).
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`LauncherEnv::new`], but a missing launcher variable is an error.
    pub fn strict() -> Self {
        Self::new().require_launcher(true)
    }

    /// Builds a provider on top of an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
            strict: false,
        }
    }

    pub fn require_launcher(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Number of processes in the job.
    pub fn world_size(&self) -> Result<u32> {
        match self.first_of(SIZE_VARS)? {
            Some(0) => Err(PrintError::RuntimeUnavailable(
                "launcher reported an empty world".to_string(),
            )),
            Some(size) => Ok(size),
            None if self.strict => Err(not_launched()),
            None => Ok(1),
        }
    }

    fn first_of(&self, keys: &[&str]) -> Result<Option<u32>> {
        for key in keys {
            let Some(raw) = (self.lookup)(key) else {
                continue;
            };
            return match parse_index(&raw) {
                Some(value) => {
                    log::debug!("{} = {}", key, value);
                    Ok(Some(value))
                }
                None => {
                    log::warn!("{}={:?} is not a process index", key, raw);
                    Err(PrintError::RuntimeUnavailable(format!(
                        "{key}={raw:?} is not a valid process index"
                    )))
                }
            };
        }
        Ok(None)
    }
}

impl Default for LauncherEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LauncherEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LauncherEnv")
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

impl RankProvider for LauncherEnv {
    fn rank(&self) -> Result<Rank> {
        let rank = match self.first_of(RANK_VARS)? {
            Some(rank) => rank,
            None if self.strict => return Err(not_launched()),
            None => return Ok(0),
        };
        if let Some(size) = self.first_of(SIZE_VARS)? {
            if rank >= size {
                return Err(PrintError::RuntimeUnavailable(format!(
                    "launcher rank {rank} is outside a world of {size}"
                )));
            }
        }
        Ok(rank)
    }
}

/// Plain decimal digits only: no sign, no empty string.
fn parse_index(raw: &str) -> Option<u32> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn not_launched() -> PrintError {
    PrintError::RuntimeUnavailable(format!(
        "no launcher rank variable set (looked for {})",
        RANK_VARS.join(", ")
    ))
}

/// Rank of the calling process, as [`DefaultProvider`](crate::DefaultProvider) reports it.
pub fn mpi_rank() -> Result<Rank> {
    crate::core::world::DefaultProvider::new().rank()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> LauncherEnv {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LauncherEnv::from_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_fixed_rank() {
        assert_eq!(FixedRank(3).rank().unwrap(), 3);
        assert_eq!(FixedRank::default().rank().unwrap(), 0);
    }

    #[test]
    fn test_singleton_run_is_rank_zero() {
        let provider = env(&[]);
        assert_eq!(provider.rank().unwrap(), 0);
        assert_eq!(provider.world_size().unwrap(), 1);
    }

    #[test]
    fn test_strict_without_launcher_fails() {
        let provider = env(&[]).require_launcher(true);
        assert!(matches!(
            provider.rank(),
            Err(PrintError::RuntimeUnavailable(_))
        ));
        assert!(matches!(
            provider.world_size(),
            Err(PrintError::RuntimeUnavailable(_))
        ));
    }

    #[test]
    fn test_open_mpi_variables() {
        let provider = env(&[("OMPI_COMM_WORLD_RANK", "5"), ("OMPI_COMM_WORLD_SIZE", "8")]);
        assert_eq!(provider.rank().unwrap(), 5);
        assert_eq!(provider.world_size().unwrap(), 8);
    }

    #[test]
    fn test_override_wins_over_launcher() {
        let provider = env(&[("MPI_PRINT_RANK", "1"), ("PMI_RANK", "7")]);
        assert_eq!(provider.rank().unwrap(), 1);
    }

    #[test]
    fn test_slurm_fallback() {
        let provider = env(&[("SLURM_PROCID", " 12 "), ("SLURM_NTASKS", "16")]);
        assert_eq!(provider.rank().unwrap(), 12);
        assert_eq!(provider.world_size().unwrap(), 16);
    }

    #[test]
    fn test_malformed_rank_is_unavailable() {
        let provider = env(&[("PMI_RANK", "-1")]);
        match provider.rank() {
            Err(PrintError::RuntimeUnavailable(msg)) => assert!(msg.contains("PMI_RANK")),
            other => panic!("expected RuntimeUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_signed_index_is_unavailable() {
        assert!(env(&[("PMI_RANK", "+5")]).rank().is_err());
        assert!(env(&[("PMI_SIZE", "+8")]).world_size().is_err());
        assert!(env(&[("PMI_RANK", "")]).rank().is_err());
    }

    #[test]
    fn test_rank_outside_world_is_unavailable() {
        let provider = env(&[("PMI_RANK", "4"), ("PMI_SIZE", "4")]);
        assert!(matches!(
            provider.rank(),
            Err(PrintError::RuntimeUnavailable(_))
        ));
        let provider = env(&[("PMI_RANK", "3"), ("PMI_SIZE", "4")]);
        assert_eq!(provider.rank().unwrap(), 3);
    }

    #[test]
    fn test_other_launchers() {
        for var in ["ALPS_APP_PE", "JSM_NAMESPACE_RANK", "PALS_RANKID"] {
            let provider = env(&[(var, "3")]).require_launcher(true);
            assert_eq!(provider.rank().unwrap(), 3, "{var}");
        }
    }

    #[test]
    fn test_zero_world_size_is_unavailable() {
        let provider = env(&[("PMI_SIZE", "0")]);
        assert!(provider.world_size().is_err());
    }

    #[test]
    fn test_provider_behind_reference_and_box() {
        let fixed = FixedRank(2);
        let by_ref: &dyn RankProvider = &fixed;
        assert_eq!(by_ref.rank().unwrap(), 2);
        let boxed: Box<dyn RankProvider> = Box::new(fixed);
        assert_eq!(boxed.rank().unwrap(), 2);
    }
}
