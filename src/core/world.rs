//! Rank and size taken from an initialized MPI runtime.
//!
//! The world communicator is queried once, when the runtime is attached, and the
//! answer is kept for the rest of the process. Rank and size cannot change after
//! `MPI_Init`, so later lookups never go back to the runtime.

use std::sync::OnceLock;

use crate::core::error::{PrintError, Result};
use crate::core::rank::{LauncherEnv, Rank, RankProvider};

static WORLD: OnceLock<MpiWorld> = OnceLock::new();

/// Position of this process in `MPI_COMM_WORLD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MpiWorld {
    rank: Rank,
    size: u32,
}

impl MpiWorld {
    /// Checks and records the world reported by an MPI binding.
    ///
    /// The first recorded world wins; recording again returns the stored one.
    pub fn record<R, S>(rank: R, size: S) -> Result<Self>
    where
        R: TryInto<u32> + std::fmt::Display + Copy,
        S: TryInto<u32> + std::fmt::Display + Copy,
    {
        let world = Self::checked(rank, size)?;
        let stored = *WORLD.get_or_init(|| world);
        if stored != world {
            log::warn!(
                "MPI world already recorded as {:?}, ignoring {:?}",
                stored,
                world
            );
        } else {
            log::debug!("MPI world: rank {} of {}", world.rank, world.size);
        }
        Ok(stored)
    }

    /// Reads rank and size from the world communicator of `mpi` and records them.
    #[cfg(feature = "ferrompi")]
    pub fn attach(mpi: &ferrompi::Mpi) -> Result<Self> {
        let world = mpi.world();
        let rank = world.rank();
        let size = world.size();
        Self::record(rank, size)
    }

    /// The recorded world, if an MPI runtime was attached.
    pub fn current() -> Result<Self> {
        WORLD.get().copied().ok_or_else(|| {
            PrintError::RuntimeUnavailable(
                "MPI is not initialized (no world attached)".to_string(),
            )
        })
    }

    pub fn is_attached() -> bool {
        WORLD.get().is_some()
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    fn checked<R, S>(rank: R, size: S) -> Result<Self>
    where
        R: TryInto<u32> + std::fmt::Display + Copy,
        S: TryInto<u32> + std::fmt::Display + Copy,
    {
        let bad = |what: &str| {
            PrintError::RuntimeUnavailable(format!(
                "MPI reported {what} (rank {rank}, size {size})"
            ))
        };
        let r: u32 = rank.try_into().map_err(|_| bad("a negative rank"))?;
        let s: u32 = size.try_into().map_err(|_| bad("a negative size"))?;
        if s == 0 || r >= s {
            return Err(bad("a rank outside the world"));
        }
        Ok(Self { rank: r, size: s })
    }
}

impl RankProvider for MpiWorld {
    fn rank(&self) -> Result<Rank> {
        Ok(self.rank)
    }
}

/// The provider used by [`AttributedPrinter::new`](crate::AttributedPrinter::new) and
/// [`mpi_rank`](crate::mpi_rank).
///
/// An attached MPI world always answers first. Without one:
/// - with the `ferrompi` feature, the lookup fails with `RuntimeUnavailable`;
/// - otherwise it falls back to [`LauncherEnv`].
#[derive(Debug, Default)]
pub struct DefaultProvider {
    launcher: LauncherEnv,
}

impl DefaultProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `launcher` when no MPI world is attached (ignored with the `ferrompi` feature).
    pub fn with_launcher(launcher: LauncherEnv) -> Self {
        Self { launcher }
    }
}

impl RankProvider for DefaultProvider {
    fn rank(&self) -> Result<Rank> {
        if let Some(world) = WORLD.get() {
            return Ok(world.rank);
        }
        if cfg!(feature = "ferrompi") {
            return MpiWorld::current().map(|w| w.rank);
        }
        self.launcher.rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_world() {
        let world = MpiWorld::checked(2, 4).unwrap();
        assert_eq!(world.rank().unwrap(), 2);
        assert_eq!(world.size(), 4);
    }

    #[test]
    fn test_checked_rejects_negative_rank() {
        assert!(matches!(
            MpiWorld::checked(-1i32, 4i32),
            Err(PrintError::RuntimeUnavailable(_))
        ));
    }

    #[test]
    fn test_checked_rejects_rank_outside_world() {
        assert!(MpiWorld::checked(4, 4).is_err());
        assert!(MpiWorld::checked(0, 0).is_err());
    }
}
