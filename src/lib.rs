//! # mpi-print
//!
//! Attributed printing for multi-process programs.
//!
//! When many MPI ranks share one terminal their output interleaves and nobody
//! can tell which process said what. Every call here prefixes its output with
//! the rank of the calling process and a timestamp:
//!
//! ```text
//!
//! MPI rank: 3 [timestamp: 2023-02-02 20:48:26.544420]
//!
//! Hello, world.
//! ```
//!
//! The whole block is assembled in memory first and written with a single
//! call, so the header and body of one call are never separated by output
//! from another thread of the same process. Ordering *between* processes is
//! not coordinated.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mpi_print::prelude::*;
//!
//! // Rank comes from an attached MPI world, else from the launcher
//! // (mpirun, mpiexec, srun); 0 when run alone.
//! attributed_print!("Hello,", "world.")?;
//!
//! let printer = AttributedPrinter::with_provider(FixedRank(2));
//! let mut log: Vec<u8> = Vec::new();
//! printer.print(&[&"a", &"b"], PrintOptions::new().sep("-").sink(&mut log))?;
//! # Ok::<(), PrintError>(())
//! ```
//!
//! `print!` and `println!` are left alone; attributed output is always opt-in.
//!
//! ## Module Organization
//!
//! - [`AttributedPrinter`], [`PrintOptions`], [`PrinterConfig`]: the printer and its knobs
//! - [`RankProvider`], [`MpiWorld`], [`LauncherEnv`], [`FixedRank`], [`DefaultProvider`]:
//!   where the rank comes from
//! - [`Clock`], [`TimestampFormat`]: where the timestamp comes from
//! - [`Sink`], [`CaptureSink`]: where the block goes
//!
//! ## Features
//!
//! - `tokio`: [`AttributedPrinter::print_async`] for `tokio::io::AsyncWrite` sinks
//! - `ferrompi`: `MpiWorld::attach` reads the rank from `MPI_COMM_WORLD`; the
//!   default provider then requires an attached world instead of reading the
//!   launcher environment

// ============================================================================
// Core Module
// ============================================================================

mod core;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use crate::core::clock::{Clock, FixedClock, SystemClock, TimestampFormat};
pub use crate::core::error::{PrintError, Result};
pub use crate::core::printer::{attributed_print, AttributedPrinter, PrintOptions, PrinterConfig};
#[cfg(feature = "tokio")]
pub use crate::core::printer::AsyncPrintOptions;
pub use crate::core::rank::{mpi_rank, FixedRank, LauncherEnv, Rank, RankProvider, RANK_VARS, SIZE_VARS};
pub use crate::core::render::{header, render_block, render_values, strip_continuation_space};
pub use crate::core::sink::{CaptureSink, Sink};
pub use crate::core::world::{DefaultProvider, MpiWorld};

/// Imports everything needed to print with attribution.
///
/// # Example
/// ```rust
/// use mpi_print::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        attributed_print, mpi_rank, AttributedPrinter, CaptureSink, Clock, DefaultProvider,
        FixedClock, FixedRank, LauncherEnv, MpiWorld, PrintError, PrintOptions, PrinterConfig,
        RankProvider, Sink, SystemClock, TimestampFormat,
    };
}

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
