//! Prints one attributed block to stdout and appends one to a log file.
//!
//! Run alone:
//!   cargo run --example attributed_output
//! or under a launcher to see one block per rank:
//!   mpirun -n 4 target/debug/examples/attributed_output
//! With `--features ferrompi` the rank comes from `MPI_COMM_WORLD` instead of
//! the launcher environment.

use mpi_print::prelude::*;
use std::fs::OpenOptions;

fn main() -> Result<(), PrintError> {
    #[cfg(feature = "ferrompi")]
    let _mpi = {
        let mpi = ferrompi::Mpi::init()
            .map_err(|e| PrintError::RuntimeUnavailable(format!("MPI_Init failed: {e:?}")))?;
        MpiWorld::attach(&mpi)?;
        mpi
    };

    let rank = mpi_rank()?;

    attributed_print!(format!("-*# rank {rank} print to stdout #*-"))?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("mpi_print.output.txt")?;
    attributed_print!(
        PrintOptions::new().sink(&mut file);
        format!("-*# rank {rank} print to 'mpi_print.output.txt' #*-")
    )?;

    Ok(())
}
