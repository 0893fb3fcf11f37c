//! Decompose random tensors, reconstruct them, and report error norms.
//!
//! Mirrors the two standard sanity checks for a TT implementation: exact
//! reconstruction of a small cube, and the error/rank trade-off of
//! rounding an incompressible random cube.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use ttchain::{frobenius_norm, tt_decompose, tt_round, DenseTensor};

fn random_cube(dim: usize, rng: &mut ChaCha8Rng) -> DenseTensor {
    DenseTensor::from_fn(vec![dim, dim, dim], |_| rng.random::<f64>())
}

fn main() -> ttchain::Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    // Decompose and reconstruct a 2x2x2 tensor.
    let t = random_cube(2, &mut rng);
    let chain = tt_decompose(&t)?;
    let recon = chain.to_dense()?;
    println!(
        "reconstruction error for a 2x2x2 tensor: {:e}",
        frobenius_norm(&(&recon - &t))
    );

    // Rounding sweep over an (incompressible) random 10x10x10 tensor.
    let t = random_cube(10, &mut rng);
    let chain = tt_decompose(&t)?;
    println!("natural bond ranks: {:?}", chain.bond_ranks());

    for rank in 1..=10 {
        let rounded = tt_round(&chain, &[rank, rank])?;
        let recon = rounded.to_dense()?;
        println!(
            "rounding error at bond ranks ({:2}, {:2}): {:e}",
            rank,
            rank,
            frobenius_norm(&(&recon - &t))
        );
    }

    Ok(())
}
