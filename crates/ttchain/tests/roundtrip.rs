use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ttchain::{
    frobenius_norm, tt_decompose, tt_round, DenseTensor, Tensor3Ops, TensorTrainError,
};

fn random_tensor(rng: &mut ChaCha8Rng, dims: Vec<usize>) -> DenseTensor {
    DenseTensor::from_fn(dims, |_| rng.random::<f64>())
}

fn reconstruction_error(tt: &ttchain::TensorTrain, reference: &DenseTensor) -> f64 {
    let recon = tt.to_dense().expect("reconstruct should succeed");
    frobenius_norm(&(&recon - reference))
}

#[test]
fn test_exact_reconstruction_2x2x2() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let t = random_tensor(&mut rng, vec![2, 2, 2]);

    let tt = tt_decompose(&t).expect("decompose should succeed");
    assert!(reconstruction_error(&tt, &t) < 1e-10);
}

#[test]
fn test_exact_reconstruction_mixed_dims() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for dims in [vec![3, 4], vec![2, 5, 3], vec![2, 3, 2, 4]] {
        let t = random_tensor(&mut rng, dims.clone());
        let tt = tt_decompose(&t).expect("decompose should succeed");

        assert_eq!(tt.mode_dims(), dims);
        let scale = frobenius_norm(&t);
        assert!(
            reconstruction_error(&tt, &t) < 1e-10 * scale.max(1.0),
            "reconstruction failed for shape {:?}",
            dims
        );
    }
}

#[test]
fn test_rank_one_identity() {
    // Decomposing a vector yields one core equal to the reshaped input.
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let t = random_tensor(&mut rng, vec![7]);

    let tt = tt_decompose(&t).expect("decompose should succeed");
    assert_eq!(tt.len(), 1);
    let core = tt.core(0);
    assert_eq!(
        (core.left_rank(), core.mode_dim(), core.right_rank()),
        (1, 7, 1)
    );
    assert_eq!(reconstruction_error(&tt, &t), 0.0);
}

#[test]
fn test_full_rank_rounding_is_idempotent() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let t = random_tensor(&mut rng, vec![4, 5, 4]);

    let tt = tt_decompose(&t).expect("decompose should succeed");
    let natural = tt.bond_ranks();
    let rounded = tt_round(&tt, &natural).expect("round should succeed");

    assert_eq!(rounded.bond_ranks(), natural);
    assert!(reconstruction_error(&rounded, &t) < 1e-10);
}

#[test]
fn test_rounding_error_monotone_in_rank() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let t = random_tensor(&mut rng, vec![10, 10, 10]);
    let tt = tt_decompose(&t).expect("decompose should succeed");

    let mut prev_err = f64::INFINITY;
    for r in 1..=10 {
        let rounded = tt_round(&tt, &[r, r]).expect("round should succeed");
        let err = reconstruction_error(&rounded, &t);
        assert!(
            err <= prev_err + 1e-8,
            "error increased from {} to {} at rank {}",
            prev_err,
            err,
            r
        );
        prev_err = err;
    }
}

#[test]
fn test_rounding_scenario_10x10x10() {
    // A generic random 10x10x10 tensor is incompressible: rank (1, 1)
    // loses a lot, the full natural ranks lose nothing.
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let t = random_tensor(&mut rng, vec![10, 10, 10]);
    let tt = tt_decompose(&t).expect("decompose should succeed");

    let crushed = tt_round(&tt, &[1, 1]).expect("round should succeed");
    let full = tt_round(&tt, &[10, 10]).expect("round should succeed");

    let err_crushed = reconstruction_error(&crushed, &t);
    let err_full = reconstruction_error(&full, &t);

    assert!(err_full < 1e-10, "full-rank rounding error {}", err_full);
    assert!(
        err_crushed > 1e3 * err_full.max(1e-13),
        "rank-1 rounding should lose substantially more: {} vs {}",
        err_crushed,
        err_full
    );
}

#[test]
fn test_rounded_chain_ranks_are_min_of_request_and_bound() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let t = random_tensor(&mut rng, vec![10, 10, 10]);
    let tt = tt_decompose(&t).expect("decompose should succeed");
    assert_eq!(tt.bond_ranks(), vec![10, 10]);

    let rounded = tt_round(&tt, &[3, 7]).expect("round should succeed");
    assert_eq!(rounded.bond_ranks(), vec![3, 7]);

    // Requests above the natural bound are capped to it.
    let capped = tt_round(&tt, &[50, 7]).expect("round should succeed");
    assert_eq!(capped.bond_ranks(), vec![10, 7]);

    // Adjacent cores agree on every bond.
    for chain in [&rounded, &capped] {
        for i in 0..chain.len() - 1 {
            assert_eq!(chain.core(i).right_rank(), chain.core(i + 1).left_rank());
        }
    }
}

#[test]
fn test_round_rejects_malformed_profiles() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let t = random_tensor(&mut rng, vec![3, 3, 3]);
    let tt = tt_decompose(&t).expect("decompose should succeed");
    let cores_before: Vec<_> = tt.cores().to_vec();

    assert!(matches!(
        tt_round(&tt, &[2]),
        Err(TensorTrainError::InvalidRankProfile { .. })
    ));
    assert!(matches!(
        tt_round(&tt, &[2, 2, 2]),
        Err(TensorTrainError::InvalidRankProfile { .. })
    ));
    assert!(matches!(
        tt_round(&tt, &[2, 0]),
        Err(TensorTrainError::InvalidRankProfile { .. })
    ));

    // The input chain is untouched by failed requests.
    for (a, b) in cores_before.iter().zip(tt.cores()) {
        for l in 0..a.left_rank() {
            for s in 0..a.mode_dim() {
                for r in 0..a.right_rank() {
                    assert_eq!(a[[l, s, r]], b[[l, s, r]]);
                }
            }
        }
    }
}

#[test]
fn test_rounding_preserves_compressible_tensor() {
    // A sum of two separable terms has TT ranks at most 2; rounding to 2
    // is lossless even though the natural unfoldings start larger.
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let a: Vec<f64> = (0..6).map(|_| rng.random()).collect();
    let b: Vec<f64> = (0..6).map(|_| rng.random()).collect();
    let c: Vec<f64> = (0..6).map(|_| rng.random()).collect();
    let d: Vec<f64> = (0..6).map(|_| rng.random()).collect();
    let e: Vec<f64> = (0..6).map(|_| rng.random()).collect();
    let f: Vec<f64> = (0..6).map(|_| rng.random()).collect();

    let t = DenseTensor::from_fn(vec![6, 6, 6], |idx| {
        a[idx[0]] * b[idx[1]] * c[idx[2]] + d[idx[0]] * e[idx[1]] * f[idx[2]]
    });

    let tt = tt_decompose(&t).expect("decompose should succeed");
    assert!(tt.bond_ranks().iter().all(|&r| r <= 2));

    let rounded = tt_round(&tt, &[2, 2]).expect("round should succeed");
    let scale = frobenius_norm(&t);
    assert!(reconstruction_error(&rounded, &t) < 1e-10 * scale.max(1.0));
}

#[test]
fn test_evaluate_matches_dense_entries() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let t = random_tensor(&mut rng, vec![3, 2, 4]);
    let tt = tt_decompose(&t).expect("decompose should succeed");

    for i in 0..3 {
        for j in 0..2 {
            for k in 0..4 {
                let direct = tt.evaluate(&[i, j, k]).expect("in range");
                assert!(
                    (direct - t.get(&[i, j, k])).abs() < 1e-10,
                    "mismatch at [{}, {}, {}]",
                    i,
                    j,
                    k
                );
            }
        }
    }
}
