use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::{Binomial, Discrete};

use isodist::algorithm::fold::{convolve, convolve_counts, convolve_pow};
use isodist::{FoldingConfig, IsotopeDistribution, Peak};

const SPACING: f64 = 1.0033548378;

fn random_distribution(rng: &mut StdRng) -> IsotopeDistribution {
    let n = rng.gen_range(1..=5);
    let base = rng.gen_range(1.0..100.0);
    let peaks = (0..n)
        .map(|i| Peak::new(base + i as f64 * SPACING, rng.gen_range(0.01..1.0)))
        .collect();
    let mut dist = IsotopeDistribution::from_peaks(peaks, rng.gen_range(1..100));
    dist.normalize(0.0);
    dist
}

fn assert_close(a: &IsotopeDistribution, b: &IsotopeDistribution, tolerance: f64) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.nominal_mass(), b.nominal_mass());
    for (x, y) in a.peaks().iter().zip(b.peaks()) {
        assert!((x.mass - y.mass).abs() < tolerance, "mass {} != {}", x.mass, y.mass);
        assert!((x.abundance - y.abundance).abs() < tolerance, "abundance {} != {}", x.abundance, y.abundance);
    }
}

#[test_log::test]
fn test_repeated_folding_follows_binomial() {
    let p = 0.0107;
    let n = 100;
    let config = FoldingConfig::new(20, 1e-12).unwrap();
    let two_state = IsotopeDistribution::from(vec![(0.0, 1.0 - p), (1.0, p)]);

    let result = convolve_pow(&two_state, n, &config);
    let binomial = Binomial::new(p, n as u64).unwrap();

    assert_eq!(result.len(), 20);
    for (k, peak) in result.peaks().iter().enumerate() {
        assert!((peak.abundance - binomial.pmf(k as u64)).abs() < 1e-10, "position {}", k);
        if peak.abundance > 1e-200 {
            assert!((peak.mass - k as f64).abs() < 1e-9, "position {}", k);
        }
    }
}

#[test_log::test]
fn test_empty_is_identity() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = FoldingConfig::default();
    let empty = IsotopeDistribution::new();

    for _ in 0..20 {
        let x = random_distribution(&mut rng);
        assert_eq!(convolve(&x, &empty, &config), x);
        assert_eq!(convolve(&empty, &x, &config), x);
    }
}

#[test_log::test]
fn test_fold_is_commutative_and_additive() {
    let mut rng = StdRng::seed_from_u64(11);
    let config = FoldingConfig::new(16, 1e-12).unwrap();

    for _ in 0..20 {
        let x = random_distribution(&mut rng);
        let y = random_distribution(&mut rng);
        let xy = convolve(&x, &y, &config);
        let yx = convolve(&y, &x, &config);

        assert_eq!(xy.nominal_mass(), x.nominal_mass() + y.nominal_mass());
        assert_close(&xy, &yx, 1e-9);
        assert!((xy.average_mass() - (x.average_mass() + y.average_mass())).abs() < 1e-9);
    }
}

#[test_log::test]
fn test_normalized_sum_within_tolerance() {
    let mut rng = StdRng::seed_from_u64(3);
    let tolerance = 1e-9;

    for _ in 0..20 {
        let peaks = (0..rng.gen_range(1..8))
            .map(|i| Peak::new(i as f64, rng.gen_range(0.001..10.0)))
            .collect();
        let mut dist = IsotopeDistribution::from_peaks(peaks, 0);
        dist.normalize(tolerance);
        assert!((dist.abundance_sum() - 1.0).abs() <= tolerance);

        let before = dist.clone();
        dist.normalize(tolerance);
        assert_eq!(dist, before);
    }
}

#[test_log::test]
fn test_power_matches_sequential_folding() {
    let mut rng = StdRng::seed_from_u64(5);
    let config = FoldingConfig::new(64, 1e-12).unwrap();

    for _ in 0..10 {
        let x = random_distribution(&mut rng);
        let mut sequential = x.clone();
        for power in 2..=4 {
            sequential = convolve(&sequential, &x, &config);
            assert_close(&convolve_pow(&x, power, &config), &sequential, 1e-9);
        }
        assert_eq!(convolve_pow(&x, 0, &config), x);
        assert_eq!(convolve_pow(&x, 1, &config), x);
    }
}

#[test_log::test]
fn test_composition_average_mass() {
    let config = FoldingConfig::fine();
    let carbon = IsotopeDistribution::from(vec![(12.0, 0.9893), (13.0033548378, 0.0107)]).with_nominal_mass(12);
    let hydrogen = IsotopeDistribution::from(vec![(1.0078250319, 0.999885), (2.0141017779, 0.000115)]).with_nominal_mass(1);
    let oxygen = IsotopeDistribution::from(vec![(15.9949146221, 0.99757), (16.9991315, 0.00038), (17.9991604, 0.00205)])
        .with_nominal_mass(16);

    // glucose, C6H12O6
    let glucose = convolve_counts(&[(carbon.clone(), 6), (hydrogen.clone(), 12), (oxygen.clone(), 6)], &config);
    let expected = 6.0 * carbon.average_mass() + 12.0 * hydrogen.average_mass() + 6.0 * oxygen.average_mass();

    assert_eq!(glucose.nominal_mass(), 180);
    assert!((glucose.average_mass() - expected).abs() < 1e-6);
    assert!((glucose.mass(0).unwrap() - 180.0633881).abs() < 1e-6);
    assert!(glucose.abundance(0).unwrap() > glucose.abundance(1).unwrap());
}
