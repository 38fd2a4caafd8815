use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, trace};

use crate::config::FoldingConfig;
use crate::data::distribution::IsotopeDistribution;
use crate::data::peak::Peak;
use crate::error::IsoError;

/// convolve two isotope distributions, keeping the first `config.size` isotope positions
///
/// Peaks are addressed by position: output slot `k` collects every pair of
/// input positions `(i, k - i)`. Its abundance is the summed product of the
/// pair abundances, its mass the abundance weighted mean of the pair mass sums.
/// Positions past the end of an operand count as zero peaks. The result holds
/// `min(size, len_a + len_b - 1)` peaks, zero abundance peaks of the operands
/// keep their slot. A `size` of 0 is treated as 1. Nominal masses are added with
/// wrapping arithmetic. The result is normalized.
///
/// Arguments:
///
/// * `dist_a` - first distribution
/// * `dist_b` - second distribution
/// * `config` - truncation size and normalization tolerance
///
/// Returns:
///
/// * `IsotopeDistribution` - folded distribution, nominal mass is the sum of both inputs
///
/// # Examples
///
/// ```
/// use isodist::{FoldingConfig, IsotopeDistribution};
/// use isodist::algorithm::fold::convolve;
///
/// let config = FoldingConfig::new(3, 1e-6).unwrap();
/// let carbon = IsotopeDistribution::from_single_mass(12.0);
/// let result = convolve(&carbon, &carbon, &config);
/// assert_eq!(result.to_tuples(), vec![(24.0, 1.0)]);
/// ```
pub fn convolve(dist_a: &IsotopeDistribution, dist_b: &IsotopeDistribution, config: &FoldingConfig) -> IsotopeDistribution {

    if dist_b.is_empty() {
        return dist_a.clone();
    }
    if dist_a.is_empty() {
        return dist_b.clone();
    }

    let a = dist_a.peaks();
    let b = dist_b.peaks();
    let size = config.size.max(1).min(a.len() + b.len() - 1);
    let mut dest = vec![Peak::default(); size];

    for (k, slot) in dest.iter_mut().enumerate() {
        let mut abundance_sum = 0.0;
        let mut mass_abundance_sum = 0.0;

        // i walks forward through a while k - i walks back through b
        let first = k.saturating_sub(b.len() - 1);
        let last = k.min(a.len() - 1);

        for i in first..=last {
            let (peak_a, peak_b) = (&a[i], &b[k - i]);
            let abundance = peak_a.abundance * peak_b.abundance;
            abundance_sum += abundance;
            mass_abundance_sum += abundance * (peak_a.mass + peak_b.mass);
        }

        slot.abundance = abundance_sum;
        slot.mass = if abundance_sum != 0.0 { mass_abundance_sum / abundance_sum } else { 0.0 };
    }

    trace!(
        "folded {} x {} peaks into {} (size {})",
        a.len(),
        b.len(),
        dest.len(),
        config.size
    );

    let nominal_mass = dist_a.nominal_mass().wrapping_add(dist_b.nominal_mass());
    let mut result = IsotopeDistribution::from_peaks(dest, nominal_mass);
    result.normalize(config.abundance_sum_error);
    result
}

/// convolve a distribution with itself `power` times by repeated squaring
///
/// Needs O(log(power)) convolutions. `power` of 0 or 1 returns the input unchanged.
///
/// Arguments:
///
/// * `dist` - distribution to exponentiate
/// * `power` - number of identical components
/// * `config` - truncation size and normalization tolerance
///
/// Returns:
///
/// * `IsotopeDistribution` - distribution of `power` independent copies of `dist`
///
/// # Examples
///
/// ```
/// use isodist::{FoldingConfig, IsotopeDistribution};
/// use isodist::algorithm::fold::convolve_pow;
///
/// let config = FoldingConfig::new(4, 1e-9).unwrap();
/// let dist = IsotopeDistribution::from(vec![(100.0, 0.5), (101.0, 0.5)]);
/// let result = convolve_pow(&dist, 2, &config);
/// assert_eq!(result.to_tuples(), vec![(200.0, 0.25), (201.0, 0.5), (202.0, 0.25)]);
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(power = power))]
pub fn convolve_pow(dist: &IsotopeDistribution, power: u32, config: &FoldingConfig) -> IsotopeDistribution {
    if power <= 1 {
        return dist.clone();
    }

    let mut square = dist.clone();
    let mut result = if power & 1 == 1 {
        square.clone()
    } else {
        IsotopeDistribution::new()
    };

    let mut remaining = power >> 1;
    while remaining > 0 {
        square = convolve(&square, &square, config);
        if remaining & 1 == 1 {
            result = convolve(&result, &square, config);
        }
        remaining >>= 1;
    }

    result
}

/// fold several components, each raised to its count, into one distribution
///
/// Arguments:
///
/// * `components` - pairs of component distribution and how often it occurs
/// * `config` - truncation size and normalization tolerance
///
/// Returns:
///
/// * `IsotopeDistribution` - combined distribution, empty if nothing has a positive count
///
/// # Examples
///
/// ```
/// use isodist::{FoldingConfig, IsotopeDistribution};
/// use isodist::algorithm::fold::convolve_counts;
///
/// let config = FoldingConfig::default();
/// let hydrogen = IsotopeDistribution::from_single_mass(1.0).with_nominal_mass(1);
/// let oxygen = IsotopeDistribution::from_single_mass(16.0).with_nominal_mass(16);
/// let water = convolve_counts(&[(hydrogen, 2), (oxygen, 1)], &config);
/// assert_eq!(water.to_tuples(), vec![(18.0, 1.0)]);
/// assert_eq!(water.nominal_mass(), 18);
/// ```
pub fn convolve_counts(components: &[(IsotopeDistribution, u32)], config: &FoldingConfig) -> IsotopeDistribution {
    components
        .iter()
        .filter(|(_, count)| *count > 0)
        .fold(IsotopeDistribution::new(), |cumulative, (dist, count)| {
            convolve(&cumulative, &convolve_pow(dist, *count, config), config)
        })
}

/// parallel version of `convolve_pow`
///
/// Arguments:
///
/// * `dists` - distributions to exponentiate
/// * `powers` - power for each distribution
/// * `config` - truncation size and normalization tolerance, shared by all workers
/// * `num_threads` - number of threads to use
///
/// Returns:
///
/// * `Vec<IsotopeDistribution>` - results in input order
///
pub fn convolve_pow_batch(
    dists: &[IsotopeDistribution],
    powers: &[u32],
    config: &FoldingConfig,
    num_threads: usize,
) -> Result<Vec<IsotopeDistribution>, IsoError> {
    if dists.len() != powers.len() {
        return Err(IsoError::LengthMismatch {
            distributions: dists.len(),
            powers: powers.len(),
        });
    }

    let thread_pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
    debug!("exponentiating {} distributions on {} threads", dists.len(), num_threads);

    let result: Vec<IsotopeDistribution> = thread_pool.install(|| {
        dists.par_iter().zip(powers.par_iter()).map(|(dist, &power)| {
            convolve_pow(dist, power, config)
        }).collect()
    });

    Ok(result)
}
