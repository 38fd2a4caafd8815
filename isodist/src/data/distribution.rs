use std::fmt;
use std::fmt::{Display, Formatter};
use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};

use crate::algorithm::fold::{convolve, convolve_pow};
use crate::config::FoldingConfig;
use crate::data::peak::Peak;

/// Represents a discrete isotope distribution.
///
/// # Description
///
/// Peaks are kept in index order: index 0 is the lightest isotope position and
/// every following index is the next isotope spacing. Folding addresses peaks
/// by index, never by mass, so the order is never re-sorted.
///
/// `nominal_mass` is an integer tag that is added up on every fold. It is not
/// derived from the peak masses.
///
/// Equality is strict: masses, abundances and nominal mass have to match exactly.
/// Compare folded results with a tolerance instead.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct IsotopeDistribution {
    peaks: Vec<Peak>,
    nominal_mass: i32,
}

impl IsotopeDistribution {
    /// Constructs an empty distribution, the neutral operand of folding.
    pub fn new() -> Self {
        IsotopeDistribution::default()
    }

    /// Constructs a distribution with a single peak of 100% abundance.
    ///
    /// # Arguments
    ///
    /// * `mass` - mass of the only isotope
    ///
    /// # Example
    ///
    /// ```rust
    /// # use isodist::IsotopeDistribution;
    /// let carbon = IsotopeDistribution::from_single_mass(12.0);
    /// assert_eq!(carbon.len(), 1);
    /// assert_eq!(carbon.abundance(0), Some(1.0));
    /// assert_eq!(carbon.nominal_mass(), 0);
    /// ```
    pub fn from_single_mass(mass: f64) -> Self {
        IsotopeDistribution {
            peaks: vec![Peak::new(mass, 1.0)],
            nominal_mass: 0,
        }
    }

    /// Constructs a distribution from peaks in isotope order.
    pub fn from_peaks(peaks: Vec<Peak>, nominal_mass: i32) -> Self {
        IsotopeDistribution { peaks, nominal_mass }
    }

    pub fn with_nominal_mass(mut self, nominal_mass: i32) -> Self {
        self.nominal_mass = nominal_mass;
        self
    }

    pub fn nominal_mass(&self) -> i32 {
        self.nominal_mass
    }

    pub fn set_nominal_mass(&mut self, nominal_mass: i32) {
        self.nominal_mass = nominal_mass;
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn peak(&self, index: usize) -> Option<&Peak> {
        self.peaks.get(index)
    }

    pub fn mass(&self, index: usize) -> Option<f64> {
        self.peaks.get(index).map(|peak| peak.mass)
    }

    pub fn abundance(&self, index: usize) -> Option<f64> {
        self.peaks.get(index).map(|peak| peak.abundance)
    }

    /// Masses of all peaks in index order.
    pub fn masses(&self) -> Vec<f64> {
        self.peaks.iter().map(|peak| peak.mass).collect()
    }

    /// Abundances of all peaks in index order.
    pub fn abundances(&self) -> Vec<f64> {
        self.peaks.iter().map(|peak| peak.abundance).collect()
    }

    pub fn abundance_sum(&self) -> f64 {
        self.peaks.iter().map(|peak| peak.abundance).sum()
    }

    /// Expected mass, the abundance weighted sum of all peak masses.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use isodist::IsotopeDistribution;
    /// let dist = IsotopeDistribution::from(vec![(12.0, 0.5), (13.0, 0.5)]);
    /// assert_eq!(dist.average_mass(), 12.5);
    /// ```
    pub fn average_mass(&self) -> f64 {
        self.peaks.iter().map(|peak| peak.mass * peak.abundance).sum()
    }

    /// Rescales abundances so they sum up to 1.
    ///
    /// Nothing happens if the sum is already within `abundance_sum_error` of 1,
    /// or if the sum is not positive.
    ///
    /// # Arguments
    ///
    /// * `abundance_sum_error` - accepted distance of the abundance sum from 1
    ///
    /// # Example
    ///
    /// ```rust
    /// # use isodist::IsotopeDistribution;
    /// let mut dist = IsotopeDistribution::from(vec![(100.0, 3.0), (101.0, 1.0)]);
    /// dist.normalize(1e-6);
    /// assert_eq!(dist.abundances(), vec![0.75, 0.25]);
    /// ```
    pub fn normalize(&mut self, abundance_sum_error: f64) {
        let sum = self.abundance_sum();
        if sum > 0.0 && (sum - 1.0).abs() > abundance_sum_error {
            let scale = 1.0 / sum;
            for peak in self.peaks.iter_mut() {
                peak.abundance *= scale;
            }
        }
    }

    /// Folds this distribution with `other`, see [`convolve`].
    pub fn fold(&self, other: &IsotopeDistribution, config: &FoldingConfig) -> IsotopeDistribution {
        convolve(self, other, config)
    }

    /// Folds this distribution with itself `power` times, see [`convolve_pow`].
    pub fn fold_pow(&self, power: u32, config: &FoldingConfig) -> IsotopeDistribution {
        convolve_pow(self, power, config)
    }

    /// Returns the peaks in the `Vec<(f64, f64)>` mass/abundance layout.
    pub fn to_tuples(&self) -> Vec<(f64, f64)> {
        self.peaks.iter().map(|&peak| peak.into()).collect()
    }
}

impl From<Vec<(f64, f64)>> for IsotopeDistribution {
    fn from(peaks: Vec<(f64, f64)>) -> Self {
        IsotopeDistribution::from_peaks(peaks.into_iter().map(Peak::from).collect(), 0)
    }
}

impl Display for IsotopeDistribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for peak in &self.peaks {
            writeln!(f, "{}", peak)?;
        }
        Ok(())
    }
}
