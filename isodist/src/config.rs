//! Folding configuration.
//!
//! Holds the truncation size and the abundance-sum tolerance that every
//! convolution and normalization reads. Passed explicitly by reference so
//! several foldings with different settings can run side by side.

use serde::{Deserialize, Serialize};

use crate::error::IsoError;

/// Parameters shared by all folding operations.
///
/// Fields are public, `new` and `from_json` validate, struct literals do not.
/// Folding clamps a `size` of 0 to 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldingConfig {
    // Number of peaks computed per convolution
    pub size: usize,

    // Normalization is skipped if the abundance sum is within this distance of 1
    pub abundance_sum_error: f64,
}

impl Default for FoldingConfig {
    fn default() -> Self {
        Self {
            size: 10,
            abundance_sum_error: 1e-6,
        }
    }
}

impl FoldingConfig {
    /// Creates a validated configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use isodist::FoldingConfig;
    ///
    /// let config = FoldingConfig::new(20, 1e-8).unwrap();
    /// assert_eq!(config.size, 20);
    /// assert!(FoldingConfig::new(0, 1e-8).is_err());
    /// ```
    pub fn new(size: usize, abundance_sum_error: f64) -> Result<Self, IsoError> {
        let config = Self { size, abundance_sum_error };
        config.validate()?;
        Ok(config)
    }

    /// Few peaks, enough for small molecules and quick previews.
    pub fn coarse() -> Self {
        Self {
            size: 5,
            ..Self::default()
        }
    }

    /// Wide window with a tight tolerance, for large compositions.
    pub fn fine() -> Self {
        Self {
            size: 50,
            abundance_sum_error: 1e-9,
        }
    }

    pub fn validate(&self) -> Result<(), IsoError> {
        if self.size == 0 {
            return Err(IsoError::ZeroTruncationSize);
        }
        if !self.abundance_sum_error.is_finite() || self.abundance_sum_error < 0.0 {
            return Err(IsoError::InvalidTolerance(self.abundance_sum_error));
        }
        Ok(())
    }

    /// Parses a configuration from JSON, missing fields fall back to the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use isodist::FoldingConfig;
    ///
    /// let config = FoldingConfig::from_json(r#"{"size": 3}"#).unwrap();
    /// assert_eq!(config.size, 3);
    /// assert_eq!(config.abundance_sum_error, 1e-6);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, IsoError> {
        let config: FoldingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
