use std::fmt;
use std::fmt::{Display, Formatter};
use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};

/// A single (mass, abundance) entry of an isotope distribution.
///
/// The default peak is the zero peak `(0.0, 0.0)`, which is what a
/// distribution is padded with during folding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Peak {
    pub mass: f64,
    pub abundance: f64,
}

impl Peak {
    pub fn new(mass: f64, abundance: f64) -> Self {
        Peak { mass, abundance }
    }
}

impl From<(f64, f64)> for Peak {
    fn from((mass, abundance): (f64, f64)) -> Self {
        Peak::new(mass, abundance)
    }
}

impl From<Peak> for (f64, f64) {
    fn from(peak: Peak) -> Self {
        (peak.mass, peak.abundance)
    }
}

impl Display for Peak {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mass, self.abundance)
    }
}
