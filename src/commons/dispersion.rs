//! Measures of the dispersion of the noise distributions, normalised to the
//! torus: multiply by the ciphertext modulus to obtain the absolute scale.

use serde::{Deserialize, Serialize};

/// The standard deviation of a noise distribution, normalised to the torus.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct StandardDev(pub f64);

impl StandardDev {
    pub fn get_variance(self) -> Variance {
        Variance(self.0 * self.0)
    }
}

/// The variance of a noise distribution, normalised to the torus.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Variance(pub f64);

impl Variance {
    pub fn get_standard_dev(self) -> StandardDev {
        StandardDev(self.0.sqrt())
    }
}
