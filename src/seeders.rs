//! Instantiation of a platform seeder for the CSPRNGs.

use crate::commons::math::random::Seeder;

#[cfg(target_os = "macos")]
use tfhe_csprng::seeders::AppleSecureEnclaveSeeder;
#[cfg(target_family = "unix")]
use tfhe_csprng::seeders::UnixSeeder;

/// Return the best seeder available on the current platform.
///
/// # Panics
///
/// Panics when no seeder is available for the target.
pub fn new_seeder() -> Box<dyn Seeder> {
    let mut seeder: Option<Box<dyn Seeder>> = None;

    #[cfg(target_os = "macos")]
    {
        if AppleSecureEnclaveSeeder::is_available() {
            seeder = Some(Box::new(AppleSecureEnclaveSeeder));
        }
    }

    #[cfg(target_family = "unix")]
    {
        if seeder.is_none() && UnixSeeder::is_available() {
            seeder = Some(Box::new(UnixSeeder::new(0)));
        }
    }

    seeder.expect("No compatible seeder found for the current machine")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeder_produces_distinct_seeds() {
        let mut seeder = new_seeder();
        assert_ne!(seeder.seed(), seeder.seed());
    }
}
