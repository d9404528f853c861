//! Generated identifiers and one-time codes.
//!
//! All randomness here comes from `SmallRng`, a fast non-cryptographic
//! generator.

use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Produces 6-digit numeric one-time codes.
pub trait OtpGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator: uniform over `100000..=999999`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOtp;

impl OtpGenerator for RandomOtp {
    fn generate(&self) -> String {
        random_digits(6)
    }
}

/// `n` decimal digits with a non-zero leading digit.
fn random_digits(n: u32) -> String {
    let mut rng = SmallRng::from_os_rng();
    let low = 10u64.pow(n - 1);
    rng.random_range(low..low * 10).to_string()
}

/// `SCH` + HHMMSS + 3 random digits, e.g. `SCH151530482`.
pub fn school_code(now: DateTime<Utc>) -> String {
    format!("SCH{}{}", now.format("%H%M%S"), random_digits(3))
}

/// `BUS` + HHMMSS + 3 random digits, e.g. `BUS154530123`.
pub fn bus_id(now: DateTime<Utc>) -> String {
    format!("BUS{}{}", now.format("%H%M%S"), random_digits(3))
}

/// YYYYMMDDHHMMSS + 6 random digits.
pub fn student_id(now: DateTime<Utc>) -> String {
    format!("{}{}", now.format("%Y%m%d%H%M%S"), random_digits(6))
}

pub fn driver_id(now: DateTime<Utc>) -> String {
    format!("driver_{}", now.timestamp_millis())
}

/// Upload file name: `<prefix>_<millis>_<4 digits>.jpg`.
pub fn upload_file_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}_{}_{}.jpg", now.timestamp_millis(), random_digits(4))
}
