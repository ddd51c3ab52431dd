pub mod error;
pub mod fairing;
pub mod gouge;
pub mod hull;
pub mod jig;
pub mod math;
pub mod util;

pub use error::{FairlineError, Result};
