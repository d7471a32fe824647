//! Epoch:version-release parsing and rpm-family version comparison.

mod comparator;
mod error;
mod rpmvercmp;
mod version;

pub use comparator::Comparator;
pub use error::EvrParseError;
pub use rpmvercmp::rpmvercmp;
pub use version::Evr;
