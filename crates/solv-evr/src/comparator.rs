//! Evr comparison utilities, facade-style like the version comparators this
//! crate's lineage has always exposed.

use crate::error::EvrParseError;
use crate::version::Evr;

/// Comparator for comparing `[epoch:]version[-release]` strings.
pub struct Comparator;

impl Comparator {
    pub fn greater_than(a: &str, b: &str) -> Result<bool, EvrParseError> {
        Ok(Evr::parse(a)? > Evr::parse(b)?)
    }

    pub fn greater_than_or_equal_to(a: &str, b: &str) -> Result<bool, EvrParseError> {
        Ok(Evr::parse(a)? >= Evr::parse(b)?)
    }

    pub fn less_than(a: &str, b: &str) -> Result<bool, EvrParseError> {
        Ok(Evr::parse(a)? < Evr::parse(b)?)
    }

    pub fn less_than_or_equal_to(a: &str, b: &str) -> Result<bool, EvrParseError> {
        Ok(Evr::parse(a)? <= Evr::parse(b)?)
    }

    pub fn equal_to(a: &str, b: &str) -> Result<bool, EvrParseError> {
        Ok(Evr::parse(a)? == Evr::parse(b)?)
    }

    pub fn not_equal_to(a: &str, b: &str) -> Result<bool, EvrParseError> {
        Ok(Evr::parse(a)? != Evr::parse(b)?)
    }
}
