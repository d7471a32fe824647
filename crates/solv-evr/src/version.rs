use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::EvrParseError;

/// A parsed `[epoch:]version[-release]` string, the unit rpm-family package
/// managers (and libsolv) use to order solvables of the same name.
///
/// Epoch defaults to `0` when absent, matching the convention that
/// `1.0-1` and `0:1.0-1` compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evr {
    pub epoch: u32,
    pub version: String,
    pub release: Option<String>,
}

impl Evr {
    pub fn parse(input: &str) -> Result<Self, EvrParseError> {
        if input.is_empty() {
            return Err(EvrParseError::Empty);
        }

        let (epoch, rest) = match input.split_once(':') {
            Some((epoch_str, rest)) => {
                let epoch = epoch_str
                    .parse::<u32>()
                    .map_err(|_| EvrParseError::InvalidEpoch(input.to_string()))?;
                (epoch, rest)
            }
            None => (0, input),
        };

        let (version, release) = match rest.rsplit_once('-') {
            Some((version, release)) => (version, Some(release.to_string())),
            None => (rest, None),
        };

        if version.is_empty() {
            return Err(EvrParseError::EmptyVersion(input.to_string()));
        }

        Ok(Evr {
            epoch,
            version: version.to_string(),
            release,
        })
    }
}

impl FromStr for Evr {
    type Err = EvrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Evr::parse(s)
    }
}

impl fmt::Display for Evr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.version)?;
        if let Some(release) = &self.release {
            write!(f, "-{release}")?;
        }
        Ok(())
    }
}

impl PartialOrd for Evr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Evr {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.epoch.cmp(&other.epoch) {
            Ordering::Equal => {}
            other_ord => return other_ord,
        }

        match crate::rpmvercmp(&self.version, &other.version) {
            Ordering::Equal => {}
            other_ord => return other_ord,
        }

        // missing release compares as empty, not as a wildcard
        let self_release = self.release.as_deref().unwrap_or("");
        let other_release = other.release.as_deref().unwrap_or("");
        crate::rpmvercmp(self_release, other_release)
    }
}
