/// Release version parsing and ordering
use std::cmp::Ordering;
use std::fmt;

use super::error::UpdateError;

/// A release version: `major.minor[.patch][-pre_release]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Pre-release tag (e.g. "beta.1", "rc2")
    pub pre_release: Option<String>,
}

impl Version {
    /// Parse a version or release tag.
    ///
    /// A leading `v` is ignored and a missing patch number counts as zero,
    /// so tags such as `v3.1.1`, `3.0` and `3.2.0-beta` are all accepted.
    ///
    /// ```
    /// use psm::update::Version;
    ///
    /// let v = Version::parse("v3.1").unwrap();
    /// assert_eq!((v.major, v.minor, v.patch), (3, 1, 0));
    /// ```
    pub fn parse(s: &str) -> Result<Self, UpdateError> {
        let trimmed = s.trim();
        let s = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let (numbers, pre_release) = match s.split_once('-') {
            Some((n, pre)) if !pre.is_empty() => (n, Some(pre.to_string())),
            Some(_) => return Err(UpdateError::InvalidVersion(format!("Empty pre-release tag in {:?}", trimmed))),
            None => (s, None),
        };

        let parts: Vec<&str> = numbers.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(UpdateError::InvalidVersion(format!(
                "Expected 2 or 3 version components in {:?}, got {}",
                trimmed,
                parts.len()
            )));
        }

        let component = |raw: &str| {
            raw.parse::<u64>()
                .map_err(|_| UpdateError::InvalidVersion(format!("Invalid component {:?} in {:?}", raw, trimmed)))
        };

        Ok(Version {
            major: component(parts[0])?,
            minor: component(parts[1])?,
            patch: match parts.get(2) {
                Some(p) => component(p)?,
                None => 0,
            },
            pre_release,
        })
    }

    /// Version of the running binary.
    pub fn current() -> Self {
        // Cargo enforces semver for package versions.
        Self::parse(env!("CARGO_PKG_VERSION")).unwrap_or(Version {
            major: 0,
            minor: 0,
            patch: 0,
            pre_release: None,
        })
    }

    pub fn is_newer_than(&self, other: &Version) -> bool {
        self > other
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre_release, &other.pre_release) {
                // A stable release sorts after its own pre-releases.
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_tags() {
        let v = Version::parse("v3.1.1").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (3, 1, 1));
        assert_eq!(v.pre_release, None);

        let v = Version::parse("3.2.0-beta.1").unwrap();
        assert_eq!(v.pre_release.as_deref(), Some("beta.1"));
    }

    #[test]
    fn test_parse_two_components() {
        assert_eq!(Version::parse("2.1").unwrap().to_string(), "2.1.0");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Version::parse("3").is_err());
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("a.b.c").is_err());
        assert!(Version::parse("1.0.0-").is_err());
        assert!(Version::parse("<html>").is_err());
    }

    #[test]
    fn test_ordering() {
        let older = Version::parse("3.0.9").unwrap();
        let newer = Version::parse("3.1.0").unwrap();
        let beta = Version::parse("3.1.0-beta").unwrap();
        let rc = Version::parse("3.1.0-rc1").unwrap();

        assert!(newer.is_newer_than(&older));
        assert!(newer.is_newer_than(&beta));
        assert!(rc.is_newer_than(&beta));
        assert!(beta.is_newer_than(&older));
        assert!(!newer.is_newer_than(&newer.clone()));
    }

    #[test]
    fn test_current_matches_package() {
        assert_eq!(Version::current().to_string(), env!("CARGO_PKG_VERSION"));
    }
}
