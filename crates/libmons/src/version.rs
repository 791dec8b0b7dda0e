// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Error, Result};

/// a `major.minor.patch[.revision]` version as used by everest.yaml.
///
/// pre-release and build suffixes (`-beta`, `+abc`) are accepted but do not
/// take part in ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub revision: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
        }
    }

    /// the version everest reports for a given build number (`1.<build>.0`).
    pub const fn runtime(build: u64) -> Self {
        Self::new(1, build, 0)
    }

    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        let core = trimmed
            .trim_start_matches(['v', 'V'])
            .split(['-', '+'])
            .next()
            .unwrap_or_default();

        let parts: Vec<&str> = core.split('.').collect();
        if core.is_empty() || parts.len() > 4 {
            return Err(Error::invalid_version(trimmed));
        }

        let mut numbers = [0u64; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| Error::invalid_version(trimmed))?;
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            revision: numbers[3],
        })
    }

    /// reads a build-number-only runtime version (`1.0.<build>`) as `1.<build>.0`.
    pub fn as_runtime(self) -> Self {
        if self.major == 1 && self.minor == 0 && self.patch > 0 {
            Self::runtime(self.patch)
        } else {
            self
        }
    }

    /// returns true if `self`, as the installed version, meets the `required` floor.
    ///
    /// the major version must match; a `0.0.*` requirement is always met.
    pub fn satisfies(&self, required: &Version) -> bool {
        if required.major == 0 && required.minor == 0 {
            return true;
        }

        if self.major != required.major {
            return false;
        }

        (self.minor, self.patch, self.revision).cmp(&(
            required.minor,
            required.patch,
            required.revision,
        )) != Ordering::Less
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.revision != 0 {
            write!(f, ".{}", self.revision)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

// everest.yaml files often leave versions unquoted, so `1` and `1.5` arrive as numbers.
impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VersionVisitor;

        impl de::Visitor<'_> for VersionVisitor {
            type Value = Version;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a version string")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Version::parse(v).map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Version::new(v, 0, 0))
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v)
                    .map(|v| Version::new(v, 0, 0))
                    .map_err(|_| E::custom(format!("negative version: {v}")))
            }

            fn visit_f64<E>(self, v: f64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Version::parse(&v.to_string()).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(VersionVisitor)
    }
}
