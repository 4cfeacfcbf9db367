//! Client versions and the protocol era derived from them
//!
//! Wire layouts changed at fixed client builds. A [`ProtocolEra`] captures the
//! negotiated version for one connection and answers "is this layout revision
//! active" through named predicates, so packet dispatch never compares raw
//! version numbers itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Client version `major.minor.build.revision`
///
/// Ordering is lexicographic over the four components. Legacy letter
/// suffixes (`5.0.0a`, `3.0.8z`) map onto the revision, `a` = 1 through `z` = 26.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientVersion {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub revision: u8,
}

impl ClientVersion {
    /// 3.0.8z: map display gains a facet field
    pub const CV_308Z: ClientVersion = ClientVersion::new(3, 0, 8, 26);
    /// 5.0.0a: health bar status updates carry a body
    pub const CV_500A: ClientVersion = ClientVersion::new(5, 0, 0, 1);
    /// 6.0.1.7: container items carry a grid index
    pub const CV_6017: ClientVersion = ClientVersion::new(6, 0, 1, 7);
    /// 6.0.14.2: locked features flags widen to 32 bits
    pub const CV_60142: ClientVersion = ClientVersion::new(6, 0, 14, 2);
    /// 7.0.9.0: quest arrow serial, container type, multi hue, item SA trailer
    pub const CV_7090: ClientVersion = ClientVersion::new(7, 0, 9, 0);
    /// 7.0.13.0: extended city list entries
    pub const CV_70130: ClientVersion = ClientVersion::new(7, 0, 13, 0);
    /// 7.0.33.1: equipment hue always present
    pub const CV_70331: ClientVersion = ClientVersion::new(7, 0, 33, 1);

    pub const fn new(major: u8, minor: u8, build: u8, revision: u8) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Packed `major << 24 | minor << 16 | build << 8 | revision`
    pub fn as_u32(&self) -> u32 {
        (self.major as u32) << 24
            | (self.minor as u32) << 16
            | (self.build as u32) << 8
            | self.revision as u32
    }
}

impl Default for ClientVersion {
    fn default() -> Self {
        Self::new(7, 0, 34, 6)
    }
}

impl fmt::Display for ClientVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
    }
}

/// Error returned when a version string cannot be parsed
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid client version: {0:?}")]
pub struct ParseVersionError(pub String);

impl FromStr for ClientVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(s.to_string());
        let text = s.trim();
        if text.is_empty() {
            return Err(invalid());
        }

        let mut parts = [0u8; 4];
        let mut count = 0;

        for segment in text.split('.') {
            if count == parts.len() {
                return Err(invalid());
            }

            // "0a" style segment: digits then a single trailing letter
            let (digits, letter) = match segment.char_indices().last() {
                Some((i, c)) if c.is_ascii_alphabetic() => (&segment[..i], Some(c)),
                _ => (segment, None),
            };

            parts[count] = digits.parse::<u8>().map_err(|_| invalid())?;
            count += 1;

            if let Some(c) = letter {
                if count != 3 {
                    return Err(invalid());
                }
                parts[3] = c.to_ascii_lowercase() as u8 - b'a' + 1;
                count = 4;
            }
        }

        if count < 3 {
            return Err(invalid());
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

/// Wire-layout revisions active for one connection
///
/// Supplied by the caller to every dispatch call and never mutated by the
/// decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolEra {
    version: ClientVersion,
}

impl ProtocolEra {
    pub const fn new(version: ClientVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> ClientVersion {
        self.version
    }

    fn at_least(&self, threshold: ClientVersion) -> bool {
        self.version >= threshold
    }

    /// Map display (0xF5) carries a facet
    pub fn map_facet(&self) -> bool {
        self.at_least(ClientVersion::CV_308Z)
    }

    /// Health bar status (0x16/0x17) carries a body
    pub fn health_bar_status(&self) -> bool {
        self.at_least(ClientVersion::CV_500A)
    }

    /// Container items (0x25/0x3C) carry a grid index byte
    pub fn container_grid_index(&self) -> bool {
        self.at_least(ClientVersion::CV_6017)
    }

    /// Locked features (0xB9) flags are 32-bit instead of 16-bit
    pub fn locked_features_32bit(&self) -> bool {
        self.at_least(ClientVersion::CV_60142)
    }

    /// Quest arrow (0xBA) carries a trailing serial
    pub fn quest_arrow_serial(&self) -> bool {
        self.at_least(ClientVersion::CV_7090)
    }

    /// Open container (0x24) carries a container type
    pub fn open_container_type(&self) -> bool {
        self.at_least(ClientVersion::CV_7090)
    }

    /// Multi placement (0x99) carries a hue
    pub fn multi_placement_hue(&self) -> bool {
        self.at_least(ClientVersion::CV_7090)
    }

    /// Item SA update (0xF3) carries a trailing word
    pub fn item_sa_trailer(&self) -> bool {
        self.at_least(ClientVersion::CV_7090)
    }

    /// Character list (0xA9) uses the extended city entry
    pub fn extended_city_list(&self) -> bool {
        self.at_least(ClientVersion::CV_70130)
    }

    /// Equipment entries (0x78/0xD3) always carry a hue
    pub fn equipment_hue_always(&self) -> bool {
        self.at_least(ClientVersion::CV_70331)
    }
}

impl From<ClientVersion> for ProtocolEra {
    fn from(version: ClientVersion) -> Self {
        Self::new(version)
    }
}

impl fmt::Display for ProtocolEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client {}", self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted() {
        let v: ClientVersion = "7.0.34.6".parse().unwrap();
        assert_eq!(v, ClientVersion::new(7, 0, 34, 6));
        assert_eq!(v.to_string(), "7.0.34.6");

        let v: ClientVersion = "7.0.9".parse().unwrap();
        assert_eq!(v, ClientVersion::CV_7090);
    }

    #[test]
    fn test_parse_letter_suffix() {
        assert_eq!("5.0.0a".parse::<ClientVersion>().unwrap(), ClientVersion::CV_500A);
        assert_eq!("3.0.8z".parse::<ClientVersion>().unwrap(), ClientVersion::CV_308Z);
        assert_eq!("3.0.8Z".parse::<ClientVersion>().unwrap(), ClientVersion::CV_308Z);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ClientVersion>().is_err());
        assert!("7.0".parse::<ClientVersion>().is_err());
        assert!("7.0.x.1".parse::<ClientVersion>().is_err());
        assert!("7.0.1.2.3".parse::<ClientVersion>().is_err());
        assert!("7a.0.1".parse::<ClientVersion>().is_err());
        assert!("300.0.1".parse::<ClientVersion>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(ClientVersion::CV_308Z < ClientVersion::CV_500A);
        assert!(ClientVersion::CV_6017 < ClientVersion::CV_60142);
        assert!(ClientVersion::CV_60142 < ClientVersion::CV_7090);
        assert!(ClientVersion::CV_7090 < ClientVersion::CV_70130);
        assert!(ClientVersion::CV_70130 < ClientVersion::CV_70331);
        assert_eq!(ClientVersion::CV_7090.as_u32(), 0x0700_0900);
    }

    #[test]
    fn test_era_thresholds() {
        let old = ProtocolEra::new(ClientVersion::new(6, 0, 1, 6));
        let grid = ProtocolEra::new(ClientVersion::CV_6017);
        assert!(!old.container_grid_index());
        assert!(grid.container_grid_index());
        assert!(!grid.locked_features_32bit());

        let modern = ProtocolEra::default();
        assert!(modern.quest_arrow_serial());
        assert!(modern.equipment_hue_always());
        assert!(modern.extended_city_list());

        let just_before = ProtocolEra::new(ClientVersion::new(7, 0, 8, 99));
        assert!(!just_before.quest_arrow_serial());
        assert!(!just_before.item_sa_trailer());
    }
}
