//! Login-phase records: rejections, server list, relay, characters and features

use crate::flags::{BodyConvFlags, CharacterListFlags, LockedFeatureFlags};
use crate::reader::PacketReader;
use serde::Serialize;
use std::net::Ipv4Addr;
use uodecode_core::Result;

/// 0x82 / 0x85 / 0x53 - Login, character delete or generic error code
///
/// The three packets share one byte; the meaning of the code depends on which
/// id carried it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginError {
    pub code: u8,
}

impl LoginError {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self { code: r.read_u8()? })
    }
}

/// 0xA8 - Game server list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerList {
    pub flags: u8,
    pub servers: Vec<ServerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerEntry {
    pub index: u16,
    pub name: String,
    pub percent_full: u8,
    pub timezone: u8,
    /// Big-endian on the wire, unlike the relay address
    pub address: Ipv4Addr,
}

impl ServerList {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let flags = r.read_u8()?;
        let count = r.read_u16()? as usize;

        let mut servers = Vec::with_capacity(count.min(r.remaining() / 40));
        for _ in 0..count {
            servers.push(ServerEntry {
                index: r.read_u16()?,
                name: r.read_ascii(32)?,
                percent_full: r.read_u8()?,
                timezone: r.read_u8()?,
                address: Ipv4Addr::from(r.read_u32()?),
            });
        }

        Ok(Self { flags, servers })
    }
}

/// 0x8C - Relay to the selected game server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerRelay {
    pub address: Ipv4Addr,
    pub port: u16,
    pub seed: u32,
}

impl ServerRelay {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        // the address octets travel in reverse order
        let address = Ipv4Addr::from(r.read_u32_le()?);
        Ok(Self {
            address,
            port: r.read_u16()?,
            seed: r.read_u32()?,
        })
    }
}

// ============================================================================
// CHARACTERS
// ============================================================================

/// 0x86 - Character slots after a delete
///
/// Empty slots come back as empty names; the slot count is preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterSlots {
    pub characters: Vec<String>,
}

impl CharacterSlots {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let count = r.read_u8()?;

        let mut characters = Vec::with_capacity(count as usize);
        for _ in 0..count {
            characters.push(r.read_ascii(30)?);
            // password field, always blank
            r.skip(30)?;
        }

        Ok(Self { characters })
    }
}

/// 0xA9 - Character and starting city list
///
/// ```text
/// count u8, count * (name ascii(30), password(30))
/// cities u8
///   7.0.13.0+: index u8, name ascii(32), building ascii(32),
///              x u32, y u32, z u32, map u32, description cliloc u32, reserved u32
///   older:     index u8, name ascii(31), building ascii(31)
/// flags u32
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterList {
    pub characters: Vec<String>,
    pub cities: Vec<StartingCity>,
    pub flags: CharacterListFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartingCity {
    pub index: u8,
    pub name: String,
    pub building: String,
    /// Present only in the extended city layout
    pub location: Option<CityLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityLocation {
    pub x: u16,
    pub y: u16,
    pub z: i8,
    pub map: u32,
    pub description: u32,
}

impl CharacterList {
    /// Extended city layout
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, true)
    }

    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, false)
    }

    fn decode_with(r: &mut PacketReader<'_>, extended: bool) -> Result<Self> {
        let characters = CharacterSlots::decode(r)?.characters;

        let count = r.read_u8()?;
        let mut cities = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let city = if extended {
                let index = r.read_u8()?;
                let name = r.read_ascii(32)?;
                let building = r.read_ascii(32)?;
                // coordinates are sent as u32 but only the low bits are used
                let location = CityLocation {
                    x: r.read_u32()? as u16,
                    y: r.read_u32()? as u16,
                    z: r.read_u32()? as i8,
                    map: r.read_u32()?,
                    description: r.read_u32()?,
                };
                r.skip(4)?;

                StartingCity {
                    index,
                    name,
                    building,
                    location: Some(location),
                }
            } else {
                StartingCity {
                    index: r.read_u8()?,
                    name: r.read_ascii(31)?,
                    building: r.read_ascii(31)?,
                    location: None,
                }
            };
            cities.push(city);
        }

        let flags = CharacterListFlags::from_bits_retain(r.read_u32()?);

        Ok(Self {
            characters,
            cities,
            flags,
        })
    }
}

// ============================================================================
// FEATURES
// ============================================================================

/// 0xB9 - Locked client features
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockedFeatures {
    pub flags: LockedFeatureFlags,
    pub body_conversion: BodyConvFlags,
}

impl LockedFeatures {
    /// 32-bit layout
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self::from_flags(LockedFeatureFlags::from_bits_retain(
            r.read_u32()?,
        )))
    }

    /// 16-bit layout of older clients
    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self::from_flags(LockedFeatureFlags::from_bits_retain(
            r.read_u16()? as u32,
        )))
    }

    fn from_flags(flags: LockedFeatureFlags) -> Self {
        Self {
            flags,
            body_conversion: flags.body_conversion(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn field(text: &str, width: usize) -> Vec<u8> {
        let mut out = vec![0u8; width];
        out[..text.len()].copy_from_slice(text.as_bytes());
        out
    }

    #[test]
    fn test_server_relay_byte_order() {
        let body = hex!("01 00 00 7F 0A 21 DE AD BE EF");
        let relay = ServerRelay::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(relay.address, Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(relay.port, 2593);
        assert_eq!(relay.seed, 0xDEAD_BEEF);
    }

    #[test]
    fn test_server_list() {
        let mut body = hex!("5D 00 01 00 00").to_vec();
        body.extend(field("Shard", 32));
        body.extend_from_slice(&hex!("00 05 7F 00 00 01"));

        let list = ServerList::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(list.servers.len(), 1);
        assert_eq!(list.servers[0].name, "Shard");
        assert_eq!(list.servers[0].timezone, 5);
        assert_eq!(list.servers[0].address, Ipv4Addr::new(127, 0, 0, 1));
    }

    #[test]
    fn test_character_slots_keep_empty() {
        let mut body = vec![2u8];
        body.extend(field("Alice", 30));
        body.extend(vec![0u8; 30]);
        body.extend(vec![0u8; 60]);

        let slots = CharacterSlots::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(slots.characters, vec!["Alice".to_string(), String::new()]);
    }

    #[test]
    fn test_character_list_extended_cities() {
        let mut body = vec![1u8];
        body.extend(field("Alice", 30));
        body.extend(vec![0u8; 30]);
        body.push(1);
        body.push(0);
        body.extend(field("Britain", 32));
        body.extend(field("Inn", 32));
        body.extend_from_slice(&hex!(
            "00 00 05 A0 00 00 06 40 00 00 00 0A 00 00 00 01 00 10 2E 4B 00 00 00 00"
        ));
        body.extend_from_slice(&hex!("00 00 01 E8"));

        let list = CharacterList::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(list.cities[0].name, "Britain");
        let location = list.cities[0].location.as_ref().unwrap();
        assert_eq!(location.x, 1440);
        assert_eq!(location.z, 10);
        assert_eq!(location.map, 1);
        assert!(list.flags.contains(CharacterListFlags::CONTEXT_MENUS));
        assert!(list.flags.contains(CharacterListFlags::ELVEN_RACE));
    }

    #[test]
    fn test_character_list_legacy_cities() {
        let mut body = vec![0u8, 1, 3];
        body.extend(field("Moonglow", 31));
        body.extend(field("Docks", 31));
        body.extend_from_slice(&hex!("00 00 00 08"));

        let list = CharacterList::decode_legacy(&mut PacketReader::new(&body)).unwrap();
        assert!(list.characters.is_empty());
        assert_eq!(list.cities[0].index, 3);
        assert_eq!(list.cities[0].building, "Docks");
        assert!(list.cities[0].location.is_none());
    }

    #[test]
    fn test_locked_features_widths() {
        let body = hex!("80 1F");
        let legacy = LockedFeatures::decode_legacy(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(legacy.flags.bits(), 0x801F);

        let body = hex!("00 00 80 1F");
        let wide = LockedFeatures::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(wide.flags, legacy.flags);
        assert_eq!(wide.body_conversion, legacy.body_conversion);
    }
}
