//! Custom house design (0xD8)

use crate::compression::inflate;
use crate::reader::PacketReader;
use serde::Serialize;
use uodecode_core::{Result, Serial};

/// 0xD8 - Custom house contents
///
/// ```text
/// compression u8 (3 = zlib), enable_response bool, serial u32, revision u32,
/// reserved u32, plane_count u8, plane_count * (header u32, zlib(clen))
/// ```
///
/// Each plane header packs four fields:
///
/// ```text
/// bits 28..32  mode
/// bits 24..28  z
/// bits 16..24  low 8 bits of the decompressed length
/// bits  8..16  low 8 bits of the compressed length
/// bits  4..8   high 4 bits of the decompressed length
/// bits  0..4   high 4 bits of the compressed length
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomHouse {
    pub compressed: bool,
    pub enable_response: bool,
    pub serial: Serial,
    pub revision: u32,
    pub planes: Vec<HousePlane>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HousePlane {
    pub z: u8,
    /// 0 full entries, 1 flat floor entries, 2 packed tile grid
    pub mode: u8,
    /// Inflated plane payload
    pub data: Vec<u8>,
}

/// Plane header fields unpacked from the wire word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlaneHeader {
    decompressed_len: usize,
    compressed_len: usize,
    z: u8,
    mode: u8,
}

impl PlaneHeader {
    fn unpack(header: u32) -> Self {
        Self {
            decompressed_len: (((header & 0x00FF_0000) >> 16) | ((header & 0xF0) << 4)) as usize,
            compressed_len: (((header & 0x0000_FF00) >> 8) | ((header & 0x0F) << 8)) as usize,
            z: ((header & 0x0F00_0000) >> 24) as u8,
            mode: (header >> 28) as u8,
        }
    }
}

impl CustomHouse {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let compressed = r.read_u8()? == 3;
        let enable_response = r.read_bool()?;
        let serial = Serial(r.read_u32()?);
        let revision = r.read_u32()?;
        r.skip(4)?;
        let plane_count = r.read_u8()?;

        let mut planes = Vec::with_capacity(plane_count as usize);
        for _ in 0..plane_count {
            let header = PlaneHeader::unpack(r.read_u32()?);
            if header.compressed_len == 0 {
                continue;
            }

            let raw = r.read_array(header.compressed_len)?;
            planes.push(HousePlane {
                z: header.z,
                mode: header.mode,
                data: inflate(raw, header.decompressed_len)?,
            });
        }

        Ok(Self {
            compressed,
            enable_response,
            serial,
            revision,
            planes,
        })
    }
}

/// A placed tile relative to the house foundation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HouseComponent {
    pub graphic: u16,
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl HousePlane {
    /// Floor height implied by the plane index for modes 1 and 2
    pub fn floor_z(&self) -> i8 {
        if self.z > 0 {
            ((self.z as i32 - 1) % 4 * 20 + 7) as i8
        } else {
            0
        }
    }

    /// Components carried with explicit offsets (modes 0 and 1).
    ///
    /// Mode 2 planes only make sense against the foundation's bounds and
    /// yield `None`; use [`HousePlane::tile_grid`] for those. Zero graphics
    /// are empty cells and are dropped.
    pub fn components(&self) -> Option<Vec<HouseComponent>> {
        let (stride, fixed_z) = match self.mode {
            0 => (5, None),
            1 => (4, Some(self.floor_z())),
            _ => return None,
        };

        let components = self
            .data
            .chunks_exact(stride)
            .filter_map(|entry| {
                let graphic = u16::from_be_bytes([entry[0], entry[1]]);
                if graphic == 0 {
                    return None;
                }
                Some(HouseComponent {
                    graphic,
                    x: entry[2] as i8,
                    y: entry[3] as i8,
                    z: fixed_z.unwrap_or(entry.get(4).copied().unwrap_or(0) as i8),
                })
            })
            .collect();

        Some(components)
    }

    /// Column-major tile graphics of a mode 2 plane
    pub fn tile_grid(&self) -> Option<Vec<u16>> {
        if self.mode != 2 {
            return None;
        }
        Some(
            self.data
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use hex_literal::hex;
    use std::io::Write;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn plane_header(mode: u32, z: u32, dlen: usize, clen: usize) -> u32 {
        let dlen = dlen as u32;
        let clen = clen as u32;
        (mode << 28)
            | (z << 24)
            | ((dlen & 0xFF) << 16)
            | ((clen & 0xFF) << 8)
            | (((dlen >> 8) & 0x0F) << 4)
            | ((clen >> 8) & 0x0F)
    }

    #[test]
    fn test_header_unpack() {
        let header = PlaneHeader::unpack(0x1234_5678);
        assert_eq!(header.mode, 1);
        assert_eq!(header.z, 2);
        assert_eq!(header.decompressed_len, 0x734);
        assert_eq!(header.compressed_len, 0x856);
    }

    #[test]
    fn test_custom_house_planes() {
        let floor = hex!("06 4B 00 00 00 00 00 00 06 4C 01 00");
        let packed = deflate(&floor);

        let mut body = hex!("03 00 40 00 00 10 00 00 00 07 00 00 00 00 02").to_vec();
        body.extend_from_slice(&plane_header(1, 1, floor.len(), packed.len()).to_be_bytes());
        body.extend_from_slice(&packed);
        // empty plane is skipped
        body.extend_from_slice(&plane_header(0, 0, 0, 0).to_be_bytes());

        let mut r = PacketReader::new(&body);
        let house = CustomHouse::decode(&mut r).unwrap();
        assert!(house.compressed);
        assert_eq!(house.serial, Serial(0x4000_0010));
        assert_eq!(house.revision, 7);
        assert_eq!(house.planes.len(), 1);
        assert!(r.is_empty());

        let plane = &house.planes[0];
        assert_eq!(plane.floor_z(), 7);
        let components = plane.components().unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[1].graphic, 0x064C);
        assert_eq!(components[1].x, 1);
        assert_eq!(components[1].z, 7);
    }

    #[test]
    fn test_full_entries_keep_z() {
        let plane = HousePlane {
            z: 0,
            mode: 0,
            data: hex!("00 01 FF 02 14").to_vec(),
        };
        let components = plane.components().unwrap();
        assert_eq!(
            components,
            vec![HouseComponent {
                graphic: 1,
                x: -1,
                y: 2,
                z: 20
            }]
        );
        assert!(plane.tile_grid().is_none());
    }

    #[test]
    fn test_plane_inflate_mismatch() {
        let packed = deflate(b"abcd");
        let mut body = hex!("03 00 40 00 00 10 00 00 00 07 00 00 00 00 01").to_vec();
        body.extend_from_slice(&plane_header(2, 0, 8, packed.len()).to_be_bytes());
        body.extend_from_slice(&packed);

        assert!(CustomHouse::decode(&mut PacketReader::new(&body)).is_err());
    }
}
