use flate2::write::ZlibEncoder;
use flate2::Compression;
use hex_literal::hex;
use proptest::prelude::*;
use std::io::Write;
use uodecode_core::{ClientVersion, ProtocolEra, Serial};
use uodecode_protocol::items::UpdateItem;
use uodecode_protocol::{decode, Packet, PacketId};

/// Packet body whose first `required` bytes are all needed by its routine
struct Fixture {
    id: u8,
    version: ClientVersion,
    body: Vec<u8>,
    required: usize,
}

impl Fixture {
    fn new(id: u8, version: ClientVersion, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            id,
            version,
            required: body.len(),
            body,
        }
    }

    /// Last `len` bytes may be cut without failing the decode
    fn tail(mut self, len: usize) -> Self {
        self.required -= len;
        self
    }
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// clen + 4, decompressed length, zlib data
fn gump_block(data: &[u8]) -> Vec<u8> {
    let packed = deflate(data);
    let mut out = ((packed.len() + 4) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend(packed);
    out
}

fn plane_header(z: u32, dlen: usize, clen: usize) -> u32 {
    let (dlen, clen) = (dlen as u32, clen as u32);
    (1 << 28)
        | (z << 24)
        | ((dlen & 0xFF) << 16)
        | ((clen & 0xFF) << 8)
        | (((dlen >> 8) & 0x0F) << 4)
        | ((clen >> 8) & 0x0F)
}

fn padded(text: &str, width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    out[..text.len()].copy_from_slice(text.as_bytes());
    out
}

fn character_list(extended: bool) -> Vec<u8> {
    let mut body = vec![1];
    body.extend(padded("Avatar", 30));
    body.extend([0u8; 30]);

    body.push(1);
    body.push(0);
    let width = if extended { 32 } else { 31 };
    body.extend(padded("Britain", width));
    body.extend(padded("Sweet Dreams Inn", width));
    if extended {
        for word in [1496u32, 1628, 10, 1, 1_075_074, 0] {
            body.extend(word.to_be_bytes());
        }
    }

    body.extend(0x1A8u32.to_be_bytes());
    body
}

fn update_item_sa(trailer: bool) -> Vec<u8> {
    let mut body = hex!("00 01 00 40 00 00 10 0E 75 00 00 01 00 00 05 00 05 00 00 00 00 00 00").to_vec();
    if trailer {
        body.extend([0, 0]);
    }
    body
}

fn mobile_header() -> Vec<u8> {
    hex!("00 00 00 10 01 90 00 64 00 C8 FF 02 83 EA 02 01").to_vec()
}

fn strict_fixtures() -> Vec<Fixture> {
    let container_item = hex!("40 00 00 02 0E 75 00 00 01 00 10 00 20 03 40 00 00 01 00 00");
    let legacy_container_item = [&container_item[..13], &container_item[14..]].concat();

    // a zero serial ends the equipment loop; a body ending right after a
    // non-zero serial also ends it, so these carry no entries
    let object = [mobile_header(), vec![0; 4]].concat();
    let object_extended = [mobile_header(), vec![0; 6], vec![0; 4]].concat();

    let floor = hex!("06 4B 00 00 00 00 00 00 06 4C 01 00");
    let packed = deflate(&floor);
    let mut house = hex!("03 00 40 00 00 10 00 00 00 07 00 00 00 00 01").to_vec();
    house.extend(plane_header(1, floor.len(), packed.len()).to_be_bytes());
    house.extend(packed);

    let mut gump = hex!("00 00 00 01 00 00 00 02 00 00 00 0A 00 00 00 14").to_vec();
    gump.extend(gump_block(b"{ page 0 }"));
    gump.extend(1u32.to_be_bytes());
    gump.extend(gump_block(&hex!("00 02 00 48 00 69")));

    vec![
        Fixture::new(0x0B, ClientVersion::CV_7090, hex!("00 00 00 07 00 05")),
        Fixture::new(
            0x1A,
            ClientVersion::CV_7090,
            hex!("C0 00 03 E8 80 10 02 00 05 80 14 C0 1E 03 05 04 B0 20"),
        ),
        Fixture::new(
            0x25,
            ClientVersion::CV_6017,
            hex!("40 00 00 01 0E 75 00 00 01 00 10 00 20 03 40 00 00 02 00 00"),
        ),
        Fixture::new(0xB9, ClientVersion::CV_60142, hex!("00 00 80 1F")),
        Fixture::new(0xBA, ClientVersion::CV_7090, hex!("01 05 A0 06 40 00 00 00 2A")),
        Fixture::new(
            0xBF,
            ClientVersion::CV_7090,
            hex!("00 1D 40 00 00 10 00 00 00 07"),
        ),
        // containers
        Fixture::new(0x24, ClientVersion::CV_7090, hex!("40 00 00 01 00 3C 00 7D")),
        Fixture::new(0x24, ClientVersion::CV_6017, hex!("40 00 00 01 00 3C")),
        Fixture::new(
            0x3C,
            ClientVersion::CV_6017,
            [&hex!("00 01")[..], &container_item[..]].concat(),
        ),
        Fixture::new(
            0x3C,
            ClientVersion::CV_500A,
            [&hex!("00 01")[..], &legacy_container_item[..]].concat(),
        ),
        // world items
        Fixture::new(0xF3, ClientVersion::CV_7090, update_item_sa(true)),
        Fixture::new(0xF3, ClientVersion::CV_6017, update_item_sa(false)),
        Fixture::new(
            0xF7,
            ClientVersion::CV_7090,
            [hex!("00 01 F3").to_vec(), update_item_sa(true)].concat(),
        ),
        Fixture::new(
            0xF7,
            ClientVersion::CV_6017,
            [hex!("00 01 F3").to_vec(), update_item_sa(false)].concat(),
        ),
        // placement: the bytes after the hue are skipped
        Fixture::new(
            0x99,
            ClientVersion::CV_7090,
            hex!(
                "01 00 00 00 2A 00"
                "00 00 00 00 00 00 00 00 00 00 00"
                "00 64 00 00 00 00 00 00"
                "04 8D 00 00"
            ),
        )
        .tail(2),
        Fixture::new(
            0x99,
            ClientVersion::CV_6017,
            hex!(
                "01 00 00 00 2A 00"
                "00 00 00 00 00 00 00 00 00 00 00"
                "00 64 00 00 00 00 00 00"
            ),
        ),
        // login
        Fixture::new(0xA9, ClientVersion::CV_70130, character_list(true)),
        Fixture::new(0xA9, ClientVersion::CV_7090, character_list(false)),
        // mobiles
        Fixture::new(0x78, ClientVersion::CV_70331, object.clone()),
        Fixture::new(0x78, ClientVersion::CV_7090, object),
        Fixture::new(0xD3, ClientVersion::CV_70331, object_extended.clone()),
        Fixture::new(0xD3, ClientVersion::CV_7090, object_extended),
        // compressed
        Fixture::new(0xDD, ClientVersion::CV_7090, gump),
        Fixture::new(0xD8, ClientVersion::CV_7090, house),
        // count-prefixed
        Fixture::new(
            0x74,
            ClientVersion::CV_7090,
            hex!("40 00 00 05 01 00 00 00 0A 04 41 6C 65 00"),
        ),
        Fixture::new(
            0x9E,
            ClientVersion::CV_7090,
            hex!("00 00 00 07 00 01 40 00 00 08 0F 43 00 00 00 01 00 1E 00 03 41 78 65"),
        ),
        Fixture::new(
            0x66,
            ClientVersion::CV_7090,
            hex!("40 00 00 09 00 02 00 01 00 01 48 69 00 00 02 00 00"),
        ),
        Fixture::new(
            0xB0,
            ClientVersion::CV_7090,
            hex!(
                "00 00 00 01 00 00 00 02 00 00 00 0A 00 00 00 14"
                "00 08 7B 20 70 61 67 65 20 7D"
                "00 02 00 01 00 41 00 00"
            ),
        ),
        // the last argument string is terminated or cut short by the body end
        Fixture::new(
            0xDF,
            ClientVersion::CV_7090,
            hex!(
                "00 00 00 01 04 2F 00 01"
                "00 00 00 00 04 2F 00 00 00 00 00 00 00 3C 00 00 00"
                "00 10 6A 7B 00 10 6A 7C 00 00 00 00"
                "00 00 20 00 31 00 00 00"
                "00 00 00 00"
                "00 00 00 00"
            ),
        )
        .tail(2),
    ]
}

#[test]
fn strict_fixtures_decode_whole() {
    for fixture in strict_fixtures() {
        let era = ProtocolEra::new(fixture.version);
        let packet = decode(fixture.id, &fixture.body, &era);
        assert!(packet.is_ok(), "packet 0x{:02X} for {}: {:?}", fixture.id, era, packet);
    }
}

#[derive(Clone, Debug)]
struct ItemFields {
    serial: u32,
    graphic: u16,
    graphic_inc: Option<u8>,
    amount: Option<u16>,
    x: u16,
    y: u16,
    direction: Option<u8>,
    z: i8,
    hue: Option<u16>,
    flags: Option<u8>,
}

fn item_strategy() -> impl Strategy<Value = ItemFields> {
    (
        (0u32..0x8000_0000, 0u16..0x8000, any::<Option<u8>>(), any::<Option<u16>>()),
        (0u16..0x8000, 0u16..0x4000, any::<Option<u8>>(), any::<i8>()),
        (any::<Option<u16>>(), any::<Option<u8>>()),
    )
        .prop_map(
            |((serial, graphic, graphic_inc, amount), (x, y, direction, z), (hue, flags))| {
                ItemFields {
                    serial,
                    graphic,
                    graphic_inc,
                    amount,
                    x,
                    y,
                    direction,
                    z,
                    hue,
                    flags,
                }
            },
        )
}

/// Lay out a 0x1A body, setting each presence bit only when its field is present
fn item_body(item: &ItemFields) -> Vec<u8> {
    let mut body = Vec::new();

    let serial = item.serial | if item.amount.is_some() { 0x8000_0000 } else { 0 };
    body.extend_from_slice(&serial.to_be_bytes());

    let graphic = item.graphic | if item.graphic_inc.is_some() { 0x8000 } else { 0 };
    body.extend_from_slice(&graphic.to_be_bytes());
    body.extend(item.graphic_inc);
    if let Some(amount) = item.amount {
        body.extend_from_slice(&amount.to_be_bytes());
    }

    let x = item.x | if item.direction.is_some() { 0x8000 } else { 0 };
    body.extend_from_slice(&x.to_be_bytes());

    let mut y = item.y;
    if item.hue.is_some() {
        y |= 0x8000;
    }
    if item.flags.is_some() {
        y |= 0x4000;
    }
    body.extend_from_slice(&y.to_be_bytes());

    body.extend(item.direction);
    body.push(item.z as u8);
    if let Some(hue) = item.hue {
        body.extend_from_slice(&hue.to_be_bytes());
    }
    body.extend(item.flags);

    body
}

proptest! {
    #[test]
    fn truncated_body_is_underrun(
        fixture in any::<prop::sample::Index>(),
        cut in any::<prop::sample::Index>(),
    ) {
        let mut fixtures = strict_fixtures();
        let fixture = fixtures.swap_remove(fixture.index(fixtures.len()));
        let len = cut.index(fixture.required);
        let era = ProtocolEra::new(fixture.version);

        let err = decode(fixture.id, &fixture.body[..len], &era).unwrap_err();
        prop_assert!(
            err.is_underrun(),
            "packet 0x{:02X} for {} cut at {}: {}",
            fixture.id,
            era,
            len,
            err
        );
    }

    #[test]
    fn decode_is_idempotent(
        id in any::<u8>(),
        body in prop::collection::vec(any::<u8>(), 0..96),
        version in (0u8..8, 0u8..2, 0u8..40, 0u8..27),
    ) {
        let era = ProtocolEra::new(ClientVersion::new(version.0, version.1, version.2, version.3));

        let first = decode(id, &body, &era);
        let second = decode(id, &body, &era);
        prop_assert_eq!(&first, &second);

        if PacketId::from_u8(id).is_none() {
            prop_assert!(first.is_err());
        }
    }

    #[test]
    fn update_item_flags_mask_fields(item in item_strategy()) {
        let body = item_body(&item);
        let era = ProtocolEra::new(ClientVersion::CV_70331);

        let packet = decode(0x1A, &body, &era).unwrap();
        let expected = UpdateItem {
            serial: Serial(item.serial),
            graphic: item.graphic,
            graphic_inc: item.graphic_inc,
            amount: item.amount,
            x: item.x,
            y: item.y,
            direction: item.direction,
            z: item.z,
            hue: item.hue,
            flags: item.flags,
        };
        prop_assert_eq!(packet, Packet::UpdateItem(expected.clone()));
        prop_assert_eq!(expected.amount(), item.amount.unwrap_or(1));
    }

    #[test]
    fn update_item_hue_bit_changes_layout(item in item_strategy(), hue in any::<u16>()) {
        let era = ProtocolEra::new(ClientVersion::CV_70331);
        let without = ItemFields { hue: None, ..item.clone() };
        let with = ItemFields { hue: Some(hue), ..item };

        let short = item_body(&without);
        let long = item_body(&with);
        prop_assert_eq!(long.len(), short.len() + 2);

        let Packet::UpdateItem(plain) = decode(0x1A, &short, &era).unwrap() else {
            return Err(TestCaseError::fail("expected update item"));
        };
        let Packet::UpdateItem(hued) = decode(0x1A, &long, &era).unwrap() else {
            return Err(TestCaseError::fail("expected update item"));
        };

        prop_assert_eq!(plain.y, hued.y);
        prop_assert_eq!(plain.hue(), 0);
        prop_assert_eq!(hued.hue, Some(hue));
        prop_assert_eq!(plain.flags, hued.flags);
    }
}
