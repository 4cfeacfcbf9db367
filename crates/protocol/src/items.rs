//! Item records: world items, containers, drag and drop, boats

use crate::reader::PacketReader;
use serde::Serialize;
use uodecode_core::{Direction, Result, Serial};

// ============================================================================
// WORLD ITEMS
// ============================================================================

/// 0x1A - Item placed in the world (flag-gated layout)
///
/// ```text
/// serial u32   bit 31 set: amount follows graphic
/// graphic u16  bit 15 set: graphic increment byte follows
/// [graphic_inc u8]
/// [amount u16]
/// x u16        bit 15 set: direction follows y
/// y u16        bit 15 set: hue follows z, bit 14 set: flags follow hue
/// [direction u8]
/// z i8
/// [hue u16]
/// [flags u8]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateItem {
    pub serial: Serial,
    pub graphic: u16,
    pub graphic_inc: Option<u8>,
    pub amount: Option<u16>,
    pub x: u16,
    pub y: u16,
    pub direction: Option<u8>,
    pub z: i8,
    pub hue: Option<u16>,
    pub flags: Option<u8>,
}

impl UpdateItem {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let raw_serial = r.read_u32()?;
        let has_amount = raw_serial & 0x8000_0000 != 0;

        let raw_graphic = r.read_u16()?;
        let has_graphic_inc = raw_graphic & 0x8000 != 0;
        let graphic_inc = if has_graphic_inc { Some(r.read_u8()?) } else { None };

        let amount = if has_amount { Some(r.read_u16()?) } else { None };

        let raw_x = r.read_u16()?;
        let has_direction = raw_x & 0x8000 != 0;

        let raw_y = r.read_u16()?;
        let has_hue = raw_y & 0x8000 != 0;
        let has_flags = raw_y & 0x4000 != 0;

        let direction = if has_direction { Some(r.read_u8()?) } else { None };
        let z = r.read_i8()?;
        let hue = if has_hue { Some(r.read_u16()?) } else { None };
        let flags = if has_flags { Some(r.read_u8()?) } else { None };

        Ok(Self {
            serial: Serial(raw_serial & 0x7FFF_FFFF),
            graphic: raw_graphic & 0x7FFF,
            graphic_inc,
            amount,
            x: raw_x & 0x7FFF,
            y: raw_y & 0x3FFF,
            direction,
            z,
            hue,
            flags,
        })
    }

    /// Stack amount, 1 when the packet omits it
    pub fn amount(&self) -> u16 {
        self.amount.unwrap_or(1)
    }

    pub fn hue(&self) -> u16 {
        self.hue.unwrap_or(0)
    }

    pub fn flags(&self) -> u8 {
        self.flags.unwrap_or(0)
    }
}

/// 0xF3 - Item or multi placed in the world (SA layout)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateItemSA {
    pub command: u16,
    /// 0 = item, 1 = multi, 2 = multi with house features
    pub data_type: u8,
    pub serial: Serial,
    pub graphic: u16,
    pub graphic_inc: u8,
    pub amount: u16,
    /// Second amount word, unused by known servers
    pub reserved_amount: u16,
    pub x: u16,
    pub y: u16,
    pub z: i8,
    pub direction: u8,
    pub hue: u16,
    pub flags: u8,
    /// 7.0.9.0 and later only
    pub reserved_trailer: Option<u16>,
}

impl UpdateItemSA {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, true)
    }

    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, false)
    }

    fn decode_with(r: &mut PacketReader<'_>, trailer: bool) -> Result<Self> {
        Ok(Self {
            command: r.read_u16()?,
            data_type: r.read_u8()?,
            serial: Serial(r.read_u32()?),
            graphic: r.read_u16()?,
            graphic_inc: r.read_u8()?,
            amount: r.read_u16()?,
            reserved_amount: r.read_u16()?,
            x: r.read_u16()?,
            y: r.read_u16()?,
            z: r.read_i8()?,
            direction: r.read_u8()?,
            hue: r.read_u16()?,
            flags: r.read_u8()?,
            reserved_trailer: if trailer { Some(r.read_u16()?) } else { None },
        })
    }
}

/// 0xF7 - Batch of 0xF3 records
///
/// Each entry is a packet id byte followed by that packet's body. Only 0xF3
/// entries are defined; any other id ends the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketList {
    pub declared: u16,
    pub items: Vec<UpdateItemSA>,
}

impl PacketList {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, UpdateItemSA::decode)
    }

    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, UpdateItemSA::decode_legacy)
    }

    fn decode_with(
        r: &mut PacketReader<'_>,
        entry: fn(&mut PacketReader<'_>) -> Result<UpdateItemSA>,
    ) -> Result<Self> {
        let declared = r.read_u16()?;
        let mut items = Vec::new();

        for _ in 0..declared {
            if r.read_u8()? != 0xF3 {
                break;
            }
            items.push(entry(r)?);
        }

        Ok(Self { declared, items })
    }
}

/// 0xDC - Object property list revision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRevision {
    pub serial: Serial,
    pub revision: u32,
}

impl PropertyRevision {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            revision: r.read_u32()?,
        })
    }
}

// ============================================================================
// CONTAINERS
// ============================================================================

/// 0x24 - Open a container gump
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenContainer {
    pub serial: Serial,
    pub gump: u16,
    /// 7.0.9.0 and later: 0x7D for vendors, 0x00 otherwise
    pub container_type: Option<u16>,
}

impl OpenContainer {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            gump: r.read_u16()?,
            container_type: Some(r.read_u16()?),
        })
    }

    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            gump: r.read_u16()?,
            container_type: None,
        })
    }
}

/// Item inside a container (0x25 body, 0x3C entry)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerItem {
    pub serial: Serial,
    pub graphic: u16,
    pub graphic_inc: u8,
    /// Never below 1
    pub amount: u16,
    pub x: u16,
    pub y: u16,
    /// 6.0.1.7 and later
    pub grid_index: Option<u8>,
    pub container: Serial,
    pub hue: u16,
}

impl ContainerItem {
    /// Layout with the grid index byte (6.0.1.7 and later)
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, true)
    }

    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, false)
    }

    fn decode_with(r: &mut PacketReader<'_>, grid: bool) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            graphic: r.read_u16()?,
            graphic_inc: r.read_u8()?,
            amount: r.read_u16()?.max(1),
            x: r.read_u16()?,
            y: r.read_u16()?,
            grid_index: if grid { Some(r.read_u8()?) } else { None },
            container: Serial(r.read_u32()?),
            hue: r.read_u16()?,
        })
    }
}

/// 0x3C - Full container contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerContents {
    pub items: Vec<ContainerItem>,
}

impl ContainerContents {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, ContainerItem::decode)
    }

    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, ContainerItem::decode_legacy)
    }

    fn decode_with(
        r: &mut PacketReader<'_>,
        entry: fn(&mut PacketReader<'_>) -> Result<ContainerItem>,
    ) -> Result<Self> {
        let count = r.read_u16()? as usize;
        let mut items = Vec::with_capacity(count.min(r.remaining() / 19));
        for _ in 0..count {
            items.push(entry(r)?);
        }
        Ok(Self { items })
    }
}

/// 0x89 - Items visible on a corpse
///
/// Pairs of layer byte and item serial, terminated by layer 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpseEquipment {
    pub corpse: Serial,
    pub items: Vec<CorpseItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpseItem {
    /// Equipment layer (wire value minus one)
    pub layer: u8,
    pub serial: Serial,
}

impl CorpseEquipment {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let corpse = Serial(r.read_u32()?);
        let mut items = Vec::new();

        loop {
            let layer = r.read_u8()?;
            if layer == 0 || r.is_empty() {
                break;
            }

            items.push(CorpseItem {
                layer: layer - 1,
                serial: Serial(r.read_u32()?),
            });
        }

        Ok(Self { corpse, items })
    }
}

// ============================================================================
// DRAG AND DROP
// ============================================================================

/// 0x23 - Item dragged between two locations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragAnimation {
    pub graphic: u16,
    pub graphic_inc: u8,
    pub hue: u16,
    pub count: u16,
    pub source: Serial,
    pub source_x: u16,
    pub source_y: u16,
    pub source_z: i8,
    pub target: Serial,
    pub target_x: u16,
    pub target_y: u16,
    pub target_z: i8,
}

impl DragAnimation {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            graphic: r.read_u16()?,
            graphic_inc: r.read_u8()?,
            hue: r.read_u16()?,
            count: r.read_u16()?,
            source: Serial(r.read_u32()?),
            source_x: r.read_u16()?,
            source_y: r.read_u16()?,
            source_z: r.read_i8()?,
            target: Serial(r.read_u32()?),
            target_x: r.read_u16()?,
            target_y: r.read_u16()?,
            target_z: r.read_i8()?,
        })
    }
}

/// 0x27 - Item pickup rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenyMoveItem {
    pub code: u8,
}

impl DenyMoveItem {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self { code: r.read_u8()? })
    }
}

/// 0x28 - Dragging ended (body carries the dragged serial, unused)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndDragging {
    pub serial: Serial,
}

impl EndDragging {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
        })
    }
}

/// 0x2E - Item equipped on a mobile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipItem {
    pub serial: Serial,
    pub graphic: u16,
    pub graphic_inc: i8,
    pub layer: u8,
    pub container: Serial,
    pub hue: u16,
}

impl EquipItem {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            graphic: r.read_u16()?,
            graphic_inc: r.read_i8()?,
            layer: r.read_u8()?,
            container: Serial(r.read_u32()?),
            hue: r.read_u16()?,
        })
    }
}

/// 0x95 - Dye tub hue picker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DyeData {
    pub serial: Serial,
    pub graphic: u16,
}

impl DyeData {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        r.skip(2)?;
        Ok(Self {
            serial,
            graphic: r.read_u16()?,
        })
    }
}

// ============================================================================
// BOATS
// ============================================================================

/// 0xF6 - Boat moved, carrying entities aboard with it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoatMoving {
    pub serial: Serial,
    pub speed: u8,
    pub moving: Direction,
    pub facing: Direction,
    pub x: u16,
    pub y: u16,
    pub z: u16,
    pub entities: Vec<BoatEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoatEntity {
    pub serial: Serial,
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

impl BoatMoving {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let speed = r.read_u8()?;
        let moving = Direction::from_u8(r.read_u8()?);
        let facing = Direction::from_u8(r.read_u8()?);
        let x = r.read_u16()?;
        let y = r.read_u16()?;
        let z = r.read_u16()?;

        let count = r.read_u16()? as usize;
        let mut entities = Vec::with_capacity(count.min(r.remaining() / 10));
        for _ in 0..count {
            entities.push(BoatEntity {
                serial: Serial(r.read_u32()?),
                x: r.read_u16()?,
                y: r.read_u16()?,
                z: r.read_u16()?,
            });
        }

        Ok(Self {
            serial,
            speed,
            moving,
            facing,
            x,
            y,
            z,
            entities,
        })
    }
}
