//! Client interface records: skills, gumps, menus, targeting, maps and buffs

use crate::compression::inflate;
use crate::reader::PacketReader;
use serde::Serialize;
use uodecode_core::{DecodeError, Result, Serial};

// ============================================================================
// SKILLS
// ============================================================================

/// 0x3A - Skill list, skill update or skill name table
///
/// ```text
/// type u8
/// 0xFE:  count u16, count * (has_button bool, len u8, name ascii(len))
/// other: repeated (id u16, value u16, base u16, lock u8, [cap u16])
/// ```
///
/// The cap is present for types 1..=3 and 0xDF. Types 0 and 2 send 1-based
/// ids and a zero id terminates a type 0 list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Skills {
    Names { skills: Vec<SkillName> },
    Values {
        list_type: u8,
        /// 0xFF / 0xDF carry one changed skill rather than the whole list
        single_update: bool,
        entries: Vec<SkillValue>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillName {
    pub has_button: bool,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillValue {
    /// 0-based skill index
    pub id: u16,
    pub value: u16,
    pub base: u16,
    /// 0 up, 1 down, 2 locked
    pub lock: u8,
    /// 1000 when the server does not send a cap
    pub cap: u16,
}

const DEFAULT_SKILL_CAP: u16 = 1000;

impl Skills {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let list_type = r.read_u8()?;

        if list_type == 0xFE {
            let count = r.read_u16()? as usize;
            let mut skills = Vec::with_capacity(count.min(r.remaining() / 2));
            for _ in 0..count {
                let has_button = r.read_bool()?;
                let len = r.read_u8()? as usize;
                skills.push(SkillName {
                    has_button,
                    name: r.read_ascii(len)?,
                });
            }
            return Ok(Self::Names { skills });
        }

        let has_cap = (list_type != 0 && list_type <= 3) || list_type == 0xDF;
        let one_based = list_type == 0 || list_type == 2;

        let mut entries = Vec::new();
        while !r.is_empty() {
            let raw_id = r.read_u16()?;
            if r.is_empty() || (list_type == 0 && raw_id == 0) {
                break;
            }

            let id = if one_based {
                raw_id.wrapping_sub(1)
            } else {
                raw_id
            };
            let value = r.read_u16()?;
            let base = r.read_u16()?;
            let lock = r.read_u8()?;
            let cap = if has_cap {
                r.read_u16()?
            } else {
                DEFAULT_SKILL_CAP
            };

            entries.push(SkillValue {
                id,
                value,
                base,
                lock,
                cap,
            });
        }

        Ok(Self::Values {
            list_type,
            single_update: list_type == 0xFF || list_type == 0xDF,
            entries,
        })
    }
}

// ============================================================================
// TARGETING
// ============================================================================

/// 0x6C - Target cursor request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetCursor {
    /// 0 object, 1 location
    pub target_type: u8,
    pub cursor_id: u32,
    /// 0 neutral, 1 harmful, 2 beneficial, 3 cancel
    pub cursor_flags: u8,
}

impl TargetCursor {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let target_type = r.read_u8()?;
        let cursor_id = r.read_u32()?;
        let cursor_flags = r.read_u8()?;
        // clicked serial and location echo, unused when sent by the server
        r.skip_remaining();

        Ok(Self {
            target_type,
            cursor_id,
            cursor_flags,
        })
    }
}

/// 0x99 - House or boat placement cursor
///
/// ```text
/// allow_ground bool, target u32, flags u8, reserved(11)
/// multi u16, x_offset u16, y_offset u16, z_offset u16
/// [7.0.9.0+] hue u16, reserved
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiPlacement {
    pub allow_ground: bool,
    pub target: u32,
    pub flags: u8,
    pub multi: u16,
    pub x_offset: u16,
    pub y_offset: u16,
    pub z_offset: u16,
    pub hue: u16,
}

impl MultiPlacement {
    /// Layout with the trailing hue
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let mut placement = Self::decode_legacy(r)?;
        placement.hue = r.read_u16()?;
        r.skip_remaining();
        Ok(placement)
    }

    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        let allow_ground = r.read_bool()?;
        let target = r.read_u32()?;
        let flags = r.read_u8()?;
        r.skip(11)?;

        Ok(Self {
            allow_ground,
            target,
            flags,
            multi: r.read_u16()?,
            x_offset: r.read_u16()?,
            y_offset: r.read_u16()?,
            z_offset: r.read_u16()?,
            hue: 0,
        })
    }
}

// ============================================================================
// MENUS AND DIALOGS
// ============================================================================

/// 0x7C - Item or text menu
///
/// When the first entry starts with a non-zero graphic the menu is a
/// picture menu; otherwise every entry carries only a name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenMenu {
    pub serial: Serial,
    pub menu_id: u16,
    pub title: String,
    pub pictures: bool,
    pub entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuEntry {
    pub graphic: u16,
    pub hue: u16,
    pub name: String,
}

impl OpenMenu {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let menu_id = r.read_u16()?;
        let title_len = r.read_u8()? as usize;
        let title = r.read_ascii(title_len)?;
        let count = r.read_u8()?;

        // look-ahead only: the cursor stays on the first entry's graphic
        let pictures = count > 0 && r.peek_u16()? != 0;

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (graphic, hue) = if pictures {
                (r.read_u16()?, r.read_u16()?)
            } else {
                r.skip(4)?;
                (0, 0)
            };
            let len = r.read_u8()? as usize;
            entries.push(MenuEntry {
                graphic,
                hue,
                name: r.read_ascii(len)?,
            });
        }

        Ok(Self {
            serial,
            menu_id,
            title,
            pictures,
            entries,
        })
    }
}

/// 0xAB - Text entry dialog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextEntryDialog {
    pub serial: Serial,
    pub parent_id: u8,
    pub button_id: u8,
    pub text: String,
    pub has_cancel: bool,
    /// 1 text, 2 numeric
    pub variant: u8,
    pub max_length: u32,
    pub description: String,
}

impl TextEntryDialog {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let parent_id = r.read_u8()?;
        let button_id = r.read_u8()?;
        let text_len = r.read_u16()? as usize;
        let text = r.read_ascii(text_len)?;
        let has_cancel = r.read_bool()?;
        let variant = r.read_u8()?;
        let max_length = r.read_u32()?;
        let desc_len = r.read_u16()? as usize;
        let description = r.read_ascii(desc_len)?;

        Ok(Self {
            serial,
            parent_id,
            button_id,
            text,
            has_cancel,
            variant,
            max_length,
            description,
        })
    }
}

/// 0xA5 - Open a URL in the browser
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenUrl {
    pub url: String,
}

impl OpenUrl {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            url: r.read_ascii_nul()?,
        })
    }
}

// ============================================================================
// GUMPS
// ============================================================================

/// 0xB0 - Generic gump
///
/// ```text
/// sender u32, gump u32, x u32, y u32,
/// layout_len u16, layout ascii, line_count u16, line_count * (len u16, unicode BE(len))
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gump {
    pub sender: Serial,
    pub gump_id: u32,
    pub x: u32,
    pub y: u32,
    pub layout: String,
    pub lines: Vec<String>,
}

impl Gump {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let sender = Serial(r.read_u32()?);
        let gump_id = r.read_u32()?;
        let x = r.read_u32()?;
        let y = r.read_u32()?;

        let layout_len = r.read_u16()? as usize;
        let layout = r.read_ascii(layout_len)?;

        let count = r.read_u16()? as usize;
        let mut lines = Vec::with_capacity(count.min(r.remaining() / 2));
        for _ in 0..count {
            let len = r.read_u16()? as usize;
            lines.push(r.read_unicode_be(len)?);
        }

        Ok(Self {
            sender,
            gump_id,
            x,
            y,
            layout,
            lines,
        })
    }
}

/// 0xDD - Compressed gump
///
/// ```text
/// sender u32, gump u32, x u32, y u32,
/// clen+4 u32, dlen u32, zlib(layout)
/// line_count u32, [clen+4 u32, dlen u32, zlib(lines)]
/// ```
///
/// Both inflated blocks are kept as raw bytes; [`CompressedGump::layout_text`]
/// and [`CompressedGump::text_lines`] interpret them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressedGump {
    pub sender: Serial,
    pub gump_id: u32,
    pub x: u32,
    pub y: u32,
    pub layout: Vec<u8>,
    pub line_count: u32,
    pub lines: Vec<u8>,
}

impl CompressedGump {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let sender = Serial(r.read_u32()?);
        let gump_id = r.read_u32()?;
        let x = r.read_u32()?;
        let y = r.read_u32()?;

        let layout = compressed_block(r)?;

        let line_count = r.read_u32()?;
        let lines = if line_count != 0 {
            compressed_block(r)?
        } else {
            Vec::new()
        };

        Ok(Self {
            sender,
            gump_id,
            x,
            y,
            layout,
            line_count,
            lines,
        })
    }

    /// Layout markup as UTF-8
    pub fn layout_text(&self) -> String {
        String::from_utf8_lossy(&self.layout).into_owned()
    }

    /// Text lines, each a u16 character count and big-endian UTF-16.
    ///
    /// Stops at the declared count or when the block runs out.
    pub fn text_lines(&self) -> Result<Vec<String>> {
        let mut text = PacketReader::new(&self.lines);
        let mut lines = Vec::new();

        for _ in 0..self.line_count {
            if text.remaining() < 2 {
                break;
            }
            let len = text.read_u16()? as usize;
            lines.push(text.read_unicode_be(len)?);
        }

        Ok(lines)
    }
}

/// Length-prefixed zlib block: clen + 4 (u32), decompressed length (u32), data
fn compressed_block(r: &mut PacketReader<'_>) -> Result<Vec<u8>> {
    let declared = r.read_u32()?;
    let clen = declared.checked_sub(4).ok_or_else(|| {
        DecodeError::DataError(format!("compressed length {} below header size", declared))
    })? as usize;
    let dlen = r.read_u32()? as usize;
    let compressed = r.read_array(clen)?;
    inflate(compressed, dlen)
}

// ============================================================================
// MAPS
// ============================================================================

/// 0x56 - Map pin edit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub serial: Serial,
    /// 1 add, 2 insert, 3 move, 4 remove, 5 clear, 6 toggle, 7 reply
    pub action: u8,
    pub pin: u8,
    pub x: u16,
    pub y: u16,
}

impl MapData {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            action: r.read_u8()?,
            pin: r.read_u8()?,
            x: r.read_u16()?,
            y: r.read_u16()?,
        })
    }
}

/// 0x90 / 0xF5 - Treasure or cartography map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDisplay {
    pub serial: Serial,
    pub gump: u16,
    pub start_x: u16,
    pub start_y: u16,
    pub end_x: u16,
    pub end_y: u16,
    pub width: u16,
    pub height: u16,
    pub facet: Option<u16>,
}

impl MapDisplay {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            gump: r.read_u16()?,
            start_x: r.read_u16()?,
            start_y: r.read_u16()?,
            end_x: r.read_u16()?,
            end_y: r.read_u16()?,
            width: r.read_u16()?,
            height: r.read_u16()?,
            facet: None,
        })
    }

    /// 0xF5 with the trailing facet
    pub fn decode_facet(r: &mut PacketReader<'_>) -> Result<Self> {
        let mut map = Self::decode(r)?;
        map.facet = Some(r.read_u16()?);
        Ok(map)
    }
}

/// 0xBA - Quest arrow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestArrow {
    pub display: bool,
    pub x: u16,
    pub y: u16,
    pub serial: Option<Serial>,
}

impl QuestArrow {
    /// Layout with the target serial
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let mut arrow = Self::decode_legacy(r)?;
        arrow.serial = Some(Serial(r.read_u32()?));
        Ok(arrow)
    }

    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            display: r.read_bool()?,
            x: r.read_u16()?,
            y: r.read_u16()?,
            serial: None,
        })
    }
}

/// 0xE5 - Waypoint added
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayWaypoint {
    pub serial: Serial,
    pub x: u16,
    pub y: u16,
    pub z: i8,
    pub map: u8,
    pub waypoint_type: u16,
    pub ignore_object: bool,
    pub cliloc: u32,
    pub name: String,
}

impl DisplayWaypoint {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            x: r.read_u16()?,
            y: r.read_u16()?,
            z: r.read_i8()?,
            map: r.read_u8()?,
            waypoint_type: r.read_u16()?,
            ignore_object: r.read_u16()? != 0,
            cliloc: r.read_u32()?,
            name: r.read_unicode_le_nul()?,
        })
    }
}

/// 0xE6 - Waypoint removed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveWaypoint {
    pub serial: Serial,
}

impl RemoveWaypoint {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
        })
    }
}

/// 0xF0 - Krrios client special (party and guild world map tracking)
///
/// Types 1 and 2 carry a serial-terminated list; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KrriosSpecial {
    pub special_type: u8,
    pub locations: bool,
    pub entries: Vec<TrackedMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedMember {
    pub serial: Serial,
    pub position: Option<TrackedPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedPosition {
    pub x: u16,
    pub y: u16,
    pub map: u8,
    /// Guild tracking only
    pub hits: Option<u8>,
}

impl KrriosSpecial {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let special_type = r.read_u8()?;

        if special_type != 1 && special_type != 2 {
            r.skip_remaining();
            return Ok(Self {
                special_type,
                locations: false,
                entries: Vec::new(),
            });
        }

        let locations = special_type == 1 || r.read_bool()?;
        let guild = special_type == 2;

        let mut entries = Vec::new();
        while !r.is_empty() {
            let serial = Serial(r.read_u32()?);
            if serial.is_zero() {
                break;
            }

            let position = if locations {
                Some(TrackedPosition {
                    x: r.read_u16()?,
                    y: r.read_u16()?,
                    map: r.read_u8()?,
                    hits: if guild { Some(r.read_u8()?) } else { None },
                })
            } else {
                None
            };

            entries.push(TrackedMember { serial, position });
        }

        Ok(Self {
            special_type,
            locations,
            entries,
        })
    }
}

// ============================================================================
// BUFFS
// ============================================================================

/// 0xDF - Buff or debuff icon
///
/// A zero count removes the icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuffDebuff {
    pub serial: Serial,
    pub icon: u16,
    pub entries: Vec<BuffEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuffEntry {
    pub source_type: u16,
    pub icon: u16,
    pub queue_index: u16,
    /// Seconds
    pub timer: u16,
    pub title_cliloc: u32,
    pub description_cliloc: u32,
    pub extra_cliloc: u32,
    pub title_arguments: String,
    pub description_arguments: String,
    pub extra_arguments: String,
}

impl BuffDebuff {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let icon = r.read_u16()?;
        let count = r.read_u16()? as usize;

        let mut entries = Vec::with_capacity(count.min(r.remaining() / 36));
        for _ in 0..count {
            let source_type = r.read_u16()?;
            r.skip(2)?;
            let icon = r.read_u16()?;
            let queue_index = r.read_u16()?;
            r.skip(4)?;
            let timer = r.read_u16()?;
            r.skip(3)?;

            let title_cliloc = r.read_u32()?;
            let description_cliloc = r.read_u32()?;
            let extra_cliloc = r.read_u32()?;

            // argument lengths are unreliable; the strings are terminated
            r.read_u16()?;
            let mut title_arguments = r.read_unicode_le(2)?;
            title_arguments.push_str(&r.read_unicode_le_nul()?);
            r.read_u16()?;
            let description_arguments = r.read_unicode_le_nul()?;
            r.read_u16()?;
            let extra_arguments = r.read_unicode_le_nul()?;

            entries.push(BuffEntry {
                source_type,
                icon,
                queue_index,
                timer,
                title_cliloc,
                description_cliloc,
                extra_cliloc,
                title_arguments,
                description_arguments,
                extra_arguments,
            });
        }

        Ok(Self {
            serial,
            icon,
            entries,
        })
    }

    pub fn is_removal(&self) -> bool {
        self.entries.is_empty()
    }
}
