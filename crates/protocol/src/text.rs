//! Speech, localized messages, prompts, books, bulletin boards and chat

use crate::reader::PacketReader;
use serde::Serialize;
use uodecode_core::{Result, Serial};

// ============================================================================
// SPEECH
// ============================================================================

/// 0x1C - ASCII speech
///
/// ```text
/// serial u32, graphic u16, type u8, hue u16, font u16, name ascii(30)
/// [text ascii, NUL-terminated]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsciiSpeech {
    pub serial: Serial,
    pub graphic: u16,
    pub message_type: u8,
    pub hue: u16,
    pub font: u16,
    pub name: String,
    pub text: String,
}

impl AsciiSpeech {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let graphic = r.read_u16()?;
        let message_type = r.read_u8()?;
        let hue = r.read_u16()?;
        let font = r.read_u16()?;
        let name = r.read_ascii(30)?;
        let text = if r.is_empty() {
            String::new()
        } else {
            r.read_ascii_nul()?
        };

        Ok(Self {
            serial,
            graphic,
            message_type,
            hue,
            font,
            name,
            text,
        })
    }
}

/// 0xAE - Unicode speech
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnicodeSpeech {
    pub serial: Serial,
    pub graphic: u16,
    pub message_type: u8,
    pub hue: u16,
    pub font: u16,
    pub language: String,
    pub name: String,
    pub text: String,
}

impl UnicodeSpeech {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let graphic = r.read_u16()?;
        let message_type = r.read_u8()?;
        let hue = r.read_u16()?;
        let font = r.read_u16()?;
        let language = r.read_ascii(4)?;
        let name = r.read_ascii(30)?;
        let text = if r.is_empty() {
            String::new()
        } else {
            r.read_unicode_be_nul()?
        };

        Ok(Self {
            serial,
            graphic,
            message_type,
            hue,
            font,
            language,
            name,
            text,
        })
    }

    /// Server-wide system broadcast, as opposed to speech from an entity
    pub fn is_system(&self) -> bool {
        self.serial.is_zero()
            && self.graphic == 0
            && self.message_type == 0
            && self.hue == 0xFFFF
            && self.font == 0xFFFF
            && self.name.eq_ignore_ascii_case("system")
    }
}

/// 0xC1 / 0xCC - Localized (cliloc) message, optionally with an affix
///
/// ```text
/// serial u32, graphic u16, type u8, hue u16, font u16, cliloc u32
/// [0xCC] affix flags u8
/// name ascii(30)
/// [0xCC] affix ascii, NUL-terminated
/// arguments: rest of body (0xC1: unicode LE, 0xCC: unicode BE)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClilocMessage {
    pub serial: Serial,
    pub graphic: u16,
    pub message_type: u8,
    pub hue: u16,
    pub font: u16,
    pub cliloc: u32,
    /// 0xCC only: 0x01 append, 0x02 system
    pub affix_flags: Option<u8>,
    pub name: String,
    pub affix: Option<String>,
    /// Tab-separated cliloc arguments
    pub arguments: String,
}

impl ClilocMessage {
    /// 0xC1
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, false)
    }

    /// 0xCC
    pub fn decode_affix(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, true)
    }

    fn decode_with(r: &mut PacketReader<'_>, affixed: bool) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let graphic = r.read_u16()?;
        let message_type = r.read_u8()?;
        let hue = r.read_u16()?;
        let font = r.read_u16()?;
        let cliloc = r.read_u32()?;
        let affix_flags = if affixed { Some(r.read_u8()?) } else { None };
        let name = r.read_ascii(30)?;
        let affix = if affixed { Some(r.read_ascii_nul()?) } else { None };

        let remaining = r.remaining();
        let arguments = if remaining == 0 {
            String::new()
        } else if affixed {
            r.read_unicode_be(remaining / 2)?
        } else {
            r.read_unicode_le(remaining / 2)?
        };

        Ok(Self {
            serial,
            graphic,
            message_type,
            hue,
            font,
            cliloc,
            affix_flags,
            name,
            affix,
            arguments,
        })
    }
}

/// 0xD6 - Object property list (mega cliloc)
///
/// Entries repeat until a zero cliloc or the end of the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MegaCliloc {
    /// Format word; values above 1 are not understood and carry no list
    pub format: u16,
    pub properties: Option<PropertyList>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyList {
    pub serial: Serial,
    pub revision: u32,
    pub entries: Vec<PropertyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyEntry {
    pub cliloc: u32,
    pub arguments: String,
}

impl MegaCliloc {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let format = r.read_u16()?;
        if format > 1 {
            r.skip_remaining();
            return Ok(Self {
                format,
                properties: None,
            });
        }

        let serial = Serial(r.read_u32()?);
        r.skip(2)?;
        let revision = r.read_u32()?;

        let mut entries = Vec::new();
        while !r.is_empty() {
            let cliloc = r.read_u32()?;
            if cliloc == 0 {
                break;
            }

            let len = r.read_u16()? as usize;
            let arguments = if len == 0 {
                String::new()
            } else {
                r.read_unicode_le(len / 2)?
            };

            entries.push(PropertyEntry { cliloc, arguments });
        }

        Ok(Self {
            format,
            properties: Some(PropertyList {
                serial,
                revision,
                entries,
            }),
        })
    }
}

/// 0x98 - Name of an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameResponse {
    pub serial: Serial,
    pub name: String,
}

impl NameResponse {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            name: r.read_ascii_nul()?,
        })
    }
}

/// 0xB8 - Character profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterProfile {
    pub serial: Serial,
    pub header: String,
    pub footer: String,
    pub body: String,
}

impl CharacterProfile {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            header: r.read_ascii_nul()?,
            footer: r.read_unicode_be_nul()?,
            body: r.read_unicode_be_nul()?,
        })
    }
}

/// 0x9A / 0xC2 - Text prompt
///
/// Only the leading serial/prompt id pair is interpreted; the prompt text
/// that may follow is tolerated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prompt {
    pub serial: Serial,
    pub prompt_id: u32,
}

impl Prompt {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let prompt_id = r.read_u32()?;
        r.skip_remaining();
        Ok(Self { serial, prompt_id })
    }
}

/// 0xA6 - Tip or notice window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TipWindow {
    /// 0 = tip, 1 = notice
    pub flag: u8,
    pub tip: u32,
    pub text: String,
}

impl TipWindow {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let flag = r.read_u8()?;
        let tip = r.read_u32()?;
        let len = r.read_u16()? as usize;
        Ok(Self {
            flag,
            tip,
            text: r.read_ascii(len)?,
        })
    }
}

// ============================================================================
// BOOKS
// ============================================================================

/// 0x66 - Book page contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookPages {
    pub serial: Serial,
    pub pages: Vec<BookPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookPage {
    /// 1-based page number
    pub number: u16,
    pub lines: Vec<String>,
}

impl BookPages {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let count = r.read_u16()? as usize;

        let mut pages = Vec::with_capacity(count.min(r.remaining() / 4));
        for _ in 0..count {
            let number = r.read_u16()?;
            let line_count = r.read_u16()? as usize;

            let mut lines = Vec::with_capacity(line_count.min(r.remaining()));
            for _ in 0..line_count {
                lines.push(r.read_utf8_nul()?);
            }

            pages.push(BookPage { number, lines });
        }

        Ok(Self { serial, pages })
    }
}

/// 0x93 / 0xD4 - Book header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookHeader {
    pub serial: Serial,
    pub editable: bool,
    pub page_count: u16,
    pub title: String,
    pub author: String,
}

impl BookHeader {
    /// 0x93: fixed-width title and author
    pub fn decode_legacy(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let editable = r.read_bool()?;
        r.skip(1)?;

        Ok(Self {
            serial,
            editable,
            page_count: r.read_u16()?,
            title: r.read_utf8(60)?,
            author: r.read_utf8(30)?,
        })
    }

    /// 0xD4: length-prefixed title and author
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        r.read_bool()?;
        let editable = r.read_bool()?;
        let page_count = r.read_u16()?;

        let title_len = r.read_u16()? as usize;
        let title = r.read_utf8(title_len)?;
        let author_len = r.read_u16()? as usize;
        let author = r.read_utf8(author_len)?;

        Ok(Self {
            serial,
            editable,
            page_count,
            title,
            author,
        })
    }
}

// ============================================================================
// BULLETIN BOARDS
// ============================================================================

/// 0x71 - Bulletin board
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BulletinBoard {
    /// 0: open the board
    Open { serial: Serial, name: String },
    /// 1: message summary line
    Summary {
        board: Serial,
        serial: Serial,
        parent: Serial,
        poster: String,
        subject: String,
        time: String,
    },
    /// 2: full message
    Message {
        board: Serial,
        serial: Serial,
        poster: String,
        subject: String,
        time: String,
        lines: Vec<String>,
    },
    Unknown { subcommand: u8 },
}

fn short_utf8(r: &mut PacketReader<'_>) -> Result<String> {
    let len = r.read_u8()? as usize;
    r.read_utf8(len)
}

fn short_ascii(r: &mut PacketReader<'_>) -> Result<String> {
    let len = r.read_u8()? as usize;
    r.read_ascii(len)
}

impl BulletinBoard {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let subcommand = r.read_u8()?;

        let board = match subcommand {
            0 => Self::Open {
                serial: Serial(r.read_u32()?),
                name: r.read_utf8(22)?,
            },
            1 => Self::Summary {
                board: Serial(r.read_u32()?),
                serial: Serial(r.read_u32()?),
                parent: Serial(r.read_u32()?),
                poster: short_utf8(r)?,
                subject: short_utf8(r)?,
                time: short_utf8(r)?,
            },
            2 => {
                let board = Serial(r.read_u32()?);
                let serial = Serial(r.read_u32()?);
                let poster = short_ascii(r)?;
                let subject = short_utf8(r)?;
                let time = short_ascii(r)?;

                // poster body and equipment appearance
                r.skip(4)?;
                let equipment = r.read_u8()? as usize;
                r.skip(equipment * 4)?;

                let line_count = r.read_u8()?;
                let mut lines = Vec::with_capacity(line_count as usize);
                for _ in 0..line_count {
                    lines.push(short_utf8(r)?);
                }

                Self::Message {
                    board,
                    serial,
                    poster,
                    subject,
                    time,
                    lines,
                }
            }
            _ => Self::Unknown { subcommand },
        };

        Ok(board)
    }
}

// ============================================================================
// CHAT
// ============================================================================

/// 0xB2 - Chat system message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub command: u16,
    pub detail: ChatDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatDetail {
    /// 0x03E8
    CreateChannel { channel: String, has_password: bool },
    /// 0x03E9
    DestroyChannel { channel: String },
    /// 0x03ED
    UsernameAccepted { username: String },
    /// 0x03EE
    AddUser { user_type: u16, username: String },
    /// 0x03EF
    RemoveUser { username: String },
    /// 0x03F1
    JoinedChannel { channel: String },
    /// 0x03F4
    LeftChannel { channel: String },
    /// 0x0025..=0x0027
    Message {
        message_type: u16,
        username: String,
        text: String,
    },
    /// 0x0001..=0x0024, 0x0028..=0x002C: system notice with one argument
    Notice { text: String },
    /// Commands with no body (0x03EB, 0x03EC, 0x03F0) or unknown commands
    Bare,
}

impl ChatMessage {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let command = r.read_u16()?;

        let detail = match command {
            0x03E8 => {
                r.skip(4)?;
                let channel = r.read_unicode_be_nul()?;
                let has_password = r.read_u16()? == 0x31;
                ChatDetail::CreateChannel {
                    channel,
                    has_password,
                }
            }
            0x03E9 => {
                r.skip(4)?;
                ChatDetail::DestroyChannel {
                    channel: r.read_unicode_be_nul()?,
                }
            }
            0x03ED => {
                r.skip(4)?;
                ChatDetail::UsernameAccepted {
                    username: r.read_unicode_be_nul()?,
                }
            }
            0x03EE => {
                r.skip(4)?;
                ChatDetail::AddUser {
                    user_type: r.read_u16()?,
                    username: r.read_unicode_be_nul()?,
                }
            }
            0x03EF => {
                r.skip(4)?;
                ChatDetail::RemoveUser {
                    username: r.read_unicode_be_nul()?,
                }
            }
            0x03F1 => {
                r.skip(4)?;
                ChatDetail::JoinedChannel {
                    channel: r.read_unicode_be_nul()?,
                }
            }
            0x03F4 => {
                r.skip(4)?;
                ChatDetail::LeftChannel {
                    channel: r.read_unicode_be_nul()?,
                }
            }
            0x0025..=0x0027 => {
                r.skip(4)?;
                ChatDetail::Message {
                    message_type: r.read_u16()?,
                    username: r.read_unicode_be_nul()?,
                    text: r.read_unicode_be_nul()?,
                }
            }
            0x0001..=0x0024 | 0x0028..=0x002C => {
                r.skip(4)?;
                ChatDetail::Notice {
                    text: r.read_unicode_be_nul()?,
                }
            }
            _ => ChatDetail::Bare,
        };

        Ok(Self { command, detail })
    }
}
