//! Vendor and secure trade records

use crate::reader::PacketReader;
use serde::Serialize;
use uodecode_core::{Result, Serial};

/// 0x74 - Vendor buy list (prices for items already sent in the container)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyList {
    pub container: Serial,
    pub entries: Vec<BuyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyEntry {
    pub price: u32,
    /// Item name or a cliloc number rendered as text
    pub name: String,
}

impl BuyList {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let container = Serial(r.read_u32()?);
        let count = r.read_u8()?;

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let price = r.read_u32()?;
            let len = r.read_u8()? as usize;
            entries.push(BuyEntry {
                price,
                name: r.read_ascii(len)?,
            });
        }

        Ok(Self { container, entries })
    }
}

/// 0x9E - Vendor sell list (items the player may sell)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellList {
    pub vendor: Serial,
    pub entries: Vec<SellEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellEntry {
    pub serial: Serial,
    pub graphic: u16,
    pub hue: u16,
    pub amount: u16,
    pub price: u16,
    pub name: String,
}

impl SellList {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let vendor = Serial(r.read_u32()?);
        let count = r.read_u16()? as usize;

        let mut entries = Vec::with_capacity(count.min(r.remaining() / 14));
        for _ in 0..count {
            let serial = Serial(r.read_u32()?);
            let graphic = r.read_u16()?;
            let hue = r.read_u16()?;
            let amount = r.read_u16()?;
            let price = r.read_u16()?;
            let len = r.read_u16()? as usize;

            entries.push(SellEntry {
                serial,
                graphic,
                hue,
                amount,
                price,
                name: r.read_ascii(len)?,
            });
        }

        Ok(Self { vendor, entries })
    }
}

/// 0x3B - Close the vendor buy/sell gump
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseVendor {
    pub vendor: Serial,
}

impl CloseVendor {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let vendor = Serial(r.read_u32()?);
        r.skip_remaining();
        Ok(Self { vendor })
    }
}

/// 0x6F - Secure trade window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecureTrade {
    pub action: u8,
    pub serial: Serial,
    pub detail: TradeDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TradeDetail {
    /// 0: window opened with both trade containers
    Open {
        own_container: Serial,
        their_container: Serial,
        name: Option<String>,
    },
    /// 1: window closed
    Close,
    /// 2: acceptance checkboxes changed
    Update { own_accepted: u32, their_accepted: u32 },
    /// 3: partner's offered gold
    TheirGold { gold: u32, platinum: u32 },
    /// 4: own offered gold
    OwnGold { gold: u32, platinum: u32 },
    /// Any other action byte
    Unknown,
}

impl SecureTrade {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let action = r.read_u8()?;
        let serial = Serial(r.read_u32()?);

        let detail = match action {
            0 => {
                let own_container = Serial(r.read_u32()?);
                let their_container = Serial(r.read_u32()?);
                let has_name = r.read_bool()?;
                let name = if has_name && !r.is_empty() {
                    Some(r.read_ascii_nul()?)
                } else {
                    None
                };
                TradeDetail::Open {
                    own_container,
                    their_container,
                    name,
                }
            }
            1 => TradeDetail::Close,
            2 => TradeDetail::Update {
                own_accepted: r.read_u32()?,
                their_accepted: r.read_u32()?,
            },
            3 => TradeDetail::TheirGold {
                gold: r.read_u32()?,
                platinum: r.read_u32()?,
            },
            4 => TradeDetail::OwnGold {
                gold: r.read_u32()?,
                platinum: r.read_u32()?,
            },
            _ => TradeDetail::Unknown,
        };

        Ok(Self {
            action,
            serial,
            detail,
        })
    }
}
