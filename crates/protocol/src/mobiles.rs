//! Mobile records: status, movement, appearance and combat notifications

use crate::flags::MobileFlags;
use crate::reader::PacketReader;
use serde::Serialize;
use uodecode_core::{Direction, Result, Serial};

// ============================================================================
// STATUS
// ============================================================================

/// 0x0B - Damage dealt to a mobile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Damage {
    pub serial: Serial,
    pub amount: u16,
}

impl Damage {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            amount: r.read_u16()?,
        })
    }
}

/// 0x11 - Character status bar
///
/// ```text
/// serial u32, name ascii(30), hits u16, hits_max u16, renamable bool, type u8
/// [type > 0] stat block (see StatusStats)
/// ```
///
/// The status type selects how much of the stat block the server sent:
/// 3 adds stat cap and followers, 4 adds elemental resistances, 5 adds max
/// weight and race, 6 adds the combat modifier block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterStatus {
    pub serial: Serial,
    pub name: String,
    pub hits: u16,
    pub hits_max: u16,
    pub renamable: bool,
    pub status_type: u8,
    pub stats: Option<StatusStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusStats {
    pub female: bool,
    pub strength: u16,
    pub dexterity: u16,
    pub intelligence: u16,
    pub stamina: u16,
    pub stamina_max: u16,
    pub mana: u16,
    pub mana_max: u16,
    pub gold: u32,
    pub physical_resistance: i16,
    pub weight: u16,
    /// type >= 5
    pub weight_max: Option<u16>,
    /// type >= 5, zero on the wire is reported as 1 (human)
    pub race: Option<u8>,
    /// type >= 3
    pub stats_cap: Option<i16>,
    pub followers: Option<u8>,
    pub followers_max: Option<u8>,
    /// type >= 4
    pub resistances: Option<StatusResistances>,
    /// type >= 6
    pub combat: Option<StatusCombat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResistances {
    pub fire: i16,
    pub cold: i16,
    pub poison: i16,
    pub energy: i16,
    pub luck: u16,
    pub damage_min: i16,
    pub damage_max: i16,
    pub tithing_points: u32,
}

/// Combat modifiers. Servers often truncate this block; missing values are 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusCombat {
    pub max_physical_resistance: i16,
    pub max_fire_resistance: i16,
    pub max_cold_resistance: i16,
    pub max_poison_resistance: i16,
    pub max_energy_resistance: i16,
    pub defense_chance_increase: i16,
    pub max_defense_chance_increase: i16,
    pub hit_chance_increase: i16,
    pub swing_speed_increase: i16,
    pub damage_increase: i16,
    pub lower_reagent_cost: i16,
    pub spell_damage_increase: i16,
    pub faster_cast_recovery: i16,
    pub faster_casting: i16,
    pub lower_mana_cost: i16,
}

impl CharacterStatus {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let name = r.read_ascii(30)?;
        let hits = r.read_u16()?;
        let hits_max = r.read_u16()?;
        let renamable = r.read_bool()?;
        let status_type = r.read_u8()?;

        let stats = if status_type > 0 && !r.is_empty() {
            Some(StatusStats::decode(r, status_type)?)
        } else {
            None
        };

        Ok(Self {
            serial,
            name,
            hits,
            hits_max,
            renamable,
            status_type,
            stats,
        })
    }
}

impl StatusStats {
    fn decode(r: &mut PacketReader<'_>, status_type: u8) -> Result<Self> {
        let mut stats = Self {
            female: r.read_bool()?,
            strength: r.read_u16()?,
            dexterity: r.read_u16()?,
            intelligence: r.read_u16()?,
            stamina: r.read_u16()?,
            stamina_max: r.read_u16()?,
            mana: r.read_u16()?,
            mana_max: r.read_u16()?,
            gold: r.read_u32()?,
            physical_resistance: r.read_i16()?,
            weight: r.read_u16()?,
            weight_max: None,
            race: None,
            stats_cap: None,
            followers: None,
            followers_max: None,
            resistances: None,
            combat: None,
        };

        if status_type >= 5 {
            stats.weight_max = Some(r.read_u16()?);
            stats.race = Some(r.read_u8()?.max(1));
        }

        if status_type >= 3 {
            stats.stats_cap = Some(r.read_i16()?);
            stats.followers = Some(r.read_u8()?);
            stats.followers_max = Some(r.read_u8()?);
        }

        if status_type >= 4 {
            stats.resistances = Some(StatusResistances {
                fire: r.read_i16()?,
                cold: r.read_i16()?,
                poison: r.read_i16()?,
                energy: r.read_i16()?,
                luck: r.read_u16()?,
                damage_min: r.read_i16()?,
                damage_max: r.read_i16()?,
                tithing_points: r.read_u32()?,
            });
        }

        if status_type >= 6 {
            let mut next = || -> Result<i16> {
                if r.remaining() < 2 {
                    Ok(0)
                } else {
                    r.read_i16()
                }
            };

            stats.combat = Some(StatusCombat {
                max_physical_resistance: next()?,
                max_fire_resistance: next()?,
                max_cold_resistance: next()?,
                max_poison_resistance: next()?,
                max_energy_resistance: next()?,
                defense_chance_increase: next()?,
                max_defense_chance_increase: next()?,
                hit_chance_increase: next()?,
                swing_speed_increase: next()?,
                damage_increase: next()?,
                lower_reagent_cost: next()?,
                spell_damage_increase: next()?,
                faster_cast_recovery: next()?,
                faster_casting: next()?,
                lower_mana_cost: next()?,
            });
        }

        Ok(stats)
    }
}

/// 0x15 - Follow request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Follow {
    pub to_follow: Serial,
    pub following: Serial,
}

impl Follow {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            to_follow: Serial(r.read_u32()?),
            following: Serial(r.read_u32()?),
        })
    }
}

/// 0x16 / 0x17 - Health bar status (poison, yellow bar)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthBarUpdate {
    pub serial: Serial,
    pub entries: Vec<HealthBarEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthBarEntry {
    /// 1 = poison, 2 = yellow bar
    pub kind: u16,
    pub enabled: bool,
}

impl HealthBarUpdate {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let count = r.read_u16()? as usize;

        let mut entries = Vec::with_capacity(count.min(r.remaining() / 3));
        for _ in 0..count {
            entries.push(HealthBarEntry {
                kind: r.read_u16()?,
                enabled: r.read_bool()?,
            });
        }

        Ok(Self { serial, entries })
    }
}

/// 0x1D - Remove an object from the world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteObject {
    pub serial: Serial,
}

impl DeleteObject {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
        })
    }
}

/// 0x2D - Full hits/mana/stamina refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobileAttributes {
    pub serial: Serial,
    pub hits_max: u16,
    pub hits: u16,
    pub mana_max: u16,
    pub mana: u16,
    pub stamina_max: u16,
    pub stamina: u16,
}

impl MobileAttributes {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            hits_max: r.read_u16()?,
            hits: r.read_u16()?,
            mana_max: r.read_u16()?,
            mana: r.read_u16()?,
            stamina_max: r.read_u16()?,
            stamina: r.read_u16()?,
        })
    }
}

/// 0xA1 / 0xA2 / 0xA3 - Single attribute update (hits, mana or stamina)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeUpdate {
    pub serial: Serial,
    pub max: u16,
    pub current: u16,
}

impl AttributeUpdate {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            max: r.read_u16()?,
            current: r.read_u16()?,
        })
    }
}

// ============================================================================
// MOVEMENT AND APPEARANCE
// ============================================================================

/// 0x20 - Player appearance and position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatePlayer {
    pub serial: Serial,
    pub graphic: u16,
    pub graphic_inc: u8,
    pub hue: u16,
    pub flags: MobileFlags,
    pub x: u16,
    pub y: u16,
    pub server_id: u16,
    pub direction: u8,
    pub z: i8,
}

impl UpdatePlayer {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            graphic: r.read_u16()?,
            graphic_inc: r.read_u8()?,
            hue: r.read_u16()?,
            flags: MobileFlags::from_bits_retain(r.read_u8()?),
            x: r.read_u16()?,
            y: r.read_u16()?,
            server_id: r.read_u16()?,
            direction: r.read_u8()?,
            z: r.read_i8()?,
        })
    }
}

/// 0x21 - Walk request rejected, resync position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenyWalk {
    pub sequence: u8,
    pub x: u16,
    pub y: u16,
    pub direction: u8,
    pub z: i8,
}

impl DenyWalk {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            sequence: r.read_u8()?,
            x: r.read_u16()?,
            y: r.read_u16()?,
            direction: r.read_u8()?,
            z: r.read_i8()?,
        })
    }
}

/// 0x22 - Walk request accepted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmWalk {
    pub sequence: u8,
    /// Notoriety with the 0x40 bit cleared
    pub notoriety: u8,
}

impl ConfirmWalk {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            sequence: r.read_u8()?,
            notoriety: r.read_u8()? & !0x40,
        })
    }
}

/// 0x97 - Force the player one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMove {
    pub direction: Direction,
}

impl PlayerMove {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            direction: Direction::from_u8(r.read_u8()?),
        })
    }
}

/// 0x77 / 0xD2 - Mobile moved or changed appearance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateCharacter {
    pub serial: Serial,
    pub graphic: u16,
    pub x: u16,
    pub y: u16,
    pub z: i8,
    pub direction: u8,
    pub hue: u16,
    pub flags: MobileFlags,
    pub notoriety: u8,
}

impl UpdateCharacter {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            graphic: r.read_u16()?,
            x: r.read_u16()?,
            y: r.read_u16()?,
            z: r.read_i8()?,
            direction: r.read_u8()?,
            hue: r.read_u16()?,
            flags: MobileFlags::from_bits_retain(r.read_u8()?),
            notoriety: r.read_u8()?,
        })
    }
}

/// 0x78 / 0xD3 - Mobile enters view, with its visible equipment
///
/// ```text
/// UpdateCharacter fields
/// [0xD3] 6 reserved bytes
/// repeat:
///   item serial u32        (0 terminates)
///   graphic u16, layer u8
///   hue u16                (always, or only when graphic bit 15 is set)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateObject {
    pub mobile: UpdateCharacter,
    pub equipment: Vec<EquipmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentEntry {
    pub serial: Serial,
    pub graphic: u16,
    pub layer: u8,
    pub hue: Option<u16>,
}

impl UpdateObject {
    /// 0x78 before 7.0.33.1: hue only when flagged in the graphic
    pub fn decode_flagged_hue(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, 0, false)
    }

    /// 0x78 from 7.0.33.1
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, 0, true)
    }

    /// 0xD3 before 7.0.33.1
    pub fn decode_extended_flagged_hue(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, 6, false)
    }

    /// 0xD3 from 7.0.33.1
    pub fn decode_extended(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_with(r, 6, true)
    }

    fn decode_with(r: &mut PacketReader<'_>, reserved: usize, hue_always: bool) -> Result<Self> {
        let mobile = UpdateCharacter::decode(r)?;
        r.skip(reserved)?;

        let mut equipment = Vec::new();
        loop {
            let serial = r.read_u32()?;
            if serial == 0 || r.is_empty() {
                break;
            }

            let mut graphic = r.read_u16()?;
            let layer = r.read_u8()?;

            let hue = if hue_always {
                Some(r.read_u16()?)
            } else if graphic & 0x8000 != 0 {
                graphic &= 0x7FFF;
                Some(r.read_u16()?)
            } else {
                None
            };

            equipment.push(EquipmentEntry {
                serial: Serial(serial),
                graphic,
                layer,
                hue,
            });
        }

        Ok(Self { mobile, equipment })
    }
}

/// 0x6E - Play a mobile animation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterAnimation {
    pub serial: Serial,
    pub action: u16,
    pub frame_count: u16,
    pub repeat_count: u16,
    /// Inverse of the wire "backward" byte
    pub forward: bool,
    pub repeat: bool,
    pub delay: u8,
}

impl CharacterAnimation {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            action: r.read_u16()?,
            frame_count: r.read_u16()?,
            repeat_count: r.read_u16()?,
            forward: !r.read_bool()?,
            repeat: r.read_bool()?,
            delay: r.read_u8()?,
        })
    }
}

/// 0xE2 - New-style mobile animation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCharacterAnimation {
    pub serial: Serial,
    pub kind: u16,
    pub action: u16,
    pub mode: u8,
}

impl NewCharacterAnimation {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            kind: r.read_u16()?,
            action: r.read_u16()?,
            mode: r.read_u8()?,
        })
    }
}

/// 0x88 - Open a paperdoll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenPaperdoll {
    pub serial: Serial,
    pub text: String,
    pub flags: u8,
}

impl OpenPaperdoll {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            text: r.read_ascii(60)?,
            flags: r.read_u8()?,
        })
    }
}

// ============================================================================
// COMBAT
// ============================================================================

/// 0x2C - Death screen action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeathScreen {
    pub action: u8,
}

impl DeathScreen {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self { action: r.read_u8()? })
    }
}

/// 0x2F - Swing animation between two mobiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swing {
    pub attacker: Serial,
    pub defender: Serial,
}

impl Swing {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        r.skip(1)?;
        Ok(Self {
            attacker: Serial(r.read_u32()?),
            defender: Serial(r.read_u32()?),
        })
    }
}

/// 0xAA - Current combat target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackTarget {
    pub serial: Serial,
}

impl AttackTarget {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
        })
    }
}

/// 0xAF - Mobile died, corpse created
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDeath {
    pub serial: Serial,
    pub corpse: Serial,
    pub running: u32,
}

impl DisplayDeath {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            corpse: Serial(r.read_u32()?),
            running: r.read_u32()?,
        })
    }
}

/// 0xDE - Mobile combat status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobileStatus {
    pub serial: Serial,
    pub status: u8,
    /// Present when status is 1
    pub attacker: Option<Serial>,
}

impl MobileStatus {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        let status = r.read_u8()?;
        let attacker = if status == 1 {
            Some(Serial(r.read_u32()?))
        } else {
            None
        };

        Ok(Self {
            serial,
            status,
            attacker,
        })
    }
}

/// 0xD1 - Logout acknowledged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Logout {
    pub accepted: bool,
}

impl Logout {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            accepted: r.read_bool()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_damage() {
        let body = hex!("00 00 00 07 00 05");
        let damage = Damage::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(damage, Damage { serial: Serial(7), amount: 5 });
    }

    fn mobile_header() -> Vec<u8> {
        // serial 0x10, graphic 0x190, x 100, y 200, z -1, dir 2, hue 0x83EA, flags 0x02, noto 1
        hex!("00 00 00 10 01 90 00 64 00 C8 FF 02 83 EA 02 01").to_vec()
    }

    #[test]
    fn test_update_object_equipment_loop() {
        let mut body = mobile_header();
        body.extend_from_slice(&hex!("40 00 00 01 0E 75 15 00 00"));
        body.extend_from_slice(&hex!("40 00 00 02 1F 03 16 04 4F"));
        body.extend_from_slice(&hex!("40 00 00 03 20 3B 0B 04 4E"));
        body.extend_from_slice(&hex!("00 00 00 00"));

        let mut r = PacketReader::new(&body);
        let object = UpdateObject::decode(&mut r).unwrap();
        assert!(r.is_empty());

        assert_eq!(object.mobile.serial, Serial(0x10));
        assert_eq!(object.mobile.z, -1);
        assert_eq!(object.mobile.flags, MobileFlags::FEMALE);
        assert_eq!(object.equipment.len(), 3);
        assert_eq!(
            object.equipment[1],
            EquipmentEntry {
                serial: Serial(0x4000_0002),
                graphic: 0x1F03,
                layer: 0x16,
                hue: Some(0x044F),
            }
        );
    }

    #[test]
    fn test_update_object_flagged_hue() {
        let mut body = mobile_header();
        // first entry flags a hue, second does not
        body.extend_from_slice(&hex!("40 00 00 01 8E 75 15 00 21"));
        body.extend_from_slice(&hex!("40 00 00 02 1F 03 16"));
        body.extend_from_slice(&hex!("00 00 00 00"));

        let object = UpdateObject::decode_flagged_hue(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(object.equipment[0].graphic, 0x0E75);
        assert_eq!(object.equipment[0].hue, Some(0x21));
        assert_eq!(object.equipment[1].hue, None);
        assert_eq!(object.equipment.len(), 2);
    }

    #[test]
    fn test_update_object_extended_reserved() {
        let mut body = mobile_header();
        body.extend_from_slice(&hex!("00 00 00 00 00 00"));
        body.extend_from_slice(&hex!("00 00 00 00"));

        let object = UpdateObject::decode_extended(&mut PacketReader::new(&body)).unwrap();
        assert!(object.equipment.is_empty());
    }

    #[test]
    fn test_update_object_missing_sentinel_underruns() {
        let mut body = mobile_header();
        body.extend_from_slice(&hex!("40 00 00 01 0E 75 15 00 00"));

        let err = UpdateObject::decode(&mut PacketReader::new(&body)).unwrap_err();
        assert!(err.is_underrun());
    }

    #[test]
    fn test_update_object_cut_entry_underruns() {
        let mut body = mobile_header();
        body.extend_from_slice(&hex!("40 00 00 01 8E 75 15 00 21"));
        body.extend_from_slice(&hex!("00 00 00 00"));

        // graphic, layer and hue are required once a non-zero serial is read
        let entry = mobile_header().len() + 4;
        let routines: [fn(&mut PacketReader<'_>) -> Result<UpdateObject>; 2] =
            [UpdateObject::decode, UpdateObject::decode_flagged_hue];
        for routine in routines {
            for cut in entry + 1..body.len() {
                let err = routine(&mut PacketReader::new(&body[..cut])).unwrap_err();
                assert!(err.is_underrun(), "cut at {}", cut);
            }
        }
    }

    #[test]
    fn test_status_minimal() {
        let mut body = hex!("00 00 00 01").to_vec();
        let mut name = [0u8; 30];
        name[..4].copy_from_slice(b"Bob\0");
        body.extend_from_slice(&name);
        body.extend_from_slice(&hex!("00 32 00 64 01 00"));

        let status = CharacterStatus::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(status.name, "Bob");
        assert_eq!(status.hits, 50);
        assert_eq!(status.hits_max, 100);
        assert!(status.renamable);
        assert!(status.stats.is_none());
    }

    #[test]
    fn test_status_type_six_truncated_combat() {
        let mut body = hex!("00 00 00 01").to_vec();
        body.extend_from_slice(&[0u8; 30]);
        body.extend_from_slice(&hex!("00 32 00 64 00 06"));
        // female, str, dex, int, stam, stam max, mana, mana max, gold, phys, weight
        body.extend_from_slice(&hex!("01 00 5A 00 19 00 0A 00 19 00 19 00 0A 00 0A 00 00 03 E8 00 46 00 64"));
        // weight max, race 0
        body.extend_from_slice(&hex!("01 90 00"));
        // stat cap, followers, followers max
        body.extend_from_slice(&hex!("00 E1 01 05"));
        // resistances, luck, damage, tithing
        body.extend_from_slice(&hex!("00 46 00 46 00 46 00 46 00 C8 00 0B 00 0F 00 00 00 00"));
        // two combat values only
        body.extend_from_slice(&hex!("00 46 00 4B"));

        let status = CharacterStatus::decode(&mut PacketReader::new(&body)).unwrap();
        let stats = status.stats.unwrap();
        assert!(stats.female);
        assert_eq!(stats.strength, 90);
        assert_eq!(stats.gold, 1000);
        assert_eq!(stats.weight_max, Some(400));
        assert_eq!(stats.race, Some(1));
        assert_eq!(stats.followers_max, Some(5));
        assert_eq!(stats.resistances.as_ref().unwrap().luck, 200);

        let combat = stats.combat.unwrap();
        assert_eq!(combat.max_physical_resistance, 70);
        assert_eq!(combat.max_fire_resistance, 75);
        assert_eq!(combat.lower_mana_cost, 0);
    }

    #[test]
    fn test_health_bar_update() {
        let body = hex!("00 00 00 05 00 02 00 01 01 00 02 00");
        let update = HealthBarUpdate::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(update.entries.len(), 2);
        assert!(update.entries[0].enabled);
        assert_eq!(update.entries[1].kind, 2);
        assert!(!update.entries[1].enabled);
    }

    #[test]
    fn test_confirm_walk_clears_bit() {
        let body = hex!("07 43");
        let confirm = ConfirmWalk::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(confirm.sequence, 7);
        assert_eq!(confirm.notoriety, 3);
    }

    #[test]
    fn test_mobile_status_attacker() {
        let body = hex!("00 00 00 05 01 00 00 00 09");
        let status = MobileStatus::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(status.attacker, Some(Serial(9)));

        let body = hex!("00 00 00 05 00");
        let status = MobileStatus::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(status.attacker, None);
    }

    #[test]
    fn test_character_animation_direction_inverted() {
        let body = hex!("00 00 00 01 00 0C 00 05 00 01 01 00 02");
        let anim = CharacterAnimation::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(anim.action, 12);
        assert!(!anim.forward);
        assert!(!anim.repeat);
        assert_eq!(anim.delay, 2);
    }
}
