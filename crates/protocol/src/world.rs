//! World state records: login placement, lighting, sound, weather and effects

use crate::reader::PacketReader;
use serde::Serialize;
use uodecode_core::{Direction, Result, Serial};

// ============================================================================
// PLACEMENT
// ============================================================================

/// 0x1B - Player placed in the world after login
///
/// ```text
/// serial u32, unknown u32, graphic u16, x u16, y u16, z u16, direction u8
/// unknown(9), map_width u16, map_height u16, [trailing bytes]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnterWorld {
    pub serial: Serial,
    pub graphic: u16,
    pub x: u16,
    pub y: u16,
    pub z: i8,
    pub direction: Direction,
    pub map_width: u16,
    pub map_height: u16,
}

impl EnterWorld {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let serial = Serial(r.read_u32()?);
        r.skip(4)?;
        let graphic = r.read_u16()?;
        let x = r.read_u16()?;
        let y = r.read_u16()?;
        // z travels as a word but only the low byte is meaningful
        let z = r.read_u16()? as i8;
        let direction = Direction::from_u8(r.read_u8()?);
        r.skip(9)?;
        let map_width = r.read_u16()?;
        let map_height = r.read_u16()?;
        r.skip_remaining();

        Ok(Self {
            serial,
            graphic,
            x,
            y,
            z,
            direction,
            map_width,
            map_height,
        })
    }
}

/// 0x38 - Server-driven pathfinding step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pathfinding {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

impl Pathfinding {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            x: r.read_u16()?,
            y: r.read_u16()?,
            z: r.read_u16()?,
        })
    }
}

// ============================================================================
// ENVIRONMENT
// ============================================================================

/// 0x4E - Light level of a single mobile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalLightLevel {
    pub serial: Serial,
    pub level: u8,
}

impl PersonalLightLevel {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            serial: Serial(r.read_u32()?),
            level: r.read_u8()?,
        })
    }
}

/// 0x4F - Global light level (0 bright, 0x1F dark)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightLevel {
    pub level: u8,
}

impl LightLevel {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self { level: r.read_u8()? })
    }
}

/// 0x5B - Game time of day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl SetTime {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            hour: r.read_u8()?,
            minute: r.read_u8()?,
            second: r.read_u8()?,
        })
    }
}

/// 0x65 - Weather
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetWeather {
    /// 0 rain, 1 storm, 2 snow, 3 brewing storm, 0xFE/0xFF none
    pub weather_type: u8,
    pub count: u8,
    pub temperature: u8,
}

impl SetWeather {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            weather_type: r.read_u8()?,
            count: r.read_u8()?,
            temperature: r.read_u8()?,
        })
    }
}

/// 0xBC - Season change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Season {
    pub season: u8,
    pub play_music: u8,
}

impl Season {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            season: r.read_u8()?,
            play_music: r.read_u8()?,
        })
    }
}

// ============================================================================
// SOUND
// ============================================================================

/// 0x54 - Sound effect at a location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaySound {
    pub index: u16,
    pub volume: u16,
    pub x: u16,
    pub y: u16,
    pub z: i16,
}

impl PlaySound {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        // mode byte, always 1
        r.skip(1)?;
        Ok(Self {
            index: r.read_u16()?,
            volume: r.read_u16()?,
            x: r.read_u16()?,
            y: r.read_u16()?,
            z: r.read_i16()?,
        })
    }
}

/// 0x6D - Background music
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayMusic {
    pub index: u16,
}

impl PlayMusic {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            index: r.read_u16()?,
        })
    }
}

// ============================================================================
// EFFECTS
// ============================================================================

/// 0x70 / 0xC0 / 0xC7 - Graphical effect
///
/// ```text
/// type u8
/// type <= 3: source u32, target u32, graphic u16,
///            sx u16, sy u16, sz i8, tx u16, ty u16, tz i8,
///            speed u8, duration u8, reserved u16, fixed_direction bool, explode bool
///   [0xC0, 0xC7] hue u32, blend_mode u32
///   [0xC7]       tile u16, explode_effect u16, explode_sound u16, serial u32, layer u8, reserved(2)
/// type > 3:  0x70 screen fade (type 4) carries a value after 8 bytes; anything else is ignored
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphicEffect {
    Effect(EffectData),
    ScreenFade { value: u16 },
    Ignored { effect_type: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectData {
    /// 0 moving, 1 lightning, 2 fixed location, 3 fixed on source
    pub effect_type: u8,
    pub source: Serial,
    pub target: Serial,
    pub graphic: u16,
    pub source_x: u16,
    pub source_y: u16,
    pub source_z: i8,
    pub target_x: u16,
    pub target_y: u16,
    pub target_z: i8,
    pub speed: u8,
    pub duration: u8,
    pub fixed_direction: bool,
    pub explode: bool,
    pub hue: u32,
    /// Reduced modulo 7
    pub blend_mode: u32,
    pub particle: Option<ParticleData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleData {
    pub tile: u16,
    pub explode_effect: u16,
    pub explode_sound: u16,
    pub serial: Serial,
    pub layer: u8,
}

/// Which of the three effect packets is being decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EffectLayout {
    Basic,
    Hued,
    Particle,
}

impl GraphicEffect {
    /// 0x70
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_layout(r, EffectLayout::Basic)
    }

    /// 0xC0
    pub fn decode_hued(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_layout(r, EffectLayout::Hued)
    }

    /// 0xC7
    pub fn decode_particle(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::decode_layout(r, EffectLayout::Particle)
    }

    fn decode_layout(r: &mut PacketReader<'_>, layout: EffectLayout) -> Result<Self> {
        let effect_type = r.read_u8()?;

        if effect_type > 3 {
            if effect_type == 4 && layout == EffectLayout::Basic {
                r.skip(8)?;
                let value = r.read_u16()?;
                r.skip_remaining();
                return Ok(Self::ScreenFade { value });
            }
            r.skip_remaining();
            return Ok(Self::Ignored { effect_type });
        }

        let source = Serial(r.read_u32()?);
        let target = Serial(r.read_u32()?);
        let graphic = r.read_u16()?;
        let source_x = r.read_u16()?;
        let source_y = r.read_u16()?;
        let source_z = r.read_i8()?;
        let target_x = r.read_u16()?;
        let target_y = r.read_u16()?;
        let target_z = r.read_i8()?;
        let speed = r.read_u8()?;
        let duration = r.read_u8()?;
        r.skip(2)?;
        let fixed_direction = r.read_bool()?;
        let explode = r.read_bool()?;

        let (hue, blend_mode) = if layout == EffectLayout::Basic {
            (0, 0)
        } else {
            (r.read_u32()?, r.read_u32()? % 7)
        };

        let particle = if layout == EffectLayout::Particle {
            let tile = r.read_u16()?;
            let explode_effect = r.read_u16()?;
            let explode_sound = r.read_u16()?;
            let serial = Serial(r.read_u32()?);
            let layer = r.read_u8()?;
            r.skip(2)?;
            Some(ParticleData {
                tile,
                explode_effect,
                explode_sound,
                serial,
                layer,
            })
        } else {
            None
        };

        Ok(Self::Effect(EffectData {
            effect_type,
            source,
            target,
            graphic,
            source_x,
            source_y,
            source_z,
            target_x,
            target_y,
            target_z,
            speed,
            duration,
            fixed_direction,
            explode,
            hue,
            blend_mode,
            particle,
        }))
    }
}

// ============================================================================
// SMALL NOTIFICATIONS
// ============================================================================

/// 0x72 - War mode toggle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarMode {
    pub enabled: bool,
}

impl WarMode {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let enabled = r.read_bool()?;
        // 0x00 0x32 0x00 padding
        r.skip_remaining();
        Ok(Self { enabled })
    }
}

/// 0x73 - Ping echo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ping {
    pub sequence: u8,
}

impl Ping {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            sequence: r.read_u8()?,
        })
    }
}

/// 0xC8 - Client view range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRange {
    pub range: u8,
}

impl ViewRange {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self { range: r.read_u8()? })
    }
}

/// 0xBE - Assist version query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistVersion {
    pub version: u32,
}

impl AssistVersion {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            version: r.read_u32()?,
        })
    }
}

/// 0xFD - Login delay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginDelay {
    pub delay: u8,
}

impl LoginDelay {
    pub fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self { delay: r.read_u8()? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_enter_world() {
        let body = hex!(
            "00 00 00 01 00 00 00 00 01 90 05 A0 06 40 00 FB 84"
            "00 00 00 00 00 00 00 00 00"
            "1C 00 10 00"
            "00 00 00 00 00 00"
        );
        let enter = EnterWorld::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(enter.serial, Serial(1));
        assert_eq!(enter.x, 1440);
        assert_eq!(enter.y, 1600);
        assert_eq!(enter.z, -5);
        assert_eq!(enter.direction, Direction::from_u8(4));
        assert_eq!(enter.map_width, 0x1C00);
        assert_eq!(enter.map_height, 0x1000);
    }

    #[test]
    fn test_play_sound() {
        let body = hex!("01 00 2A 00 00 05 A0 06 40 FF FE");
        let sound = PlaySound::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(sound.index, 0x2A);
        assert_eq!(sound.z, -2);
    }

    #[test]
    fn test_effect_basic() {
        let body = hex!(
            "00 00 00 00 01 00 00 00 02 36 D4"
            "05 A0 06 40 00 05 A1 06 41 0A"
            "07 00 00 00 01 00"
        );
        let effect = GraphicEffect::decode(&mut PacketReader::new(&body)).unwrap();
        match effect {
            GraphicEffect::Effect(data) => {
                assert_eq!(data.graphic, 0x36D4);
                assert_eq!(data.target_z, 10);
                assert!(data.fixed_direction);
                assert!(!data.explode);
                assert_eq!(data.hue, 0);
                assert!(data.particle.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_effect_blend_mode_reduced() {
        let body = hex!(
            "03 00 00 00 01 00 00 00 00 37 6A"
            "05 A0 06 40 00 05 A0 06 40 00"
            "0A 0F 00 00 01 00"
            "00 00 04 8D 00 00 00 09"
        );
        let effect = GraphicEffect::decode_hued(&mut PacketReader::new(&body)).unwrap();
        match effect {
            GraphicEffect::Effect(data) => {
                assert_eq!(data.hue, 0x048D);
                assert_eq!(data.blend_mode, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_screen_fade_only_on_basic() {
        let body = hex!("04 00 00 00 00 00 00 00 00 00 03");
        let effect = GraphicEffect::decode(&mut PacketReader::new(&body)).unwrap();
        assert_eq!(effect, GraphicEffect::ScreenFade { value: 3 });

        let mut r = PacketReader::new(&body);
        let effect = GraphicEffect::decode_particle(&mut r).unwrap();
        assert_eq!(effect, GraphicEffect::Ignored { effect_type: 4 });
        assert!(r.is_empty());
    }

    #[test]
    fn test_war_mode_padding() {
        let body = hex!("01 00 32 00");
        let mut r = PacketReader::new(&body);
        assert!(WarMode::decode(&mut r).unwrap().enabled);
        assert!(r.is_empty());
    }
}
