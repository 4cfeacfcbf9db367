//! Bit sets carried by login and mobile packets
//!
//! Bit positions are historical and fixed; they are not derivable from
//! anything else on the wire.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Expansion and account features unlocked by the server (0xB9)
    ///
    /// Older clients receive the low 16 bits only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct LockedFeatureFlags: u32 {
        const T2A = 0x0000_0001;
        const UOR = 0x0000_0002;
        const THIRD_DAWN = 0x0000_0004;
        const LBR = 0x0000_0008;
        const AOS = 0x0000_0010;
        const SIXTH_CHARACTER_SLOT = 0x0000_0020;
        const SE = 0x0000_0040;
        const ML = 0x0000_0080;
        const EIGHTH_AGE = 0x0000_0100;
        const NINTH_AGE = 0x0000_0200;
        const TENTH_AGE = 0x0000_0400;
        const INCREASED_STORAGE = 0x0000_0800;
        const SEVENTH_CHARACTER_SLOT = 0x0000_1000;
        const ROLEPLAY_FACES = 0x0000_2000;
        const TRIAL_ACCOUNT = 0x0000_4000;
        const LIVE_ACCOUNT = 0x0000_8000;
        const SA = 0x0001_0000;
        const HS = 0x0002_0000;
        const GOTHIC = 0x0004_0000;
        const RUSTIC = 0x0008_0000;
        const JUNGLE = 0x0010_0000;
        const SHADOWGUARD = 0x0020_0000;
        const TOL = 0x0040_0000;
        const EJ = 0x0080_0000;

        const _ = !0;
    }
}

bitflags! {
    /// Animation body conversion tables the client should load
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct BodyConvFlags: u8 {
        const ANIM1 = 0x01;
        const ANIM2 = 0x02;
        const ANIM3 = 0x04;
        const ANIM4 = 0x08;
        const ANIM5 = 0x10;
    }
}

impl LockedFeatureFlags {
    /// Body conversion tables implied by the unlocked expansions.
    ///
    /// Depends only on bits below 0x100, so the 16-bit and 32-bit layouts of
    /// the same logical value agree.
    pub fn body_conversion(self) -> BodyConvFlags {
        let mut conv = BodyConvFlags::empty();

        if self.contains(Self::UOR) {
            conv |= BodyConvFlags::ANIM1 | BodyConvFlags::ANIM2;
        }
        if self.contains(Self::LBR) {
            conv |= BodyConvFlags::ANIM1;
        }
        if self.contains(Self::AOS) {
            conv |= BodyConvFlags::ANIM2;
        }
        if self.contains(Self::SE) {
            conv |= BodyConvFlags::ANIM3;
        }
        if self.contains(Self::ML) {
            conv |= BodyConvFlags::ANIM4;
        }

        conv
    }
}

bitflags! {
    /// Client features announced with the character list (0xA9)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CharacterListFlags: u32 {
        const UNKNOWN = 0x0001;
        const OVERWRITE_CONFIGURATION_BUTTON = 0x0002;
        const ONE_CHARACTER_SLOT = 0x0004;
        const CONTEXT_MENUS = 0x0008;
        const LIMIT_CHARACTER_SLOTS = 0x0010;
        const PALADIN_NECROMANCER_TOOLTIPS = 0x0020;
        const SIXTH_CHARACTER_SLOT = 0x0040;
        const SAMURAI_NINJA = 0x0080;
        const ELVEN_RACE = 0x0100;
        const UO3D_CLIENT_TYPE = 0x0400;
        const SEVENTH_CHARACTER_SLOT = 0x1000;
        const NEW_MOVEMENT_SYSTEM = 0x4000;
        const NEW_FELUCCA_AREAS = 0x8000;

        const _ = !0;
    }
}

bitflags! {
    /// Status byte of mobile update packets (0x20, 0x77, 0x78)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MobileFlags: u8 {
        const FROZEN = 0x01;
        const FEMALE = 0x02;
        /// Poisoned before 7.0, flying afterwards
        const POISONED = 0x04;
        const YELLOW_HITS = 0x08;
        const IGNORE_MOBILES = 0x10;
        const MOVABLE = 0x20;
        const WAR_MODE = 0x40;
        const HIDDEN = 0x80;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_conversion() {
        assert_eq!(LockedFeatureFlags::empty().body_conversion(), BodyConvFlags::empty());
        assert_eq!(
            LockedFeatureFlags::UOR.body_conversion(),
            BodyConvFlags::ANIM1 | BodyConvFlags::ANIM2
        );
        assert_eq!(
            (LockedFeatureFlags::SE | LockedFeatureFlags::ML).body_conversion(),
            BodyConvFlags::ANIM3 | BodyConvFlags::ANIM4
        );
        assert_eq!(
            LockedFeatureFlags::from_bits_retain(0x0001_0010).body_conversion(),
            BodyConvFlags::ANIM2
        );
    }

    #[test]
    fn test_unknown_bits_retained() {
        let flags = CharacterListFlags::from_bits_retain(0x0200 | 0x0008);
        assert!(flags.contains(CharacterListFlags::CONTEXT_MENUS));
        assert_eq!(flags.bits(), 0x0208);

        let features = LockedFeatureFlags::from_bits_retain(0x8000_0000);
        assert_eq!(features.bits(), 0x8000_0000);
    }
}
