//! # Variant Dispatch
//!
//! Maps a packet identifier and the negotiated [`ProtocolEra`] to exactly one
//! decode routine. Identifiers whose wire layout changed between client
//! releases resolve to different routines on either side of the threshold.
//!
//! ```text
//! (packet_id, era) --resolve--> DecodeFn --run over body--> Packet
//! ```
//!
//! Resolution is a plain `match`; nothing is cached and no state survives a
//! call, so independent connections may decode on separate threads.

use crate::extended::ExtendedCommand;
use crate::gumps::*;
use crate::housing::CustomHouse;
use crate::items::*;
use crate::login::*;
use crate::mobiles::*;
use crate::packets::{Packet, PacketId, PacketId as Id};
use crate::reader::PacketReader;
use crate::text::*;
use crate::trade::*;
use crate::world::*;
use tracing::{debug, trace};
use uodecode_core::{DecodeError, ProtocolEra, Result};

/// A single decode routine, already specialised for one era
pub type DecodeFn = fn(&mut PacketReader<'_>) -> Result<Packet>;

/// Build a [`DecodeFn`] that runs `$decoder` and wraps the record in `Packet::$variant`
macro_rules! route {
    ($variant:ident, $decoder:path) => {{
        fn route(r: &mut PacketReader<'_>) -> Result<Packet> {
            $decoder(r).map(Packet::$variant)
        }
        route as DecodeFn
    }};
}

/// Build a [`DecodeFn`] for an identifier with an empty body
macro_rules! unit {
    ($variant:ident) => {{
        fn route(_: &mut PacketReader<'_>) -> Result<Packet> {
            Ok(Packet::$variant)
        }
        route as DecodeFn
    }};
}

fn opaque(r: &mut PacketReader<'_>) -> Result<Packet> {
    let len = r.remaining();
    Ok(Packet::Opaque(r.read_array(len)?.to_vec()))
}

/// Look up the decode routine for `packet_id` under `era`
///
/// # Returns
/// - `Some(DecodeFn)` when a routine is registered
/// - `None` for identifiers the decoder does not know
pub fn resolve(packet_id: u8, era: &ProtocolEra) -> Option<DecodeFn> {
    let routine = match PacketId::from_u8(packet_id)? {
        //=== Login ===//
        Id::LoginDenied | Id::CharacterDeleteResult | Id::ErrorCode => {
            route!(LoginError, LoginError::decode)
        }
        Id::ServerList => route!(ServerList, ServerList::decode),
        Id::ServerRelay => route!(ServerRelay, ServerRelay::decode),
        Id::ResendCharacters => route!(CharacterSlots, CharacterSlots::decode),
        Id::CharacterList if era.extended_city_list() => {
            route!(CharacterList, CharacterList::decode)
        }
        Id::CharacterList => route!(CharacterList, CharacterList::decode_legacy),
        Id::LockedFeatures if era.locked_features_32bit() => {
            route!(LockedFeatures, LockedFeatures::decode)
        }
        Id::LockedFeatures => route!(LockedFeatures, LockedFeatures::decode_legacy),
        Id::LoginComplete => unit!(LoginComplete),
        Id::ClientVersionRequest => unit!(ClientVersionRequest),
        Id::AssistVersion => route!(AssistVersion, AssistVersion::decode),
        Id::LoginDelay => route!(LoginDelay, LoginDelay::decode),
        Id::EnterWorld => route!(EnterWorld, EnterWorld::decode),

        //=== Mobiles ===//
        Id::Damage => route!(Damage, Damage::decode),
        Id::CharacterStatus => route!(CharacterStatus, CharacterStatus::decode),
        Id::Follow => route!(Follow, Follow::decode),
        Id::NewHealthBar | Id::HealthBar if era.health_bar_status() => {
            route!(HealthBarUpdate, HealthBarUpdate::decode)
        }
        Id::NewHealthBar | Id::HealthBar => opaque,
        Id::DeleteObject => route!(DeleteObject, DeleteObject::decode),
        Id::UpdatePlayer => route!(UpdatePlayer, UpdatePlayer::decode),
        Id::DenyWalk => route!(DenyWalk, DenyWalk::decode),
        Id::ConfirmWalk => route!(ConfirmWalk, ConfirmWalk::decode),
        Id::DeathScreen => route!(DeathScreen, DeathScreen::decode),
        Id::MobileAttributes => route!(MobileAttributes, MobileAttributes::decode),
        Id::Swing => route!(Swing, Swing::decode),
        Id::CharacterAnimation => route!(CharacterAnimation, CharacterAnimation::decode),
        Id::UpdateCharacter | Id::UpdateCharacterExtended => {
            route!(UpdateCharacter, UpdateCharacter::decode)
        }
        Id::UpdateObject if era.equipment_hue_always() => {
            route!(UpdateObject, UpdateObject::decode)
        }
        Id::UpdateObject => route!(UpdateObject, UpdateObject::decode_flagged_hue),
        Id::UpdateObjectExtended if era.equipment_hue_always() => {
            route!(UpdateObject, UpdateObject::decode_extended)
        }
        Id::UpdateObjectExtended => {
            route!(UpdateObject, UpdateObject::decode_extended_flagged_hue)
        }
        Id::OpenPaperdoll => route!(OpenPaperdoll, OpenPaperdoll::decode),
        Id::PlayerMove => route!(PlayerMove, PlayerMove::decode),
        Id::UpdateHits | Id::UpdateMana | Id::UpdateStamina => {
            route!(AttributeUpdate, AttributeUpdate::decode)
        }
        Id::AttackTarget => route!(AttackTarget, AttackTarget::decode),
        Id::DisplayDeath => route!(DisplayDeath, DisplayDeath::decode),
        Id::Logout => route!(Logout, Logout::decode),
        Id::MobileStatus => route!(MobileStatus, MobileStatus::decode),
        Id::NewCharacterAnimation => {
            route!(NewCharacterAnimation, NewCharacterAnimation::decode)
        }

        //=== Items ===//
        Id::UpdateItem => route!(UpdateItem, UpdateItem::decode),
        Id::UpdateItemSA if era.item_sa_trailer() => route!(UpdateItemSA, UpdateItemSA::decode),
        Id::UpdateItemSA => route!(UpdateItemSA, UpdateItemSA::decode_legacy),
        Id::PacketList if era.item_sa_trailer() => route!(PacketList, PacketList::decode),
        Id::PacketList => route!(PacketList, PacketList::decode_legacy),
        Id::DragAnimation => route!(DragAnimation, DragAnimation::decode),
        Id::OpenContainer if era.open_container_type() => {
            route!(OpenContainer, OpenContainer::decode)
        }
        Id::OpenContainer => route!(OpenContainer, OpenContainer::decode_legacy),
        Id::ContainerItem if era.container_grid_index() => {
            route!(ContainerItem, ContainerItem::decode)
        }
        Id::ContainerItem => route!(ContainerItem, ContainerItem::decode_legacy),
        Id::ContainerContents if era.container_grid_index() => {
            route!(ContainerContents, ContainerContents::decode)
        }
        Id::ContainerContents => route!(ContainerContents, ContainerContents::decode_legacy),
        Id::DenyMoveItem => route!(DenyMoveItem, DenyMoveItem::decode),
        Id::EndDragging => route!(EndDragging, EndDragging::decode),
        Id::DropAccepted => unit!(DropAccepted),
        Id::EquipItem => route!(EquipItem, EquipItem::decode),
        Id::CorpseEquipment => route!(CorpseEquipment, CorpseEquipment::decode),
        Id::DyeData => route!(DyeData, DyeData::decode),
        Id::PropertyRevision => route!(PropertyRevision, PropertyRevision::decode),
        Id::BoatMoving => route!(BoatMoving, BoatMoving::decode),

        //=== Trade ===//
        Id::BuyList => route!(BuyList, BuyList::decode),
        Id::SellList => route!(SellList, SellList::decode),
        Id::CloseVendor => route!(CloseVendor, CloseVendor::decode),
        Id::SecureTrade => route!(SecureTrade, SecureTrade::decode),

        //=== Text ===//
        Id::AsciiSpeech => route!(AsciiSpeech, AsciiSpeech::decode),
        Id::UnicodeSpeech => route!(UnicodeSpeech, UnicodeSpeech::decode),
        Id::ClilocMessage => route!(ClilocMessage, ClilocMessage::decode),
        Id::ClilocAffix => route!(ClilocMessage, ClilocMessage::decode_affix),
        Id::MegaCliloc => route!(MegaCliloc, MegaCliloc::decode),
        Id::NameResponse => route!(NameResponse, NameResponse::decode),
        Id::CharacterProfile => route!(CharacterProfile, CharacterProfile::decode),
        Id::AsciiPrompt | Id::UnicodePrompt => route!(Prompt, Prompt::decode),
        Id::TipWindow => route!(TipWindow, TipWindow::decode),
        Id::BookPages => route!(BookPages, BookPages::decode),
        Id::BookHeader => route!(BookHeader, BookHeader::decode_legacy),
        Id::BookHeaderNew => route!(BookHeader, BookHeader::decode),
        Id::BulletinBoard => route!(BulletinBoard, BulletinBoard::decode),
        Id::ChatMessage => route!(ChatMessage, ChatMessage::decode),

        //=== World ===//
        Id::Pathfinding => route!(Pathfinding, Pathfinding::decode),
        Id::PersonalLightLevel => route!(PersonalLightLevel, PersonalLightLevel::decode),
        Id::LightLevel => route!(LightLevel, LightLevel::decode),
        Id::PlaySound => route!(PlaySound, PlaySound::decode),
        Id::SetTime => route!(SetTime, SetTime::decode),
        Id::SetWeather => route!(SetWeather, SetWeather::decode),
        Id::PlayMusic => route!(PlayMusic, PlayMusic::decode),
        Id::GraphicEffect => route!(GraphicEffect, GraphicEffect::decode),
        Id::HuedEffect => route!(GraphicEffect, GraphicEffect::decode_hued),
        Id::ParticleEffect => route!(GraphicEffect, GraphicEffect::decode_particle),
        Id::WarMode => route!(WarMode, WarMode::decode),
        Id::Ping => route!(Ping, Ping::decode),
        Id::Season => route!(Season, Season::decode),
        Id::ViewRange => route!(ViewRange, ViewRange::decode),

        //=== Interface ===//
        Id::Skills => route!(Skills, Skills::decode),
        Id::MapData => route!(MapData, MapData::decode),
        Id::TargetCursor => route!(TargetCursor, TargetCursor::decode),
        Id::OpenMenu => route!(OpenMenu, OpenMenu::decode),
        Id::MapDisplay => route!(MapDisplay, MapDisplay::decode),
        Id::MapDisplayFacet if era.map_facet() => route!(MapDisplay, MapDisplay::decode_facet),
        Id::MapDisplayFacet => route!(MapDisplay, MapDisplay::decode),
        Id::MultiPlacement if era.multi_placement_hue() => {
            route!(MultiPlacement, MultiPlacement::decode)
        }
        Id::MultiPlacement => route!(MultiPlacement, MultiPlacement::decode_legacy),
        Id::OpenUrl => route!(OpenUrl, OpenUrl::decode),
        Id::TextEntryDialog => route!(TextEntryDialog, TextEntryDialog::decode),
        Id::Gump => route!(Gump, Gump::decode),
        Id::CompressedGump => route!(CompressedGump, CompressedGump::decode),
        Id::QuestArrow if era.quest_arrow_serial() => route!(QuestArrow, QuestArrow::decode),
        Id::QuestArrow => route!(QuestArrow, QuestArrow::decode_legacy),
        Id::BuffDebuff => route!(BuffDebuff, BuffDebuff::decode),
        Id::DisplayWaypoint => route!(DisplayWaypoint, DisplayWaypoint::decode),
        Id::RemoveWaypoint => route!(RemoveWaypoint, RemoveWaypoint::decode),
        Id::KrriosSpecial => route!(KrriosSpecial, KrriosSpecial::decode),

        //=== Housing and extended ===//
        Id::CustomHouse => route!(CustomHouse, CustomHouse::decode),
        Id::ExtendedCommand => route!(ExtendedCommand, ExtendedCommand::decode),

        //=== Known, not interpreted ===//
        Id::ClientTalk
        | Id::WalkPrevention
        | Id::HelpRequest
        | Id::UltimaMessenger
        | Id::TriggerEffect
        | Id::UnknownC6
        | Id::GameCentralMonitor
        | Id::GlobalQueueCount
        | Id::ConfigurationFile
        | Id::GenericAosCommand
        | Id::CharacterTransferLog
        | Id::KrEncryptionResponse
        | Id::FreeshardList => opaque,
    };

    Some(routine)
}

/// Decode one packet body
///
/// `body` excludes the identifier byte and any length header. Bytes left
/// over after the routine finishes are tolerated and dropped.
///
/// # Errors
/// - `UnrecognizedVariant` when no routine is registered for `packet_id`
/// - `BufferUnderrun` or `DataError` from the routine itself
pub fn decode(packet_id: u8, body: &[u8], era: &ProtocolEra) -> Result<Packet> {
    let routine = resolve(packet_id, era).ok_or(DecodeError::UnrecognizedVariant {
        packet_id,
        version: era.version(),
    })?;

    trace!(
        "Decoding packet 0x{:02X} ({} bytes) for {}",
        packet_id,
        body.len(),
        era
    );

    let mut reader = PacketReader::new(body);
    let packet = routine(&mut reader)?;

    let trailing = reader.skip_remaining();
    if trailing > 0 {
        debug!(
            "Packet 0x{:02X}: ignoring {} trailing byte(s)",
            packet_id, trailing
        );
    }

    Ok(packet)
}
