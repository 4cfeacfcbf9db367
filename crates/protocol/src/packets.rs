//! # Packet Identifiers and Records
//!
//! [`PacketId`] names every server-to-client identifier the decoder knows.
//! [`Packet`] is the decoded record, one variant per record shape. Several
//! identifiers share a shape (0xA1..0xA3, 0x82/0x85/0x53, 0x77/0xD2, the
//! three effect packets); the caller already holds the identifier it passed
//! in, so the shape alone is returned.
//!
//! ## Organization
//!
//! - **Login**: rejections, server list, relay, characters, features
//! - **Mobiles**: status, movement, appearance, combat
//! - **Items**: world items, containers, dragging, boats
//! - **Trade**: vendors and secure trade
//! - **Text**: speech, clilocs, books, boards, chat
//! - **World**: light, sound, weather, effects
//! - **Interface**: skills, gumps, menus, maps, buffs
//! - **Housing**: custom house planes
//! - **Extended**: the 0xBF subcommand family

use serde::Serialize;

use crate::extended::ExtendedCommand;
use crate::gumps::*;
use crate::housing::CustomHouse;
use crate::items::*;
use crate::login::*;
use crate::mobiles::*;
use crate::text::*;
use crate::trade::*;
use crate::world::*;

/// Server-to-client packet identifiers
///
/// # Packet IDs
///
/// The first byte of every framed packet. Values missing here are either
/// client-to-server only or unknown to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum PacketId {
    //=== Login ===//
    ErrorCode = 0x53,
    LoginComplete = 0x55,
    LoginDenied = 0x82,
    CharacterDeleteResult = 0x85,
    ResendCharacters = 0x86,
    ServerRelay = 0x8C,
    ServerList = 0xA8,
    CharacterList = 0xA9,
    LockedFeatures = 0xB9,
    ClientVersionRequest = 0xBD,
    AssistVersion = 0xBE,
    LoginDelay = 0xFD,

    //=== Mobiles ===//
    Damage = 0x0B,
    CharacterStatus = 0x11,
    Follow = 0x15,
    NewHealthBar = 0x16,
    HealthBar = 0x17,
    EnterWorld = 0x1B,
    DeleteObject = 0x1D,
    UpdatePlayer = 0x20,
    DenyWalk = 0x21,
    ConfirmWalk = 0x22,
    DeathScreen = 0x2C,
    MobileAttributes = 0x2D,
    Swing = 0x2F,
    CharacterAnimation = 0x6E,
    UpdateCharacter = 0x77,
    UpdateObject = 0x78,
    OpenPaperdoll = 0x88,
    PlayerMove = 0x97,
    UpdateHits = 0xA1,
    UpdateMana = 0xA2,
    UpdateStamina = 0xA3,
    AttackTarget = 0xAA,
    DisplayDeath = 0xAF,
    Logout = 0xD1,
    UpdateCharacterExtended = 0xD2,
    UpdateObjectExtended = 0xD3,
    MobileStatus = 0xDE,
    NewCharacterAnimation = 0xE2,

    //=== Items ===//
    UpdateItem = 0x1A,
    DragAnimation = 0x23,
    OpenContainer = 0x24,
    ContainerItem = 0x25,
    DenyMoveItem = 0x27,
    EndDragging = 0x28,
    DropAccepted = 0x29,
    EquipItem = 0x2E,
    ContainerContents = 0x3C,
    CorpseEquipment = 0x89,
    DyeData = 0x95,
    PropertyRevision = 0xDC,
    UpdateItemSA = 0xF3,
    BoatMoving = 0xF6,
    PacketList = 0xF7,

    //=== Trade ===//
    CloseVendor = 0x3B,
    SecureTrade = 0x6F,
    BuyList = 0x74,
    SellList = 0x9E,

    //=== Text ===//
    AsciiSpeech = 0x1C,
    BookPages = 0x66,
    BulletinBoard = 0x71,
    BookHeader = 0x93,
    NameResponse = 0x98,
    AsciiPrompt = 0x9A,
    TipWindow = 0xA6,
    UnicodeSpeech = 0xAE,
    ChatMessage = 0xB2,
    CharacterProfile = 0xB8,
    ClilocMessage = 0xC1,
    UnicodePrompt = 0xC2,
    ClilocAffix = 0xCC,
    BookHeaderNew = 0xD4,
    MegaCliloc = 0xD6,

    //=== World ===//
    Pathfinding = 0x38,
    PersonalLightLevel = 0x4E,
    LightLevel = 0x4F,
    PlaySound = 0x54,
    SetTime = 0x5B,
    SetWeather = 0x65,
    PlayMusic = 0x6D,
    GraphicEffect = 0x70,
    WarMode = 0x72,
    Ping = 0x73,
    Season = 0xBC,
    HuedEffect = 0xC0,
    ParticleEffect = 0xC7,
    ViewRange = 0xC8,

    //=== Interface ===//
    Skills = 0x3A,
    MapData = 0x56,
    TargetCursor = 0x6C,
    OpenMenu = 0x7C,
    MapDisplay = 0x90,
    MultiPlacement = 0x99,
    OpenUrl = 0xA5,
    TextEntryDialog = 0xAB,
    Gump = 0xB0,
    QuestArrow = 0xBA,
    CompressedGump = 0xDD,
    BuffDebuff = 0xDF,
    DisplayWaypoint = 0xE5,
    RemoveWaypoint = 0xE6,
    KrriosSpecial = 0xF0,
    MapDisplayFacet = 0xF5,

    //=== Housing and extended ===//
    ExtendedCommand = 0xBF,
    CustomHouse = 0xD8,

    //=== Known, not interpreted ===//
    ClientTalk = 0x03,
    WalkPrevention = 0x32,
    HelpRequest = 0xB7,
    UltimaMessenger = 0xBB,
    TriggerEffect = 0xC4,
    UnknownC6 = 0xC6,
    GameCentralMonitor = 0xCA,
    GlobalQueueCount = 0xCB,
    ConfigurationFile = 0xD0,
    GenericAosCommand = 0xD7,
    CharacterTransferLog = 0xDB,
    KrEncryptionResponse = 0xE3,
    FreeshardList = 0xF1,
}

impl PacketId {
    /// Map a wire byte to a known identifier
    ///
    /// # Returns
    /// - `Some(PacketId)` if the byte is a known server-to-client packet
    /// - `None` otherwise
    pub fn from_u8(value: u8) -> Option<Self> {
        use PacketId::*;

        let id = match value {
            0x03 => ClientTalk,
            0x0B => Damage,
            0x11 => CharacterStatus,
            0x15 => Follow,
            0x16 => NewHealthBar,
            0x17 => HealthBar,
            0x1A => UpdateItem,
            0x1B => EnterWorld,
            0x1C => AsciiSpeech,
            0x1D => DeleteObject,
            0x20 => UpdatePlayer,
            0x21 => DenyWalk,
            0x22 => ConfirmWalk,
            0x23 => DragAnimation,
            0x24 => OpenContainer,
            0x25 => ContainerItem,
            0x27 => DenyMoveItem,
            0x28 => EndDragging,
            0x29 => DropAccepted,
            0x2C => DeathScreen,
            0x2D => MobileAttributes,
            0x2E => EquipItem,
            0x2F => Swing,
            0x32 => WalkPrevention,
            0x38 => Pathfinding,
            0x3A => Skills,
            0x3B => CloseVendor,
            0x3C => ContainerContents,
            0x4E => PersonalLightLevel,
            0x4F => LightLevel,
            0x53 => ErrorCode,
            0x54 => PlaySound,
            0x55 => LoginComplete,
            0x56 => MapData,
            0x5B => SetTime,
            0x65 => SetWeather,
            0x66 => BookPages,
            0x6C => TargetCursor,
            0x6D => PlayMusic,
            0x6E => CharacterAnimation,
            0x6F => SecureTrade,
            0x70 => GraphicEffect,
            0x71 => BulletinBoard,
            0x72 => WarMode,
            0x73 => Ping,
            0x74 => BuyList,
            0x77 => UpdateCharacter,
            0x78 => UpdateObject,
            0x7C => OpenMenu,
            0x82 => LoginDenied,
            0x85 => CharacterDeleteResult,
            0x86 => ResendCharacters,
            0x88 => OpenPaperdoll,
            0x89 => CorpseEquipment,
            0x8C => ServerRelay,
            0x90 => MapDisplay,
            0x93 => BookHeader,
            0x95 => DyeData,
            0x97 => PlayerMove,
            0x98 => NameResponse,
            0x99 => MultiPlacement,
            0x9A => AsciiPrompt,
            0x9E => SellList,
            0xA1 => UpdateHits,
            0xA2 => UpdateMana,
            0xA3 => UpdateStamina,
            0xA5 => OpenUrl,
            0xA6 => TipWindow,
            0xA8 => ServerList,
            0xA9 => CharacterList,
            0xAA => AttackTarget,
            0xAB => TextEntryDialog,
            0xAE => UnicodeSpeech,
            0xAF => DisplayDeath,
            0xB0 => Gump,
            0xB2 => ChatMessage,
            0xB7 => HelpRequest,
            0xB8 => CharacterProfile,
            0xB9 => LockedFeatures,
            0xBA => QuestArrow,
            0xBB => UltimaMessenger,
            0xBC => Season,
            0xBD => ClientVersionRequest,
            0xBE => AssistVersion,
            0xBF => ExtendedCommand,
            0xC0 => HuedEffect,
            0xC1 => ClilocMessage,
            0xC2 => UnicodePrompt,
            0xC4 => TriggerEffect,
            0xC6 => UnknownC6,
            0xC7 => ParticleEffect,
            0xC8 => ViewRange,
            0xCA => GameCentralMonitor,
            0xCB => GlobalQueueCount,
            0xCC => ClilocAffix,
            0xD0 => ConfigurationFile,
            0xD1 => Logout,
            0xD2 => UpdateCharacterExtended,
            0xD3 => UpdateObjectExtended,
            0xD4 => BookHeaderNew,
            0xD6 => MegaCliloc,
            0xD7 => GenericAosCommand,
            0xD8 => CustomHouse,
            0xDB => CharacterTransferLog,
            0xDC => PropertyRevision,
            0xDD => CompressedGump,
            0xDE => MobileStatus,
            0xDF => BuffDebuff,
            0xE2 => NewCharacterAnimation,
            0xE3 => KrEncryptionResponse,
            0xE5 => DisplayWaypoint,
            0xE6 => RemoveWaypoint,
            0xF0 => KrriosSpecial,
            0xF1 => FreeshardList,
            0xF3 => UpdateItemSA,
            0xF5 => MapDisplayFacet,
            0xF6 => BoatMoving,
            0xF7 => PacketList,
            0xFD => LoginDelay,
            _ => return None,
        };

        Some(id)
    }

    /// Convert packet identifier to its byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Decoded server-to-client packet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "packet", content = "data", rename_all = "snake_case")]
pub enum Packet {
    //=== Login ===//
    LoginError(LoginError),
    ServerList(ServerList),
    ServerRelay(ServerRelay),
    CharacterSlots(CharacterSlots),
    CharacterList(CharacterList),
    LockedFeatures(LockedFeatures),
    LoginComplete,
    ClientVersionRequest,
    AssistVersion(AssistVersion),
    LoginDelay(LoginDelay),
    EnterWorld(EnterWorld),

    //=== Mobiles ===//
    Damage(Damage),
    CharacterStatus(CharacterStatus),
    Follow(Follow),
    HealthBarUpdate(HealthBarUpdate),
    DeleteObject(DeleteObject),
    UpdatePlayer(UpdatePlayer),
    DenyWalk(DenyWalk),
    ConfirmWalk(ConfirmWalk),
    DeathScreen(DeathScreen),
    MobileAttributes(MobileAttributes),
    Swing(Swing),
    CharacterAnimation(CharacterAnimation),
    UpdateCharacter(UpdateCharacter),
    UpdateObject(UpdateObject),
    OpenPaperdoll(OpenPaperdoll),
    PlayerMove(PlayerMove),
    AttributeUpdate(AttributeUpdate),
    AttackTarget(AttackTarget),
    DisplayDeath(DisplayDeath),
    Logout(Logout),
    MobileStatus(MobileStatus),
    NewCharacterAnimation(NewCharacterAnimation),

    //=== Items ===//
    UpdateItem(UpdateItem),
    UpdateItemSA(UpdateItemSA),
    PacketList(PacketList),
    DragAnimation(DragAnimation),
    OpenContainer(OpenContainer),
    ContainerItem(ContainerItem),
    ContainerContents(ContainerContents),
    DenyMoveItem(DenyMoveItem),
    EndDragging(EndDragging),
    DropAccepted,
    EquipItem(EquipItem),
    CorpseEquipment(CorpseEquipment),
    DyeData(DyeData),
    PropertyRevision(PropertyRevision),
    BoatMoving(BoatMoving),

    //=== Trade ===//
    BuyList(BuyList),
    SellList(SellList),
    CloseVendor(CloseVendor),
    SecureTrade(SecureTrade),

    //=== Text ===//
    AsciiSpeech(AsciiSpeech),
    UnicodeSpeech(UnicodeSpeech),
    ClilocMessage(ClilocMessage),
    MegaCliloc(MegaCliloc),
    NameResponse(NameResponse),
    CharacterProfile(CharacterProfile),
    Prompt(Prompt),
    TipWindow(TipWindow),
    BookPages(BookPages),
    BookHeader(BookHeader),
    BulletinBoard(BulletinBoard),
    ChatMessage(ChatMessage),

    //=== World ===//
    Pathfinding(Pathfinding),
    PersonalLightLevel(PersonalLightLevel),
    LightLevel(LightLevel),
    PlaySound(PlaySound),
    SetTime(SetTime),
    SetWeather(SetWeather),
    PlayMusic(PlayMusic),
    GraphicEffect(GraphicEffect),
    WarMode(WarMode),
    Ping(Ping),
    Season(Season),
    ViewRange(ViewRange),

    //=== Interface ===//
    Skills(Skills),
    MapData(MapData),
    TargetCursor(TargetCursor),
    OpenMenu(OpenMenu),
    MapDisplay(MapDisplay),
    MultiPlacement(MultiPlacement),
    OpenUrl(OpenUrl),
    TextEntryDialog(TextEntryDialog),
    Gump(Gump),
    CompressedGump(CompressedGump),
    QuestArrow(QuestArrow),
    BuffDebuff(BuffDebuff),
    DisplayWaypoint(DisplayWaypoint),
    RemoveWaypoint(RemoveWaypoint),
    KrriosSpecial(KrriosSpecial),

    //=== Housing and extended ===//
    CustomHouse(CustomHouse),
    ExtendedCommand(ExtendedCommand),

    /// Known identifier whose body is carried without interpretation
    Opaque(Vec<u8>),
}
