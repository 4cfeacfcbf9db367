//! # UODecode Protocol Library
//!
//! This library turns Ultima Online server-to-client packet bodies into typed
//! records, honouring the wire layout of the negotiated client version.
//!
//! ## Architecture
//!
//! The decoder is organized into several layers:
//!
//! ### 1. Byte Cursor ([`reader`])
//! Forward-only reads over one packet body:
//! - Big-endian primitives, with little-endian variants where the wire uses them
//! - Fixed-width and NUL-terminated ASCII, UTF-8 and UTF-16 text
//! - Raw byte slices, skips and the remaining-length query
//!
//! ### 2. Compression ([`compression`])
//! Zlib inflate with an exact expected length, used by compressed gumps and
//! custom house planes.
//!
//! ### 3. Packet Records
//! One module per area of the game:
//! - [`login`]: server list, relay, characters, locked features
//! - [`mobiles`]: status, movement, appearance, combat
//! - [`items`]: world items, containers, dragging, boats
//! - [`trade`]: vendors and secure trading
//! - [`text`]: speech, clilocs, books, bulletin boards, chat
//! - [`world`]: light, sound, weather, graphic effects
//! - [`gumps`]: skills, targeting, menus, gumps, maps, buffs
//! - [`housing`]: custom house planes
//! - [`extended`]: the 0xBF subcommand family
//!
//! ### 4. Dispatch ([`dispatch`])
//! Resolves `(packet id, protocol era)` to one decode routine and runs it.
//!
//! ## Usage Example
//!
//! ```rust
//! use uodecode_core::{ClientVersion, ProtocolEra};
//! use uodecode_protocol::{decode, Packet};
//!
//! let era = ProtocolEra::new(ClientVersion::CV_7090);
//! let packet = decode(0x0B, &[0x00, 0x00, 0x00, 0x07, 0x00, 0x05], &era).unwrap();
//!
//! if let Packet::Damage(damage) = packet {
//!     assert_eq!(damage.amount, 5);
//! }
//! ```
//!
//! ## Era Support
//!
//! Several identifiers changed layout over the years:
//! - **3.0.8z**: map display carries a facet
//! - **5.0.0a**: health bar status packets carry a body
//! - **6.0.1.7**: container items gain a grid index
//! - **6.0.14.2**: locked features widen to 32 bits
//! - **7.0.9.0**: container type, quest arrow serial, multi hue, SA item trailer
//! - **7.0.13.0**: extended starting city entries
//! - **7.0.33.1**: equipment entries always carry a hue

pub mod compression;
pub mod dispatch;
pub mod extended;
pub mod flags;
pub mod gumps;
pub mod housing;
pub mod items;
pub mod login;
pub mod mobiles;
pub mod packets;
pub mod reader;
pub mod text;
pub mod trade;
pub mod world;

// Re-export commonly used items
pub use compression::inflate;
pub use dispatch::{decode, resolve, DecodeFn};
pub use flags::*;
pub use packets::{Packet, PacketId};
pub use reader::PacketReader;
