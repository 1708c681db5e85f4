#![warn(trivial_casts, trivial_numeric_casts, unused_lifetimes, unreachable_pub)]

//! The realm↔world proxy (C9): wire framing shared by both the client↔realm
//! and realm↔world protocols, the `Player` session a world node keeps per
//! joined character, and the join/leave/save lifecycle that ties a session
//! to a [`ironspire_instance::WorldInstance`] and drives [`dispatch`]'s
//! tile-change broadcasts against it.

pub mod byte_channel;
pub mod dispatch;
pub mod framing;
pub mod inbound;
pub mod lifecycle;
pub mod message;
pub mod opcode;
pub mod persist;
pub mod registry;
pub mod session;

pub use byte_channel::{byte_channel, ByteReceiver, ByteSender, TrySendError};
pub use dispatch::{broadcast_despawn, broadcast_move, broadcast_spawn};
pub use framing::{write_frame, Frame, FrameReader, FramingError};
pub use inbound::route_client_packet;
pub use lifecycle::{join_character, leave_character};
pub use message::{CharacterJoin, CharacterLeave, CharacterSave, CharacterSpawnRequest, ProxyPacket};
pub use opcode::{ClientOpcode, ProxyOpcode, ServerOpcode};
pub use persist::{deserialize_character_data, serialize_character_data};
pub use registry::SessionTable;
pub use session::PlayerSession;
