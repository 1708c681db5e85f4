//! Realm↔world proxy messages (§4.9, §6): `ProxyPacket`, `CharacterJoin`,
//! `CharacterLeave`, `CharacterSave`. Each is carried as the payload of a
//! [`crate::framing::Frame`] whose opcode is the matching
//! [`crate::opcode::ProxyOpcode`].

use bytes::{Buf, BufMut, Bytes, BytesMut};

use ironspire_core::Guid;
use ironspire_entity::Vec3;

/// An opaque client packet forwarded by the realm, wrapped by character
/// guid so the world can dispatch it to the right [`crate::session`]
/// (§4.9 "Realm wraps opaque client packets as `ProxyPacket{charGuid,
/// opCode, len, bytes}`").
#[derive(Debug, Clone)]
pub struct ProxyPacket {
    pub char_guid: Guid,
    pub client_op: u16,
    pub bytes: Bytes,
}

impl ProxyPacket {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(8 + 2 + 4 + self.bytes.len());
        buf.put_u64_le(self.char_guid.raw());
        buf.put_u16_le(self.client_op);
        buf.put_u32_le(self.bytes.len() as u32);
        buf.put_slice(&self.bytes);
        buf.freeze()
    }

    pub fn decode(buf: &mut impl Buf) -> Self {
        let char_guid = Guid::from_raw(buf.get_u64_le());
        let client_op = buf.get_u16_le();
        let len = buf.get_u32_le() as usize;
        let bytes = buf.copy_to_bytes(len);
        Self { char_guid, client_op, bytes }
    }
}

/// Where a joining character should be placed, decoded from the realm's
/// join request ahead of any field-map/inventory restoration (§4.9
/// lifecycle: "world spawns player in requested map instance").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterSpawnRequest {
    pub map_id: u32,
    pub position: Vec3,
    pub facing: f32,
}

impl CharacterSpawnRequest {
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.map_id);
        buf.put_f32_le(self.position.x);
        buf.put_f32_le(self.position.y);
        buf.put_f32_le(self.position.z);
        buf.put_f32_le(self.facing);
    }

    pub fn decode(buf: &mut impl Buf) -> Self {
        let map_id = buf.get_u32_le();
        let position = Vec3 {
            x: buf.get_f32_le(),
            y: buf.get_f32_le(),
            z: buf.get_f32_le(),
        };
        let facing = buf.get_f32_le();
        Self { map_id, position, facing }
    }
}

/// `CharacterJoin{guid, CharacterData}` (§6): the realm hands the world a
/// character to spawn, carrying both where to place it and its persisted
/// snapshot (§4.9, empty for a brand new character).
#[derive(Debug, Clone)]
pub struct CharacterJoin {
    pub guid: Guid,
    pub spawn: CharacterSpawnRequest,
    pub character_data: Bytes,
}

impl CharacterJoin {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_u64_le(self.guid.raw());
        self.spawn.encode(&mut buf);
        buf.put_u32_le(self.character_data.len() as u32);
        buf.put_slice(&self.character_data);
        buf.freeze()
    }

    pub fn decode(buf: &mut impl Buf) -> Self {
        let guid = Guid::from_raw(buf.get_u64_le());
        let spawn = CharacterSpawnRequest::decode(buf);
        let len = buf.get_u32_le() as usize;
        let character_data = buf.copy_to_bytes(len);
        Self { guid, spawn, character_data }
    }
}

/// `CharacterLeave{guid}` (§6): explicit leave or disconnect notice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterLeave {
    pub guid: Guid,
}

impl CharacterLeave {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(8);
        buf.put_u64_le(self.guid.raw());
        buf.freeze()
    }

    pub fn decode(buf: &mut impl Buf) -> Self {
        Self { guid: Guid::from_raw(buf.get_u64_le()) }
    }
}

/// `CharacterSave{guid, CharacterData}` (§6): periodic or on-leave
/// persistence push from world to realm.
#[derive(Debug, Clone)]
pub struct CharacterSave {
    pub guid: Guid,
    pub character_data: Bytes,
}

impl CharacterSave {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(8 + 4 + self.character_data.len());
        buf.put_u64_le(self.guid.raw());
        buf.put_u32_le(self.character_data.len() as u32);
        buf.put_slice(&self.character_data);
        buf.freeze()
    }

    pub fn decode(buf: &mut impl Buf) -> Self {
        let guid = Guid::from_raw(buf.get_u64_le());
        let len = buf.get_u32_le() as usize;
        let character_data = buf.copy_to_bytes(len);
        Self { guid, character_data }
    }
}
