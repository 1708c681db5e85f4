//! Wire shapes for object replication (§4.8, §6): `UpdateObject{count,
//! [block]}` and `DestroyObjects{count, [guid]}`. A block is whatever
//! [`ironspire_entity::GameObject::write_initial_block`] or
//! `write_delta_block` produced; it is self-delimiting (the field map's own
//! mask-word-count prefix), so no extra length is carried here.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use ironspire_core::Guid;
use ironspire_entity::GameObject;

/// Encodes an `UpdateObject` packet. `initial` selects a full-state block
/// (object just entering view) or a delta block (object already in view)
/// per entry.
pub fn encode_update_object<'a>(entries: impl ExactSizeIterator<Item = (&'a GameObject, bool)>) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u16_le(entries.len() as u16);
    for (object, initial) in entries {
        buf.put_u64_le(object.guid().raw());
        if initial {
            object.write_initial_block(&mut buf);
        } else {
            object.write_delta_block(&mut buf);
        }
    }
    buf.freeze()
}

pub fn encode_destroy_objects(guids: &[Guid]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u16_le(guids.len() as u16);
    for guid in guids {
        buf.put_u64_le(guid.raw());
    }
    buf.freeze()
}

/// Reads an `UpdateObject` packet, calling `apply` once per entry with the
/// guid and a cursor positioned at that entry's block. `apply` is
/// responsible for calling `apply_block` on whatever object it looks up for
/// `guid` (or skipping the block's bytes entirely if it holds no such
/// object, which is itself a protocol violation the caller should treat as
/// fatal to the connection, §7).
pub fn decode_update_object(buf: &mut impl Buf, mut apply: impl FnMut(Guid, &mut dyn Buf)) {
    let count = buf.get_u16_le();
    for _ in 0..count {
        let guid = Guid::from_raw(buf.get_u64_le());
        apply(guid, buf);
    }
}

pub fn decode_destroy_objects(buf: &mut impl Buf) -> Vec<Guid> {
    let count = buf.get_u16_le();
    (0..count).map(|_| Guid::from_raw(buf.get_u64_le())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironspire_core::GuidKind;
    use ironspire_entity::{ItemLike, ItemObject};

    #[test]
    fn update_object_round_trips_an_initial_block() {
        let guid = Guid::new(GuidKind::Item, 1, 1);
        let mut source = GameObject::Item(ItemObject::new(guid));
        if let Some(item) = source.as_item_mut() {
            item.set_stack_count(7);
        }

        let packet = encode_update_object([(&source, true)].into_iter());

        let mut observer = GameObject::Item(ItemObject::new(guid));
        let mut cursor = packet.clone();
        decode_update_object(&mut cursor, |decoded_guid, buf| {
            assert_eq!(decoded_guid, guid);
            observer.apply_block(buf);
        });

        assert_eq!(observer.as_item().unwrap().stack_count(), 7);
    }

    #[test]
    fn destroy_objects_round_trips() {
        let guids = vec![Guid::new(GuidKind::Unit, 1, 1), Guid::new(GuidKind::Unit, 1, 2)];
        let packet = encode_destroy_objects(&guids);
        let mut cursor = packet.clone();
        assert_eq!(decode_destroy_objects(&mut cursor), guids);
    }
}
