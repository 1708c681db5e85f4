//! The join/leave/save lifecycle the realm drives per character over the
//! proxy connection (§4.9): `CharacterJoin` spawns (or restores) a player
//! into the requested instance and opens a [`PlayerSession`];
//! `CharacterLeave`/`CharacterSave` persist and tear it back down.

use bytes::Bytes;

use ironspire_core::{GameTime, Guid};
use ironspire_entity::{GameObject, PlayerObject, UnitLike};
use ironspire_instance::{InstanceManagerError, InstanceId, WorldInstanceManager};
use ironspire_spatial::TilePos;

use crate::message::{CharacterJoin, CharacterSave};
use crate::persist::{deserialize_character_data, serialize_character_data};
use crate::registry::SessionTable;
use crate::session::PlayerSession;

/// Spawns `join`'s character into `instance_id` and registers a session for
/// it (§4.9 "world spawns player in requested map instance, restoring
/// `CharacterData` if present"). Returns the receiving half of the new
/// session's outgoing channel, which the caller wires to its socket writer.
pub fn join_character(
    manager: &WorldInstanceManager,
    sessions: &mut SessionTable,
    join: &CharacterJoin,
    outgoing_byte_limit: usize,
    base_attack_timer_ms: u64,
    now: GameTime,
) -> Result<crate::byte_channel::ByteReceiver, InstanceManagerError> {
    let (mut session, rx) = PlayerSession::new(join.guid, outgoing_byte_limit, base_attack_timer_ms, now);

    let mut player = GameObject::Player(PlayerObject::new(join.guid));
    if !join.character_data.is_empty() {
        let mut cursor = join.character_data.clone();
        deserialize_character_data(&mut cursor, &mut player, &mut session.inventory);
    }
    if let Some(unit) = player.as_unit_mut() {
        unit.unit_core_mut().movement.position = join.spawn.position;
    }

    let pos = TilePos::from_world(join.spawn.position.x, join.spawn.position.z);
    manager.with_instance(instance_id_for(manager, join.spawn.map_id), |instance| {
        instance.spawn(player, pos);
    })?;

    sessions.insert(session);
    Ok(rx)
}

/// Finds (or, for a brand new map with no running instance, creates) an
/// instance to host a join for `map_id`. Real deployments would route to a
/// specific existing instance picked by the caller (instancing policy is
/// out of scope here, §9); this picks the first instance for the map,
/// creating one if none exists yet.
fn instance_id_for(manager: &WorldInstanceManager, map_id: u32) -> InstanceId {
    manager
        .instance_ids_for_map(map_id)
        .into_iter()
        .next()
        .unwrap_or_else(|| manager.create_instance(map_id))
}

/// Persists and despawns a joined character (§4.9 "on leave: world sends
/// `CharacterSave`, despawns, removes the `Player` session"). Returns the
/// `CharacterSave` the caller forwards to the realm, or `None` if no
/// session was registered for `guid`.
pub fn leave_character(manager: &WorldInstanceManager, sessions: &mut SessionTable, instance_id: InstanceId, guid: Guid) -> Option<CharacterSave> {
    let session = sessions.remove(guid)?;

    let character_data = manager
        .with_instance(instance_id, |instance| {
            instance.object(guid).map(|object| serialize_character_data(object, &session.inventory))
        })
        .ok()
        .flatten()
        .unwrap_or_else(Bytes::new);

    let _ = manager.with_instance(instance_id, |instance| instance.despawn(guid));

    Some(CharacterSave { guid, character_data })
}
