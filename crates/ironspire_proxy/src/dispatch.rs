//! Turns a grid membership change into the subscriber notifications and
//! wire packets C8 describes, using [`PlayerSession`] as the concrete
//! [`Subscriber`] and [`WorldInstance`] as the source of truth for object
//! state (§4.5 step vii crosses into here, §4.8, §4.9).
//!
//! None of this lives in `ironspire_instance` or `ironspire_replication`
//! themselves: the former has no notion of a session, the latter has no
//! notion of a session table. This is where C5, C8, and C9 meet.

use ironspire_core::Guid;
use ironspire_entity::GameObject;
use ironspire_instance::WorldInstance;
use ironspire_replication::{encode_destroy_objects, encode_update_object, Subscriber};
use ironspire_spatial::{TileChangeEvent, TilePos};

use crate::registry::SessionTable;

fn send_spawn_block(instance: &WorldInstance, sessions: &mut SessionTable, to: Guid, of: Guid) {
    let Some(object) = instance.object(of) else { return };
    let Some(session) = sessions.get_mut(to) else { return };
    let initial = !session.has_in_view(of);
    let packet = encode_update_object([(object, initial)].into_iter());
    session.notify_objects_spawned(&[of]);
    session.send_packet(packet);
}

fn send_despawn(sessions: &mut SessionTable, to: Guid, of: Guid) {
    let Some(session) = sessions.get_mut(to) else { return };
    let packet = encode_destroy_objects(&[of]);
    session.notify_objects_despawned(&[of]);
    session.send_packet(packet);
}

/// A fresh spawn (`old_tile` was `None`, or simply "this guid just entered
/// the grid"): every watcher already in sight of `pos`, plus the spawning
/// guid's own session if it is one, receives the mover's block (§4.8
/// "added to tile on spawn").
pub fn broadcast_spawn(instance: &WorldInstance, sessions: &mut SessionTable, guid: Guid, pos: TilePos) {
    let mut watchers = Vec::new();
    instance.grid().for_each_tile_in_sight(pos, |_, tile| {
        watchers.extend_from_slice(tile.watchers());
    });
    for watcher in watchers {
        send_spawn_block(instance, sessions, watcher, guid);
    }

    if sessions.contains(guid) {
        let mut in_view = Vec::new();
        instance.grid().for_each_tile_in_sight(pos, |_, tile| {
            in_view.extend_from_slice(tile.objects());
        });
        for object_guid in in_view {
            send_spawn_block(instance, sessions, guid, object_guid);
        }
    }
}

/// A despawn: every watcher currently in sight of `pos` is told to drop
/// `guid` (§4.3, §4.8).
pub fn broadcast_despawn(instance: &WorldInstance, sessions: &mut SessionTable, guid: Guid, pos: TilePos) {
    let mut watchers = Vec::new();
    instance.grid().for_each_tile_in_sight(pos, |_, tile| {
        watchers.extend_from_slice(tile.watchers());
    });
    for watcher in watchers {
        send_despawn(sessions, watcher, guid);
    }
}

/// A move between two tiles: computes the symmetric difference of old and
/// new neighborhoods both for the mover's own view and for everyone
/// watching the mover, and notifies every affected session (§4.3, §4.8).
pub fn broadcast_move(instance: &WorldInstance, sessions: &mut SessionTable, event: TileChangeEvent) {
    let Some(old) = event.old_tile else {
        broadcast_spawn(instance, sessions, event.guid, event.new_tile);
        return;
    };
    if old == event.new_tile {
        return;
    }

    if sessions.contains(event.guid) {
        let entering = ironspire_replication::objects_entering_view(instance.grid(), old, event.new_tile);
        let leaving = ironspire_replication::objects_leaving_view(instance.grid(), old, event.new_tile);
        for object_guid in entering {
            send_spawn_block(instance, sessions, event.guid, object_guid);
        }
        for object_guid in leaving {
            send_despawn(sessions, event.guid, object_guid);
        }
    }

    let gaining = ironspire_replication::watchers_gaining_sight(instance.grid(), old, event.new_tile);
    let losing = ironspire_replication::watchers_losing_sight(instance.grid(), old, event.new_tile);
    for watcher in gaining {
        send_spawn_block(instance, sessions, watcher, event.guid);
    }
    for watcher in losing {
        send_despawn(sessions, watcher, event.guid);
    }

    // Spawn-before-update-before-despawn (§5): a watcher that merely keeps
    // sight of the mover across the move still needs its pose refreshed.
    let mut still_watching = Vec::new();
    instance.grid().for_each_tile_in_sight(event.new_tile, |_, tile| {
        still_watching.extend_from_slice(tile.watchers());
    });
    for watcher in still_watching {
        if let Some(object) = instance.object(event.guid) {
            if let Some(session) = sessions.get_mut(watcher) {
                if session.has_in_view(event.guid) {
                    let packet = encode_update_object([(object, false)].into_iter());
                    session.notify_objects_updated(&[event.guid]);
                    session.send_packet(packet);
                }
            }
        }
    }
}
