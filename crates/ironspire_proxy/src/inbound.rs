//! Inbound packet routing (§4.9, §6): decodes a [`ProxyPacket`]'s payload
//! per its `clientOp` and calls the owning crate's domain handler — this is
//! the "world dispatches to the matching session" half of C9 that
//! [`crate::dispatch`] mirrors on the outbound side.
//!
//! Protocol violations (unknown opcode, packet for a guid with no session
//! or no unit) and anti-cheat violations (movement/ack rule breaks) both
//! return a [`SessionFault`] for the caller to kick the session on (§7).
//! Domain failures (inventory, cast) are typed result codes that are logged
//! and otherwise swallowed here; the session continues.

use bytes::{Buf, Bytes};
use rustc_hash::FxHashSet;

use ironspire_combat::{cast_spell, CastContext, CastTarget, SpellCatalog};
use ironspire_core::{GameTime, Guid, ResultCode, SessionFault};
use ironspire_entity::{GameObject, MovementFlags, UnitLike, Vec3};
use ironspire_inventory::slot::{EQUIP_SLOTS, PACK_RANGE};
use ironspire_inventory::{CatalogPrices, EquipmentHook, InventoryError, ItemCatalog, NoopHook, SlotAddress};
use ironspire_instance::WorldInstance;
use ironspire_movement::{apply_client_update, MovementUpdate};
use ironspire_spatial::TilePos;

use crate::dispatch::broadcast_move;
use crate::message::ProxyPacket;
use crate::opcode::ClientOpcode;
use crate::registry::SessionTable;
use crate::session::PlayerSession;

/// Routes one decoded [`ProxyPacket`] to its domain handler. `item_catalog`
/// and `spell_catalog` are explicit context (§9 Design Notes), not globals;
/// callers that have no real content database yet can pass
/// [`ironspire_inventory::StaticCatalog`] / [`ironspire_combat::StaticSpellCatalog`].
pub fn route_client_packet(
    instance: &mut WorldInstance,
    sessions: &mut SessionTable,
    packet: &ProxyPacket,
    item_catalog: &impl ItemCatalog,
    spell_catalog: &impl SpellCatalog,
    ack_timeout_ms: u64,
    now: GameTime,
) -> Result<(), SessionFault> {
    use ClientOpcode::*;

    let Some(opcode) = ClientOpcode::from_u16(packet.client_op) else {
        return Err(SessionFault::protocol(format!("unknown client opcode {:#06x}", packet.client_op)));
    };

    match opcode {
        MoveStartForward | MoveStartBackward | MoveStartStrafeLeft | MoveStartStrafeRight | MoveStartTurnLeft
        | MoveStartTurnRight | MoveStopForward | MoveStopBackward | MoveStopStrafe | MoveStopTurn | MoveHeartbeat
        | MoveSetFacing | MoveJump | MoveFallLand => {
            route_movement(instance, sessions, packet.char_guid, opcode, &packet.bytes, now)
        }
        ForceMoveSetWalkAck | ForceMoveSetRunAck | ForceMoveSetRunBackAck | ForceMoveSetSwimAck
        | ForceMoveSetSwimBackAck | ForceMoveSetTurnRateAck | ForceMoveSetFlightAck | ForceMoveSetFlightBackAck => {
            route_speed_ack(sessions, packet.char_guid, &packet.bytes, ack_timeout_ms, now)
        }
        SetSelection => route_set_selection(instance, packet.char_guid, &packet.bytes),
        AttackSwing => route_attack_swing(instance, packet.char_guid, &packet.bytes),
        AttackStop => route_attack_stop(instance, packet.char_guid),
        CastSpell => route_cast_spell(instance, sessions, packet.char_guid, &packet.bytes, spell_catalog, now),
        AutoEquipItem | AutoStoreBagItem | SwapItem | SwapInvItem | DestroyItem | SplitItem => {
            route_inventory(instance, sessions, packet.char_guid, opcode, &packet.bytes, item_catalog, now)
        }
        AutoStoreLootItem | LootMoney | LootRelease | GossipHello | QuestGiverHello | TrainerMenu | ListInventory => {
            tracing::debug!(?opcode, char_guid = ?packet.char_guid, "opcode accepted, no domain handler wired yet");
            Ok(())
        }
    }
}

/// The `{timestamp, flags, position, facing, pitch, fallTime, jumpVel,
/// jumpXZ}` wire form shared by every movement opcode (§6). `flags` is
/// decoded and discarded: the opcode itself already names the single flag
/// being started/stopped (§4.4), so re-deriving it from this field would
/// just be a second, possibly-inconsistent source of truth.
struct MovementWire {
    timestamp: u32,
    position: Vec3,
    facing: f32,
    pitch: f32,
    fall_time: u32,
    jump_velocity: f32,
    jump_xz_speed: f32,
}

impl MovementWire {
    fn decode(buf: &mut impl Buf) -> Self {
        let timestamp = buf.get_u32_le();
        let _flags = buf.get_u32_le();
        let position = Vec3 {
            x: buf.get_f32_le(),
            y: buf.get_f32_le(),
            z: buf.get_f32_le(),
        };
        let facing = buf.get_f32_le();
        let pitch = buf.get_f32_le();
        let fall_time = buf.get_u32_le();
        let jump_velocity = buf.get_f32_le();
        let jump_xz_speed = buf.get_f32_le();
        Self {
            timestamp,
            position,
            facing,
            pitch,
            fall_time,
            jump_velocity,
            jump_xz_speed,
        }
    }
}

/// `MoveStopStrafe`/`MoveStopTurn` each cover two mutually-exclusive flags;
/// the wire tells us which *pair* but not which *one* is live, so we read
/// it off the unit's own state. Anything other than exactly one candidate
/// flag set is the server and client disagreeing about which way the unit
/// is moving, which is exactly the class of thing §4.4 kicks for.
fn resolve_active_flag(current: MovementFlags, candidates: MovementFlags) -> Result<MovementFlags, SessionFault> {
    let active = current & candidates;
    if active.bits().count_ones() != 1 {
        return Err(SessionFault::anti_cheat(format!(
            "stop packet ambiguous: {} of the candidate flags are set",
            active.bits().count_ones()
        )));
    }
    Ok(active)
}

fn movement_update_for(opcode: ClientOpcode, current_flags: MovementFlags, wire: &MovementWire) -> Result<MovementUpdate, SessionFault> {
    use ClientOpcode::*;

    let with_flag = |start_flag, stop_flag| MovementUpdate {
        start_flag,
        stop_flag,
        is_heartbeat: false,
        timestamp: wire.timestamp,
        position: Some(wire.position),
        facing: wire.facing,
        pitch: wire.pitch,
        fall_time: wire.fall_time,
        jump_velocity: wire.jump_velocity,
        jump_xz_speed: wire.jump_xz_speed,
    };

    Ok(match opcode {
        MoveHeartbeat => MovementUpdate::heartbeat(wire.timestamp, wire.position, wire.facing),
        MoveSetFacing => MovementUpdate::set_facing(wire.timestamp, wire.facing, wire.pitch),
        MoveStartForward => with_flag(Some(MovementFlags::FORWARD), None),
        MoveStartBackward => with_flag(Some(MovementFlags::BACKWARD), None),
        MoveStartStrafeLeft => with_flag(Some(MovementFlags::STRAFE_LEFT), None),
        MoveStartStrafeRight => with_flag(Some(MovementFlags::STRAFE_RIGHT), None),
        MoveStartTurnLeft => with_flag(Some(MovementFlags::TURN_LEFT), None),
        MoveStartTurnRight => with_flag(Some(MovementFlags::TURN_RIGHT), None),
        MoveStopForward => with_flag(None, Some(MovementFlags::FORWARD)),
        MoveStopBackward => with_flag(None, Some(MovementFlags::BACKWARD)),
        MoveStopStrafe => {
            let flag = resolve_active_flag(current_flags, MovementFlags::STRAFE_LEFT | MovementFlags::STRAFE_RIGHT)?;
            with_flag(None, Some(flag))
        }
        MoveStopTurn => {
            let flag = resolve_active_flag(current_flags, MovementFlags::TURN_LEFT | MovementFlags::TURN_RIGHT)?;
            with_flag(None, Some(flag))
        }
        MoveJump | MoveFallLand => with_flag(None, None),
        _ => unreachable!("caller only dispatches movement opcodes here"),
    })
}

fn route_movement(
    instance: &mut WorldInstance,
    sessions: &mut SessionTable,
    guid: Guid,
    opcode: ClientOpcode,
    bytes: &Bytes,
    now: GameTime,
) -> Result<(), SessionFault> {
    let mut cursor = bytes.clone();
    let wire = MovementWire::decode(&mut cursor);

    let new_position = {
        let object = instance
            .object_mut(guid)
            .ok_or_else(|| SessionFault::protocol(format!("movement packet for unknown guid {guid:?}")))?;
        let unit = object
            .as_unit_mut()
            .ok_or_else(|| SessionFault::protocol("movement packet for a non-unit object"))?;

        let is_alive = unit.is_alive();
        let current_flags = unit.movement().flags;
        let update = movement_update_for(opcode, current_flags, &wire)?;

        apply_client_update(unit.movement_mut(), update, now, is_alive).map_err(|err| SessionFault::anti_cheat(err.to_string()))?;

        unit.movement().position
    };

    let new_tile = TilePos::from_world(new_position.x, new_position.z);
    if let Some(event) = instance.move_object(guid, new_tile) {
        broadcast_move(instance, sessions, event);
    }
    Ok(())
}

fn route_speed_ack(sessions: &mut SessionTable, guid: Guid, bytes: &Bytes, ack_timeout_ms: u64, now: GameTime) -> Result<(), SessionFault> {
    let mut cursor = bytes.clone();
    let counter = cursor.get_u32_le();
    let value = cursor.get_f32_le();

    let session = sessions
        .get_mut(guid)
        .ok_or_else(|| SessionFault::protocol(format!("speed ack for unknown session {guid:?}")))?;

    session
        .pending_changes
        .ack(counter, value, now, ack_timeout_ms)
        .map(|change| {
            tracing::debug!(?guid, counter = change.counter, value = change.value, "speed change acknowledged");
        })
        .map_err(|err| SessionFault::anti_cheat(err.to_string()))
}

fn route_set_selection(instance: &mut WorldInstance, guid: Guid, bytes: &Bytes) -> Result<(), SessionFault> {
    let mut cursor = bytes.clone();
    let target = Guid::from_raw(cursor.get_u64_le());
    let unit = instance
        .object_mut(guid)
        .and_then(GameObject::as_unit_mut)
        .ok_or_else(|| SessionFault::protocol(format!("selection packet for unknown unit {guid:?}")))?;
    unit.set_target_guid(target);
    Ok(())
}

fn route_attack_swing(instance: &mut WorldInstance, guid: Guid, bytes: &Bytes) -> Result<(), SessionFault> {
    let mut cursor = bytes.clone();
    let target = Guid::from_raw(cursor.get_u64_le());
    let unit = instance
        .object_mut(guid)
        .and_then(GameObject::as_unit_mut)
        .ok_or_else(|| SessionFault::protocol(format!("attack packet for unknown unit {guid:?}")))?;
    unit.set_target_guid(target);
    unit.set_in_combat(!target.is_none());
    Ok(())
}

fn route_attack_stop(instance: &mut WorldInstance, guid: Guid) -> Result<(), SessionFault> {
    let unit = instance
        .object_mut(guid)
        .and_then(GameObject::as_unit_mut)
        .ok_or_else(|| SessionFault::protocol(format!("attack-stop packet for unknown unit {guid:?}")))?;
    unit.set_target_guid(Guid::NONE);
    unit.set_in_combat(false);
    Ok(())
}

fn route_cast_spell(
    instance: &WorldInstance,
    sessions: &mut SessionTable,
    guid: Guid,
    bytes: &Bytes,
    spell_catalog: &impl SpellCatalog,
    now: GameTime,
) -> Result<(), SessionFault> {
    let mut cursor = bytes.clone();
    let target_guid = Guid::from_raw(cursor.get_u64_le());
    let entry = cursor.get_u32_le();

    let requirements = spell_catalog
        .requirements(entry)
        .ok_or_else(|| SessionFault::protocol(format!("cast of unknown spell entry {entry}")))?;

    let caster = instance
        .object(guid)
        .and_then(GameObject::as_unit)
        .ok_or_else(|| SessionFault::protocol(format!("cast packet for unknown caster {guid:?}")))?;

    // Line-of-sight/immunity and the caster's busy/resource state have no
    // home yet outside this pipeline's own inputs (§9 Open Questions notes
    // the resource model is unresolved); casts are validated against
    // target presence, range, facing, and cooldown only, until those land.
    let target = if target_guid.is_none() {
        None
    } else {
        instance.object(target_guid).and_then(GameObject::as_unit).map(|unit| CastTarget {
            guid: target_guid,
            position: unit.movement().position,
            alive: unit.is_alive(),
            has_line_of_sight: true,
            immune: false,
        })
    };

    let ctx = CastContext {
        caster_alive: caster.is_alive(),
        caster_busy: false,
        caster_position: caster.movement().position,
        caster_facing: caster.movement().facing,
        resource_available: u32::MAX,
        target,
    };

    let session = sessions
        .get_mut(guid)
        .ok_or_else(|| SessionFault::protocol(format!("cast packet for unknown session {guid:?}")))?;

    match cast_spell(&requirements, &ctx, &mut session.cooldowns, entry, now) {
        Ok(pending) => {
            tracing::debug!(?guid, entry, fires_at = pending.fires_at, "cast accepted");
        }
        Err(err) => {
            tracing::debug!(?guid, entry, code = err.code(), %err, "cast rejected");
        }
    }
    Ok(())
}

fn route_inventory(
    instance: &WorldInstance,
    sessions: &mut SessionTable,
    guid: Guid,
    opcode: ClientOpcode,
    bytes: &Bytes,
    item_catalog: &impl ItemCatalog,
    now: GameTime,
) -> Result<(), SessionFault> {
    let (is_alive, in_combat) = instance
        .object(guid)
        .and_then(GameObject::as_unit)
        .map(|unit| (unit.is_alive(), unit.is_in_combat()))
        .unwrap_or((false, false));

    let session = sessions
        .get_mut(guid)
        .ok_or_else(|| SessionFault::protocol(format!("inventory packet for unknown session {guid:?}")))?;

    let mut cursor = bytes.clone();
    let mut hook = NoopHook;

    let outcome = match opcode {
        ClientOpcode::SwapItem | ClientOpcode::SwapInvItem => {
            let src = SlotAddress::unpack(cursor.get_u16_le());
            let dst = SlotAddress::unpack(cursor.get_u16_le());
            session.inventory.swap(item_catalog, src, dst, is_alive, in_combat, &mut hook)
        }
        ClientOpcode::DestroyItem => {
            let addr = SlotAddress::unpack(cursor.get_u16_le());
            let stacks = cursor.get_u16_le() as u32;
            let prices = CatalogPrices(item_catalog);
            session.inventory.remove(item_catalog, &prices, addr, stacks, false, &mut hook, now)
        }
        ClientOpcode::AutoEquipItem => {
            let src = SlotAddress::unpack(cursor.get_u16_le());
            auto_equip(session, item_catalog, src, is_alive, in_combat, &mut hook)
        }
        ClientOpcode::AutoStoreBagItem => {
            let src = SlotAddress::unpack(cursor.get_u16_le());
            auto_store_in_pack(session, item_catalog, src, is_alive, in_combat, &mut hook)
        }
        ClientOpcode::SplitItem => {
            tracing::debug!(?guid, "SplitItem has no backing domain operation yet");
            return Ok(());
        }
        _ => unreachable!("caller only dispatches inventory opcodes here"),
    };

    if let Err(err) = outcome {
        tracing::debug!(?guid, ?opcode, code = err.code(), %err, "inventory operation rejected");
    }
    Ok(())
}

/// `AutoEquipItem` carries no destination: try every equipment sub-slot in
/// order and equip into the first one `swap` accepts (§4.6 validates each
/// attempt; this just walks the table instead of the client picking a slot).
fn auto_equip(
    session: &mut PlayerSession,
    catalog: &impl ItemCatalog,
    src: SlotAddress,
    is_alive: bool,
    in_combat: bool,
    hook: &mut impl EquipmentHook,
) -> Result<(), InventoryError> {
    let mut last_err = InventoryError::WrongInventoryType;
    for index in 0..EQUIP_SLOTS {
        let dest = SlotAddress::body(index);
        match session.inventory.swap(catalog, src, dest, is_alive, in_combat, hook) {
            Ok(()) => return Ok(()),
            Err(err) => last_err = err,
        }
    }
    Err(last_err)
}

/// `AutoStoreBagItem` carries no destination: find the first empty main-pack
/// slot via [`ironspire_inventory::Inventory::occupied_slots`] and swap into
/// it (§4.6 `IsValidSlot` still runs inside `swap`).
fn auto_store_in_pack(
    session: &mut PlayerSession,
    catalog: &impl ItemCatalog,
    src: SlotAddress,
    is_alive: bool,
    in_combat: bool,
    hook: &mut impl EquipmentHook,
) -> Result<(), InventoryError> {
    let occupied: FxHashSet<u8> = session
        .inventory
        .occupied_slots()
        .into_iter()
        .filter(|(addr, _)| addr.is_pack())
        .map(|(addr, _)| addr.slot)
        .collect();
    let dest = PACK_RANGE
        .find(|slot| !occupied.contains(slot))
        .map(SlotAddress::body)
        .ok_or(InventoryError::InventoryFull)?;
    session.inventory.swap(catalog, src, dest, is_alive, in_combat, hook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironspire_combat::{SpellRequirements, StaticSpellCatalog};
    use ironspire_core::GuidKind;
    use ironspire_entity::PlayerObject;
    use ironspire_inventory::catalog::{InventoryType, ItemClass, ItemTemplate, StaticCatalog};
    use ironspire_inventory::slot::PLAYER_BODY;

    fn spawn_player(instance: &mut WorldInstance, sessions: &mut SessionTable, guid: Guid, now: GameTime) {
        let player = GameObject::Player(PlayerObject::new(guid));
        instance.spawn(player, TilePos::new(0, 0));
        let (session, _rx) = PlayerSession::new(guid, 1 << 16, 2000, now);
        sessions.insert(session);
    }

    fn packet(guid: Guid, op: ClientOpcode, bytes: Bytes) -> ProxyPacket {
        ProxyPacket {
            char_guid: guid,
            client_op: op.as_u16(),
            bytes,
        }
    }

    fn movement_bytes(timestamp: u32, position: Vec3) -> Bytes {
        use bytes::BufMut;
        let mut buf = bytes::BytesMut::new();
        buf.put_u32_le(timestamp);
        buf.put_u32_le(0); // flags, unused by the decoder
        buf.put_f32_le(position.x);
        buf.put_f32_le(position.y);
        buf.put_f32_le(position.z);
        buf.put_f32_le(0.0); // facing
        buf.put_f32_le(0.0); // pitch
        buf.put_u32_le(0); // fall time
        buf.put_f32_le(0.0); // jump velocity
        buf.put_f32_le(0.0); // jump xz speed
        buf.freeze()
    }

    #[test]
    fn double_move_start_forward_kicks_the_session() {
        let mut instance = WorldInstance::new(1, 1, 2);
        let mut sessions = SessionTable::new();
        let guid = Guid::new(GuidKind::Player, 0, 1);
        spawn_player(&mut instance, &mut sessions, guid, 0);
        let catalog = StaticCatalog::new();
        let spells = StaticSpellCatalog::new();

        let first = packet(guid, ClientOpcode::MoveStartForward, movement_bytes(1000, Vec3::ZERO));
        route_client_packet(&mut instance, &mut sessions, &first, &catalog, &spells, 10_000, 1000).unwrap();

        let second = packet(guid, ClientOpcode::MoveStartForward, movement_bytes(1100, Vec3::ZERO));
        let err = route_client_packet(&mut instance, &mut sessions, &second, &catalog, &spells, 10_000, 1100).unwrap_err();
        assert_eq!(err.kind, ironspire_core::SessionFaultKind::AntiCheatViolation);
    }

    #[test]
    fn facing_only_update_does_not_move_a_unit_off_the_origin() {
        let mut instance = WorldInstance::new(1, 1, 2);
        let mut sessions = SessionTable::new();
        let guid = Guid::new(GuidKind::Player, 0, 1);
        spawn_player(&mut instance, &mut sessions, guid, 0);
        let catalog = StaticCatalog::new();
        let spells = StaticSpellCatalog::new();

        let mut bytes = bytes::BytesMut::new();
        use bytes::BufMut;
        bytes.put_u32_le(1000);
        bytes.put_u32_le(0);
        bytes.put_f32_le(999.0); // a lying client tries to smuggle a position
        bytes.put_f32_le(0.0);
        bytes.put_f32_le(999.0);
        bytes.put_f32_le(1.57);
        bytes.put_f32_le(0.0);
        bytes.put_u32_le(0);
        bytes.put_f32_le(0.0);
        bytes.put_f32_le(0.0);

        let set_facing = packet(guid, ClientOpcode::MoveSetFacing, bytes.freeze());
        route_client_packet(&mut instance, &mut sessions, &set_facing, &catalog, &spells, 10_000, 1000).unwrap();

        let unit = instance.object(guid).and_then(GameObject::as_unit).unwrap();
        assert_eq!(unit.movement().position, Vec3::ZERO);
        assert_eq!(unit.movement().facing, 1.57);
    }

    #[test]
    fn speed_ack_with_wrong_counter_kicks_the_session() {
        let mut instance = WorldInstance::new(1, 1, 2);
        let mut sessions = SessionTable::new();
        let guid = Guid::new(GuidKind::Player, 0, 1);
        spawn_player(&mut instance, &mut sessions, guid, 0);
        let catalog = StaticCatalog::new();
        let spells = StaticSpellCatalog::new();

        let change = sessions
            .get_mut(guid)
            .unwrap()
            .pending_changes
            .push(ironspire_movement::SpeedKind::Run, 1.5, 1000);

        let mut bytes = bytes::BytesMut::new();
        use bytes::BufMut;
        bytes.put_u32_le(change.counter - 1);
        bytes.put_f32_le(1.5);
        let ack = packet(guid, ClientOpcode::ForceMoveSetRunAck, bytes.freeze());

        let err = route_client_packet(&mut instance, &mut sessions, &ack, &catalog, &spells, 10_000, 1500).unwrap_err();
        assert_eq!(err.kind, ironspire_core::SessionFaultKind::AntiCheatViolation);
        assert_eq!(sessions.get_mut(guid).unwrap().pending_changes.len(), 1);
    }

    #[test]
    fn speed_ack_with_matching_counter_and_value_empties_the_queue() {
        let mut instance = WorldInstance::new(1, 1, 2);
        let mut sessions = SessionTable::new();
        let guid = Guid::new(GuidKind::Player, 0, 1);
        spawn_player(&mut instance, &mut sessions, guid, 0);
        let catalog = StaticCatalog::new();
        let spells = StaticSpellCatalog::new();

        let change = sessions
            .get_mut(guid)
            .unwrap()
            .pending_changes
            .push(ironspire_movement::SpeedKind::Run, 1.5, 1000);

        let mut bytes = bytes::BytesMut::new();
        use bytes::BufMut;
        bytes.put_u32_le(change.counter);
        bytes.put_f32_le(1.5);
        let ack = packet(guid, ClientOpcode::ForceMoveSetRunAck, bytes.freeze());

        route_client_packet(&mut instance, &mut sessions, &ack, &catalog, &spells, 10_000, 1500).unwrap();
        assert!(sessions.get_mut(guid).unwrap().pending_changes.is_empty());
    }

    #[test]
    fn swap_item_moves_an_item_between_pack_slots() {
        let mut instance = WorldInstance::new(1, 1, 2);
        let mut sessions = SessionTable::new();
        let guid = Guid::new(GuidKind::Player, 0, 1);
        spawn_player(&mut instance, &mut sessions, guid, 0);

        let mut catalog = StaticCatalog::new();
        catalog.insert(ItemTemplate {
            entry: 1,
            item_class: ItemClass::Misc,
            inventory_type: InventoryType::NonEquippable,
            max_stack: 1,
            max_count: 0,
            bag_slots: 0,
            bind_on_pickup: false,
            bind_on_equip: false,
            can_dual_wield: false,
            sell_price: 1,
        });
        let spells = StaticSpellCatalog::new();

        {
            let session = sessions.get_mut(guid).unwrap();
            let low_id = session.inventory.next_low_id();
            session
                .inventory
                .load_item(SlotAddress::new(PLAYER_BODY, 23), ironspire_inventory::ItemRecord::new(low_id, 1, 1));
        }

        let mut bytes = bytes::BytesMut::new();
        use bytes::BufMut;
        bytes.put_u16_le(SlotAddress::new(PLAYER_BODY, 23).pack());
        bytes.put_u16_le(SlotAddress::new(PLAYER_BODY, 24).pack());
        let swap = packet(guid, ClientOpcode::SwapItem, bytes.freeze());

        route_client_packet(&mut instance, &mut sessions, &swap, &catalog, &spells, 10_000, 0).unwrap();

        let session = sessions.get_mut(guid).unwrap();
        let occupied = session.inventory.occupied_slots();
        assert!(occupied.iter().any(|(addr, _)| *addr == SlotAddress::new(PLAYER_BODY, 24)));
        assert!(!occupied.iter().any(|(addr, _)| *addr == SlotAddress::new(PLAYER_BODY, 23)));
    }

    #[test]
    fn cast_spell_against_an_unknown_entry_is_a_protocol_violation() {
        let mut instance = WorldInstance::new(1, 1, 2);
        let mut sessions = SessionTable::new();
        let guid = Guid::new(GuidKind::Player, 0, 1);
        spawn_player(&mut instance, &mut sessions, guid, 0);
        let catalog = StaticCatalog::new();
        let spells = StaticSpellCatalog::new();

        let mut bytes = bytes::BytesMut::new();
        use bytes::BufMut;
        bytes.put_u64_le(Guid::NONE.raw());
        bytes.put_u32_le(99);
        let cast = packet(guid, ClientOpcode::CastSpell, bytes.freeze());

        let err = route_client_packet(&mut instance, &mut sessions, &cast, &catalog, &spells, 10_000, 0).unwrap_err();
        assert_eq!(err.kind, ironspire_core::SessionFaultKind::ProtocolViolation);
    }

    #[test]
    fn cast_spell_without_a_target_is_accepted_when_none_is_required() {
        let mut instance = WorldInstance::new(1, 1, 2);
        let mut sessions = SessionTable::new();
        let guid = Guid::new(GuidKind::Player, 0, 1);
        spawn_player(&mut instance, &mut sessions, guid, 0);
        let catalog = StaticCatalog::new();
        let mut spells = StaticSpellCatalog::new();
        spells.insert(
            1,
            SpellRequirements {
                range: 0.0,
                requires_facing: false,
                facing_arc_radians: 0.0,
                requires_line_of_sight: false,
                cast_time_ms: 0,
                resource_cost: 0,
                cooldown_ms: 0,
                requires_target: false,
            },
        );

        let mut bytes = bytes::BytesMut::new();
        use bytes::BufMut;
        bytes.put_u64_le(Guid::NONE.raw());
        bytes.put_u32_le(1);
        let cast = packet(guid, ClientOpcode::CastSpell, bytes.freeze());

        route_client_packet(&mut instance, &mut sessions, &cast, &catalog, &spells, 10_000, 0).unwrap();
    }

    #[test]
    fn unknown_opcode_is_a_protocol_violation() {
        let mut instance = WorldInstance::new(1, 1, 2);
        let mut sessions = SessionTable::new();
        let guid = Guid::new(GuidKind::Player, 0, 1);
        spawn_player(&mut instance, &mut sessions, guid, 0);
        let catalog = StaticCatalog::new();
        let spells = StaticSpellCatalog::new();

        let bad = ProxyPacket {
            char_guid: guid,
            client_op: 0xFFFF,
            bytes: Bytes::new(),
        };
        let err = route_client_packet(&mut instance, &mut sessions, &bad, &catalog, &spells, 10_000, 0).unwrap_err();
        assert_eq!(err.kind, ironspire_core::SessionFaultKind::ProtocolViolation);
    }
}
