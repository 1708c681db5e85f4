//! Range and facing checks shared by the cast pipeline and the attack swing
//! loop (§4.7).

use ironspire_entity::Vec3;

pub fn distance(a: Vec3, b: Vec3) -> f32 {
    let (dx, dy, dz) = (a.x - b.x, a.y - b.y, a.z - b.z);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

pub fn within_range(origin: Vec3, target: Vec3, max_range: f32) -> bool {
    distance(origin, target) <= max_range
}

/// Whether `target` lies within `arc_radians` of `facing`, measured from
/// `origin`'s horizontal (x/z) heading.
pub fn within_facing_arc(origin: Vec3, facing: f32, target: Vec3, arc_radians: f32) -> bool {
    let bearing = (target.z - origin.z).atan2(target.x - origin.x);
    let mut delta = (bearing - facing).rem_euclid(std::f32::consts::TAU);
    if delta > std::f32::consts::PI {
        delta -= std::f32::consts::TAU;
    }
    delta.abs() <= arc_radians / 2.0
}
