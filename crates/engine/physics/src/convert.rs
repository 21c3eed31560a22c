//! Conversions between rapier (nalgebra) and glam math types
//!
//! Both libraries use right-handed, Y-up coordinates and store quaternions
//! as `(x, y, z, w)` with `w` the scalar part, so every conversion here is a
//! field-for-field copy with no axis remapping or sign change. Rapier's
//! quaternion accessors name the vector part `i, j, k`.

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

/// rapier vector → glam (`x → x`, `y → y`, `z → z`)
#[inline]
pub fn vec3_to_glam(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// glam vector → rapier vector
#[inline]
pub fn vec3_to_rapier(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

/// glam vector → rapier point
#[inline]
pub fn point_to_rapier(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

/// rapier rotation → glam (`i → x`, `j → y`, `k → z`, `w → w`)
#[inline]
pub fn quat_to_glam(q: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

/// glam quaternion → rapier rotation, renormalized
///
/// nalgebra's `Quaternion::new` takes the scalar part first.
#[inline]
pub fn quat_to_rapier(q: Quat) -> Rotation<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}
