//! Ray casting from the cursor to select bodies.

use glam::{DMat4, DVec2, DVec3, DVec4};

use crate::catalog::{BodyId, Catalog};

/// A half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Returns `None` for a zero-length direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Unproject a point in normalized device coordinates through the inverse
    /// view-projection matrix. Uses the wgpu depth range, near plane at 0.
    pub fn from_ndc(ndc: DVec2, inverse_view_proj: DMat4) -> Option<Self> {
        let unproject = |z: f64| {
            let clip = inverse_view_proj * DVec4::new(ndc.x, ndc.y, z, 1.0);
            (clip.w.abs() > f64::EPSILON).then(|| clip.truncate() / clip.w)
        };
        let near = unproject(0.0)?;
        let far = unproject(1.0)?;
        Self::new(near, far - near)
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Convert a cursor position in physical pixels to NDC (`y` up).
pub fn cursor_to_ndc(cursor: DVec2, viewport: DVec2) -> DVec2 {
    DVec2::new(
        2.0 * cursor.x / viewport.x.max(1.0) - 1.0,
        1.0 - 2.0 * cursor.y / viewport.y.max(1.0),
    )
}

/// Distance along `ray` to the first intersection with a sphere, if any.
///
/// A ray starting inside the sphere hits at its exit point.
pub fn ray_sphere(ray: &Ray, center: DVec3, radius: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Nearest body hit by `ray`. `positions` is in catalog order.
pub fn pick(ray: &Ray, catalog: &Catalog, positions: &[DVec3]) -> Option<BodyId> {
    catalog
        .iter()
        .zip(positions)
        .filter_map(|((id, body), &center)| ray_sphere(ray, center, body.radius).map(|t| (id, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}
