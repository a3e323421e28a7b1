//! Ground providers for the suspension probe.
//!
//! `FlatGround` answers the ray in closed form; `HeightField` is a regular
//! grid with bilinear height interpolation and a marching raycast. Both
//! implement `kartphys_core::GroundProbe`.

use glam::{UVec2, Vec2};
use kartphys_core::{GroundProbe, RayHit, Scalar, Vec3};

/// Infinite level plane at `height`. The probe of choice for tests and
/// first demos.
#[derive(Copy, Clone, Debug)]
pub struct FlatGround {
    pub height: Scalar,
}

impl GroundProbe for FlatGround {
    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_dist: Scalar) -> Option<RayHit> {
        if dir.y.abs() <= f32::EPSILON {
            return None;
        }
        let t = (self.height - origin.y) / dir.y;
        if t < 0.0 || t > max_dist {
            return None;
        }
        Some(RayHit {
            distance: t,
            point: origin + dir * t,
            normal: Vec3::Y,
        })
    }
}

/// Regular grid heightfield. Heights are world-space y at grid nodes;
/// node (0,0) sits at world (0,0) and samples clamp at the edges.
#[derive(Clone, Debug)]
pub struct HeightField {
    pub dims: UVec2,     // nx, nz (columns in x, rows in z)
    pub cell: Vec2,      // sx, sz (world units per cell)
    pub heights: Vec<f32>,
    pub min_y: f32,
    pub max_y: f32,
}

impl HeightField {
    pub fn from_heights(dims: UVec2, cell: Vec2, heights: Vec<f32>) -> Self {
        assert!(
            dims.x >= 2 && dims.y >= 2,
            "heightfield needs at least 2x2 nodes"
        );
        assert_eq!((dims.x as usize) * (dims.y as usize), heights.len());
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        for &h in &heights {
            min_y = min_y.min(h);
            max_y = max_y.max(h);
        }
        Self { dims, cell, heights, min_y, max_y }
    }

    /// Build by sampling `f(world_x, world_z)` at every node.
    pub fn from_fn(dims: UVec2, cell: Vec2, mut f: impl FnMut(f32, f32) -> f32) -> Self {
        let mut heights = Vec::with_capacity((dims.x * dims.y) as usize);
        for z in 0..dims.y {
            for x in 0..dims.x {
                heights.push(f(x as f32 * cell.x, z as f32 * cell.y));
            }
        }
        Self::from_heights(dims, cell, heights)
    }

    #[cfg(feature = "image")]
    pub fn from_png_bytes(png: &[u8], cell: Vec2, y_scale: f32) -> image::ImageResult<Self> {
        let img = image::load_from_memory(png)?.to_luma8();
        let (w, h) = img.dimensions();
        let mut heights = Vec::with_capacity((w * h) as usize);
        for z in 0..h {
            for x in 0..w {
                let v = img.get_pixel(x, z).0[0] as f32 / 255.0;
                heights.push(v * y_scale);
            }
        }
        Ok(Self::from_heights(UVec2::new(w, h), cell, heights))
    }

    #[inline] fn idx(&self, x: i32, z: i32) -> usize {
        (x as usize) + (z as usize) * (self.dims.x as usize)
    }
    #[inline] fn h(&self, x: i32, z: i32) -> f32 { self.heights[self.idx(x, z)] }

    /// Bilinear height at world (x,z). Off-grid coordinates clamp to the edge.
    pub fn sample_height(&self, x: f32, z: f32) -> f32 {
        let nx = self.dims.x as i32; let nz = self.dims.y as i32;
        let sx = self.cell.x;        let sz = self.cell.y;
        let fx = (x / sx).clamp(0.0, (nx - 1) as f32 - 1e-5);
        let fz = (z / sz).clamp(0.0, (nz - 1) as f32 - 1e-5);
        let x0 = fx.floor() as i32; let x1 = (x0 + 1).min(nx - 1);
        let z0 = fz.floor() as i32; let z1 = (z0 + 1).min(nz - 1);
        let tx = fx - x0 as f32;    let tz = fz - z0 as f32;

        let h00 = self.h(x0, z0);
        let h10 = self.h(x1, z0);
        let h01 = self.h(x0, z1);
        let h11 = self.h(x1, z1);
        let a = h00 * (1.0 - tx) + h10 * tx;
        let b = h01 * (1.0 - tx) + h11 * tx;
        a * (1.0 - tz) + b * tz
    }

    /// Central-diff surface normal (unit).
    pub fn sample_normal(&self, x: f32, z: f32) -> Vec3 {
        let hx0 = self.sample_height((x - self.cell.x).max(0.0), z);
        let hx1 = self.sample_height(x + self.cell.x, z);
        let hz0 = self.sample_height(x, (z - self.cell.y).max(0.0));
        let hz1 = self.sample_height(x, z + self.cell.y);

        let ddx = (hx1 - hx0) / (2.0 * self.cell.x.max(1e-6));
        let ddz = (hz1 - hz0) / (2.0 * self.cell.y.max(1e-6));

        Vec3::new(-ddx, 1.0, -ddz).normalize_or_zero()
    }

    /// Signed height of a point above the surface under it.
    #[inline]
    fn clearance(&self, p: Vec3) -> f32 {
        p.y - self.sample_height(p.x, p.z)
    }
}

impl GroundProbe for HeightField {
    /// March the ray at quarter-cell resolution, then bisect the first
    /// crossing. Suspension rays are short, so the march stays cheap; the
    /// bisection brings the hit to about a millimeter on meter-sized cells.
    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_dist: Scalar) -> Option<RayHit> {
        if self.clearance(origin) <= 0.0 {
            // Starting inside the ground counts as an immediate hit.
            return Some(RayHit {
                distance: 0.0,
                point: origin,
                normal: self.sample_normal(origin.x, origin.z),
            });
        }
        // The segment's lowest y is at an endpoint; if even that clears the
        // tallest node there is nothing to march over.
        if origin.y.min(origin.y + dir.y * max_dist) > self.max_y {
            return None;
        }

        let step = (0.25 * self.cell.x.min(self.cell.y)).max(1e-3);
        let mut t_above = 0.0;
        loop {
            let t_next = (t_above + step).min(max_dist);
            if self.clearance(origin + dir * t_next) <= 0.0 {
                // Bracketed: refine between the last point above and this one.
                let (mut lo, mut hi) = (t_above, t_next);
                for _ in 0..8 {
                    let mid = 0.5 * (lo + hi);
                    if self.clearance(origin + dir * mid) > 0.0 {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                let point = origin + dir * hi;
                return Some(RayHit {
                    distance: hi,
                    point,
                    normal: self.sample_normal(point.x, point.z),
                });
            }
            if t_next >= max_dist {
                return None;
            }
            t_above = t_next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use kartphys_core::vec3;

    #[test]
    fn flat_ground_reports_exact_distance() {
        let g = FlatGround { height: 0.5 };
        let hit = g.cast_ray(vec3(3.0, 2.0, -1.0), vec3(0.0, -1.0, 0.0), 5.0)
            .expect("ray straight down must hit");
        assert_relative_eq!(hit.distance, 1.5, epsilon = 1e-6);
        assert_relative_eq!(hit.point.y, 0.5, epsilon = 1e-6);
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn flat_ground_misses_beyond_range() {
        let g = FlatGround { height: 0.0 };
        assert!(g.cast_ray(vec3(0.0, 2.0, 0.0), vec3(0.0, -1.0, 0.0), 1.0).is_none());
        // Ray pointing away never hits.
        assert!(g.cast_ray(vec3(0.0, 2.0, 0.0), vec3(0.0, 1.0, 0.0), 100.0).is_none());
    }

    fn ramp() -> HeightField {
        // Height rises 0.1 per meter of x.
        HeightField::from_fn(UVec2::new(64, 64), Vec2::new(1.0, 1.0), |x, _| 0.1 * x)
    }

    #[test]
    fn bilinear_sample_matches_plane() {
        let hf = ramp();
        assert_relative_eq!(hf.sample_height(10.0, 7.0), 1.0, epsilon = 1e-5);
        assert_relative_eq!(hf.sample_height(10.5, 7.3), 1.05, epsilon = 1e-5);
    }

    #[test]
    fn normal_tilts_against_slope() {
        let hf = ramp();
        let n = hf.sample_normal(20.0, 20.0);
        assert!(n.x < 0.0);
        assert!(n.y > 0.9);
        assert_relative_eq!(n.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn raycast_hits_ramp_within_tolerance() {
        let hf = ramp();
        let hit = hf.cast_ray(vec3(10.0, 3.0, 5.0), vec3(0.0, -1.0, 0.0), 5.0)
            .expect("downward ray over the grid must land");
        // Surface at x=10 is y=1.0, so the ray travels 2.0 down.
        assert_relative_eq!(hit.distance, 2.0, epsilon = 2e-3);
        assert_relative_eq!(hit.point.y, 1.0, epsilon = 2e-3);
    }

    #[test]
    fn raycast_misses_when_too_short() {
        let hf = ramp();
        assert!(hf.cast_ray(vec3(10.0, 3.0, 5.0), vec3(0.0, -1.0, 0.0), 1.5).is_none());
    }

    #[test]
    fn raycast_skips_rays_that_stay_above_the_field() {
        let hf = ramp();
        // Level flight above the tallest node never crosses the surface,
        // however far it flies.
        assert!(hf
            .cast_ray(vec3(0.0, 50.0, 5.0), vec3(1.0, 0.0, 0.0), 10_000.0)
            .is_none());
        // A descending ray from the same height still lands.
        assert!(hf
            .cast_ray(vec3(10.0, 50.0, 5.0), vec3(0.0, -1.0, 0.0), 60.0)
            .is_some());
    }

    #[test]
    #[should_panic(expected = "at least 2x2")]
    fn rejects_single_column_grids() {
        HeightField::from_fn(UVec2::new(1, 64), Vec2::new(1.0, 1.0), |_, _| 0.0);
    }
}
