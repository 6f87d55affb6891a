use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument};

use crate::bsp::Polygon;
use crate::types::{Axis, KernelError};

/// Signed area of a 2D loop, positive when counter-clockwise.
pub fn signed_area(profile: &[[f64; 2]]) -> f64 {
    let n = profile.len();
    (0..n)
        .map(|i| {
            let (a, b) = (profile[i], profile[(i + 1) % n]);
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<f64>()
        / 2.0
}

/// Drop consecutive duplicates, reject non-finite or non-convex loops, and
/// return the loop in counter-clockwise order.
pub fn normalize_profile(profile: &[[f64; 2]]) -> Result<Vec<[f64; 2]>, KernelError> {
    if profile.iter().flatten().any(|c| !c.is_finite()) {
        return Err(KernelError::InvalidProfile {
            reason: "profile contains non-finite coordinates".to_string(),
        });
    }
    let mut pts: Vec<[f64; 2]> = Vec::with_capacity(profile.len());
    for p in profile {
        let dup = pts
            .last()
            .is_some_and(|q| (q[0] - p[0]).abs() < 1e-9 && (q[1] - p[1]).abs() < 1e-9);
        if !dup {
            pts.push(*p);
        }
    }
    while pts.len() > 1 {
        let (first, last) = (pts[0], pts[pts.len() - 1]);
        if (first[0] - last[0]).abs() < 1e-9 && (first[1] - last[1]).abs() < 1e-9 {
            pts.pop();
        } else {
            break;
        }
    }
    if pts.len() < 3 {
        return Err(KernelError::InvalidProfile {
            reason: format!("profile needs at least 3 distinct points, got {}", pts.len()),
        });
    }
    let area = signed_area(&pts);
    if area.abs() < 1e-9 {
        return Err(KernelError::InvalidProfile {
            reason: "profile has zero area".to_string(),
        });
    }
    if area < 0.0 {
        pts.reverse();
    }
    let n = pts.len();
    for i in 0..n {
        let (a, b, c) = (pts[i], pts[(i + 1) % n], pts[(i + 2) % n]);
        let cross = (b[0] - a[0]) * (c[1] - b[1]) - (b[1] - a[1]) * (c[0] - b[0]);
        if cross < -1e-9 {
            return Err(KernelError::InvalidProfile {
                reason: format!("profile is not convex at vertex {}", (i + 1) % n),
            });
        }
    }
    Ok(pts)
}

fn point(axis: Axis, u: f64, v: f64, w: f64) -> Point3<f64> {
    let p = axis.compose(u, v, w);
    Point3::new(p[0], p[1], p[2])
}

fn axis_direction(axis: Axis) -> Vector3<f64> {
    let mut d = Vector3::zeros();
    d[axis.index()] = 1.0;
    d
}

/// Extrude a convex 2D profile along `axis` from `start` to `start + length`.
pub fn extrude_polygons(
    profile: &[[f64; 2]],
    axis: Axis,
    start: f64,
    length: f64,
) -> Result<Vec<Polygon>, KernelError> {
    if !(length.is_finite() && length > 1e-9) {
        return Err(KernelError::invalid_parameter(
            "length",
            format!("extrusion length must be positive, got {length}"),
        ));
    }
    let loop2d = normalize_profile(profile)?;
    let mut bottom: Vec<Point3<f64>> = loop2d
        .iter()
        .map(|p| point(axis, p[0], p[1], start))
        .collect();
    let mut top: Vec<Point3<f64>> = loop2d
        .iter()
        .map(|p| point(axis, p[0], p[1], start + length))
        .collect();

    // The YZ/XZ mappings do not all preserve handedness, so orient the loop
    // against the extrusion direction in world space.
    let facing = Polygon::new(bottom.clone())
        .map(|p| p.plane.normal.dot(&axis_direction(axis)))
        .unwrap_or(1.0);
    if facing < 0.0 {
        bottom.reverse();
        top.reverse();
    }

    let n = bottom.len();
    let mut polygons = Vec::with_capacity(n + 2);
    let mut cap = bottom.clone();
    cap.reverse();
    polygons.extend(Polygon::new(cap));
    polygons.extend(Polygon::new(top.clone()));
    for i in 0..n {
        let j = (i + 1) % n;
        polygons.extend(Polygon::new(vec![bottom[i], bottom[j], top[j], top[i]]));
    }
    Ok(polygons)
}

/// Axis-aligned box from its minimum corner and size.
#[instrument(level = "debug")]
pub fn cuboid_polygons(min: [f64; 3], size: [f64; 3]) -> Result<Vec<Polygon>, KernelError> {
    if size.iter().any(|s| !(s.is_finite() && *s > 1e-9)) {
        return Err(KernelError::invalid_parameter(
            "size",
            format!("cuboid size must be positive, got {size:?}"),
        ));
    }
    let rect = [
        [min[0], min[1]],
        [min[0] + size[0], min[1]],
        [min[0] + size[0], min[1] + size[1]],
        [min[0], min[1] + size[1]],
    ];
    extrude_polygons(&rect, Axis::Z, min[2], size[2])
}

/// Regular polygon approximation of a circle, counter-clockwise.
pub fn circle_profile(center: [f64; 2], radius: f64, segments: u32) -> Vec<[f64; 2]> {
    (0..segments)
        .map(|i| {
            let a = TAU * f64::from(i) / f64::from(segments);
            [center[0] + radius * a.cos(), center[1] + radius * a.sin()]
        })
        .collect()
}

/// Cylinder whose base circle is centered at `base_center`, running `length`
/// along the positive `axis` direction.
#[instrument(level = "debug")]
pub fn cylinder_polygons(
    axis: Axis,
    base_center: [f64; 3],
    radius: f64,
    length: f64,
    segments: u32,
) -> Result<Vec<Polygon>, KernelError> {
    if !(radius.is_finite() && radius > 1e-9) {
        return Err(KernelError::invalid_parameter(
            "radius",
            format!("cylinder radius must be positive, got {radius}"),
        ));
    }
    if segments < 3 {
        return Err(KernelError::invalid_parameter(
            "segments",
            format!("a cylinder needs at least 3 segments, got {segments}"),
        ));
    }
    let (u, v, w) = axis.decompose(base_center);
    let profile = circle_profile([u, v], radius, segments);
    let polys = extrude_polygons(&profile, axis, w, length)?;
    debug!(faces = polys.len(), "cylinder built");
    Ok(polys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clockwise_profile_is_reversed() {
        let cw = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];
        let out = normalize_profile(&cw).unwrap();
        assert!(signed_area(&out) > 0.0);
    }

    #[test]
    fn concave_profile_is_rejected() {
        let l_shape = [
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 2.0],
            [0.0, 2.0],
        ];
        assert!(matches!(
            normalize_profile(&l_shape),
            Err(KernelError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn closing_duplicate_point_is_ignored() {
        let tri = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        assert_eq!(normalize_profile(&tri).unwrap().len(), 3);
    }

    #[test]
    fn extruded_faces_point_outward_on_every_axis() {
        let profile = [[0.0, 0.0], [2.0, 0.0], [2.0, 3.0], [0.0, 3.0]];
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let polys = extrude_polygons(&profile, axis, 1.0, 4.0).unwrap();
            assert_eq!(polys.len(), 6);
            let n = polys.iter().map(|p| p.vertices.len()).sum::<usize>() as f64;
            let centroid = polys
                .iter()
                .flat_map(|p| p.vertices.iter())
                .fold(Vector3::zeros(), |acc, v| acc + v.coords)
                / n;
            for p in &polys {
                let to_face = p.vertices[0].coords - centroid;
                assert!(
                    p.plane.normal.dot(&to_face) > 0.0,
                    "face on {axis:?} extrusion points inward"
                );
            }
        }
    }

    #[test]
    fn zero_size_cuboid_is_rejected() {
        assert!(cuboid_polygons([0.0; 3], [1.0, 0.0, 1.0]).is_err());
    }
}
