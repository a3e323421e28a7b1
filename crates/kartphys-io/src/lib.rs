//! Vehicle specs on disk.
//!
//! A `VehicleSpecFile` is the JSON tuning sheet for one car: chassis,
//! steering geometry and per-wheel suspension numbers. Loading lowers it
//! into validated runtime parameters and a stable digest for provenance.

use anyhow::{anyhow, bail, Context, Result};
use blake3::Hasher;
use serde::{Deserialize, Serialize};
use std::path::Path;

use kartphys_chassis::ChassisDesc;
use kartphys_core::{iso, quat_identity, vec3, Velocity};
use kartphys_steering::AckermannParams;
use kartphys_vehicle::{Vehicle, VehicleParams};
use kartphys_wheel::WheelParams;

/// On-disk vehicle description. Units ride in the field names so the files
/// read unambiguously.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSpecFile {
    pub version: u32, // bump if layout changes
    pub name: String,
    pub chassis: ChassisSpec,
    pub steering: SteeringSpec,
    pub wheels: Vec<WheelSpec>,
    /// Which wheel ids form the steered front pair.
    pub front: FrontPair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChassisSpec {
    pub mass_kg: f32,
    pub half_extents_m: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteeringSpec {
    pub wheel_base_m: f32,
    pub rear_track_m: f32,
    pub turn_radius_m: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelSpec {
    pub id: String,
    pub mount_m: [f32; 3],
    pub rest_length_m: f32,
    pub travel_m: f32,
    pub spring_n_per_m: f32,
    pub damper_n_s_per_m: f32,
    pub radius_m: f32,
    pub lateral_grip: f32,
    pub driven: bool,
    pub engine_power: f32,
    pub brake_power: f32,
    pub steer_smoothing_hz: f32,
    pub spin_decay_hz: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontPair {
    pub left: String,
    pub right: String,
}

/// Load a vehicle spec from JSON.
pub fn load_spec(path: &Path) -> Result<VehicleSpecFile> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read vehicle spec {}", path.display()))?;
    let spec: VehicleSpecFile = serde_json::from_str(&s)
        .with_context(|| format!("failed to parse vehicle spec {}", path.display()))?;
    log::info!("loaded vehicle spec '{}' ({} wheels)", spec.name, spec.wheels.len());
    Ok(spec)
}

/// Write a spec to JSON at `out_path`. If `pretty`, pretty-print.
pub fn write_spec(spec: &VehicleSpecFile, out_path: &Path, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(spec)?
    } else {
        serde_json::to_string(spec)?
    };
    std::fs::write(out_path, json)
        .with_context(|| format!("failed to write vehicle spec {}", out_path.display()))?;
    Ok(())
}

/// Stable blake3 digest over everything that affects simulation.
pub fn spec_digest(spec: &VehicleSpecFile) -> [u8; 32] {
    let mut h = Hasher::new();
    h.update(b"KARTv1\0");
    h.update(&spec.version.to_le_bytes());
    h.update(spec.name.as_bytes());
    h.update(&spec.chassis.mass_kg.to_le_bytes());
    for c in spec.chassis.half_extents_m {
        h.update(&c.to_le_bytes());
    }
    for f in [
        spec.steering.wheel_base_m,
        spec.steering.rear_track_m,
        spec.steering.turn_radius_m,
    ] {
        h.update(&f.to_le_bytes());
    }
    // Wheels in order; id length + bytes keeps the stream unambiguous.
    for w in &spec.wheels {
        let id = w.id.as_bytes();
        h.update(&(id.len() as u64).to_le_bytes());
        h.update(id);
        for c in w.mount_m {
            h.update(&c.to_le_bytes());
        }
        for f in [
            w.rest_length_m,
            w.travel_m,
            w.spring_n_per_m,
            w.damper_n_s_per_m,
            w.radius_m,
            w.lateral_grip,
            w.engine_power,
            w.brake_power,
            w.steer_smoothing_hz,
            w.spin_decay_hz,
        ] {
            h.update(&f.to_le_bytes());
        }
        h.update(&[w.driven as u8]);
    }
    h.update(spec.front.left.as_bytes());
    h.update(&[0]);
    h.update(spec.front.right.as_bytes());
    *h.finalize().as_bytes()
}

/// Chassis origin height that puts every spring at rest on ground level zero.
pub fn rest_height(spec: &VehicleSpecFile) -> f32 {
    spec.wheels
        .iter()
        .map(|w| w.rest_length_m + w.radius_m - w.mount_m[1])
        .fold(0.0, f32::max)
}

/// Lower a spec file into a ready vehicle and a chassis descriptor parked
/// at rest height over y=0. All fail-fast validation happens here.
pub fn build_vehicle(spec: &VehicleSpecFile) -> Result<(Vehicle, ChassisDesc)> {
    if !(spec.chassis.mass_kg.is_finite() && spec.chassis.mass_kg > 0.0) {
        bail!("chassis mass must be positive, got {}", spec.chassis.mass_kg);
    }
    let he = spec.chassis.half_extents_m;
    if he.iter().any(|&e| !(e.is_finite() && e > 0.0)) {
        bail!("chassis half extents must be positive, got {:?}", he);
    }

    let find = |id: &str| {
        spec.wheels
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| anyhow!("front pair names unknown wheel id '{}'", id))
    };
    let steer_left = find(&spec.front.left)?;
    let steer_right = find(&spec.front.right)?;

    let wheels = spec
        .wheels
        .iter()
        .map(|w| WheelParams {
            mount: vec3(w.mount_m[0], w.mount_m[1], w.mount_m[2]),
            rest_length: w.rest_length_m,
            travel: w.travel_m,
            spring_stiffness: w.spring_n_per_m,
            damper_stiffness: w.damper_n_s_per_m,
            wheel_radius: w.radius_m,
            lateral_grip: w.lateral_grip,
            driven: w.driven,
            engine_power: w.engine_power,
            brake_power: w.brake_power,
            steer_smoothing: w.steer_smoothing_hz,
            spin_decay: w.spin_decay_hz,
        })
        .collect();

    let vehicle = Vehicle::new(VehicleParams {
        wheels,
        steering: AckermannParams {
            wheel_base: spec.steering.wheel_base_m,
            rear_track: spec.steering.rear_track_m,
            turn_radius: spec.steering.turn_radius_m,
        },
        steer_left,
        steer_right,
    })
    .with_context(|| format!("vehicle spec '{}' failed validation", spec.name))?;

    let desc = ChassisDesc {
        pose: iso(vec3(0.0, rest_height(spec), 0.0), quat_identity()),
        vel: Velocity::default(),
        mass: spec.chassis.mass_kg,
        half_extents: vec3(he[0], he[1], he[2]),
    };
    Ok((vehicle, desc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buggy_json() -> &'static str {
        include_str!("../specs/buggy.json")
    }

    #[test]
    fn bundled_buggy_parses_and_builds() {
        let spec: VehicleSpecFile = serde_json::from_str(buggy_json()).expect("bundled spec parses");
        assert_eq!(spec.wheels.len(), 4);
        let (vehicle, desc) = build_vehicle(&spec).expect("bundled spec builds");
        assert_eq!(vehicle.wheels().len(), 4);
        assert!(desc.pose.pos.y > 0.0);
        // Rest height clears every wheel's droop range.
        let lowest = spec
            .wheels
            .iter()
            .map(|w| w.rest_length_m + w.radius_m - w.mount_m[1])
            .fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(desc.pose.pos.y, lowest);
    }

    #[test]
    fn digest_is_stable_and_tune_sensitive() {
        let a: VehicleSpecFile = serde_json::from_str(buggy_json()).expect("parses");
        let b: VehicleSpecFile = serde_json::from_str(buggy_json()).expect("parses");
        assert_eq!(spec_digest(&a), spec_digest(&b));

        let mut c = b;
        c.wheels[0].spring_n_per_m += 1.0;
        assert_ne!(spec_digest(&a), spec_digest(&c));

        let mut d = a.clone();
        d.front.left = a.front.right.clone();
        d.front.right = a.front.left.clone();
        assert_ne!(spec_digest(&a), spec_digest(&d));
    }

    #[test]
    fn written_spec_reloads_with_the_same_digest() {
        let spec: VehicleSpecFile = serde_json::from_str(buggy_json()).expect("parses");
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("buggy_roundtrip.json");

        write_spec(&spec, &path, true).expect("spec writes");
        let back = load_spec(&path).expect("written spec reloads");
        assert_eq!(spec_digest(&spec), spec_digest(&back));

        // The compact form carries the same payload.
        write_spec(&spec, &path, false).expect("spec writes compact");
        let compact = load_spec(&path).expect("compact spec reloads");
        assert_eq!(spec_digest(&spec), spec_digest(&compact));
    }

    #[test]
    fn unknown_front_id_is_an_error() {
        let mut spec: VehicleSpecFile = serde_json::from_str(buggy_json()).expect("parses");
        spec.front.left = "no_such_wheel".into();
        let err = build_vehicle(&spec).unwrap_err();
        assert!(err.to_string().contains("no_such_wheel"));
    }

    #[test]
    fn bad_wheel_numbers_fail_fast() {
        let mut spec: VehicleSpecFile = serde_json::from_str(buggy_json()).expect("parses");
        spec.wheels[2].travel_m = -0.1;
        assert!(build_vehicle(&spec).is_err());

        let mut spec: VehicleSpecFile = serde_json::from_str(buggy_json()).expect("parses");
        spec.chassis.mass_kg = 0.0;
        assert!(build_vehicle(&spec).is_err());

        let mut spec: VehicleSpecFile = serde_json::from_str(buggy_json()).expect("parses");
        spec.steering.turn_radius_m = 0.2;
        assert!(build_vehicle(&spec).is_err());
    }
}
