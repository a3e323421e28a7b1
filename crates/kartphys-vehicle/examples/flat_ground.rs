use kartphys_chassis::{Chassis, ChassisDesc};
use kartphys_core::{iso, quat_identity, vec3, DriverInput, StepCtx, StepHasher, Velocity};
use kartphys_core::hash::hex32;
use kartphys_steering::AckermannParams;
use kartphys_terrain::FlatGround;
use kartphys_vehicle::{Vehicle, VehicleParams};
use kartphys_wheel::WheelParams;

fn main() {
    let corner = |x: f32, z: f32, driven: bool| WheelParams {
        mount: vec3(x, -0.25, z),
        driven,
        ..WheelParams::default()
    };
    let vehicle = Vehicle::new(VehicleParams {
        wheels: vec![
            corner(1.25, -0.75, false), // front left
            corner(1.25, 0.75, false),  // front right
            corner(-1.25, -0.75, true), // rear left
            corner(-1.25, 0.75, true),  // rear right
        ],
        steering: AckermannParams { wheel_base: 2.5, rear_track: 1.5, turn_radius: 5.0 },
        steer_left: 0,
        steer_right: 1,
    });
    let mut vehicle = match vehicle {
        Ok(v) => v,
        Err(e) => {
            eprintln!("bad vehicle layout: {e}");
            return;
        }
    };

    // Start with every spring at rest length: mount y + rest + radius.
    let mut chassis = Chassis::new(ChassisDesc {
        pose: iso(vec3(0.0, 0.25 + 0.45 + 0.285, 0.0), quat_identity()),
        vel: Velocity::default(),
        mass: 800.0,
        half_extents: vec3(1.3, 0.35, 0.8),
    });
    let ground = FlatGround { height: 0.0 };
    let gravity = vec3(0.0, -9.81, 0.0);

    let dt = 1.0 / 50.0;
    for tick in 0..250u64 {
        let t = tick as f32 * dt;
        // Pull away, then lift and turn left.
        vehicle.apply_input(DriverInput {
            steer: if t < 2.0 { 0.0 } else { 0.4 },
            throttle: if t < 2.0 { t.min(1.0) } else { 0.2 },
        });
        // Visual clock runs at twice the physics rate here.
        vehicle.advance_visual(dt * 0.5);
        vehicle.advance_visual(dt * 0.5);
        let report = vehicle.advance_physics(&mut chassis, &ground, StepCtx { dt, tick });
        chassis.integrate(gravity, dt);

        if tick % 25 == 0 {
            let s = vehicle.follow_sample(&chassis);
            println!(
                "tick {tick:3}  pos ({:6.2}, {:4.2}, {:6.2})  speed {:5.2} m/s  grounded {}  susp {:8.1} N",
                s.position.x, s.position.y, s.position.z, s.speed,
                report.wheels_grounded, report.suspension_total,
            );
        }
    }

    // What a renderer would pull each frame: hub drop, steer yaw, roll angle.
    for (i, p) in vehicle.wheel_poses().enumerate() {
        println!(
            "wheel {i}  hub {:+.3} m  steer {:+6.2} deg  spin {:+.2} rad",
            p.offset.y, p.steer_deg, p.spin_angle,
        );
    }

    let mut h = StepHasher::new();
    chassis.digest(&mut h);
    vehicle.digest(&mut h);
    println!("state digest {}", hex32(h.finalize()));
}
