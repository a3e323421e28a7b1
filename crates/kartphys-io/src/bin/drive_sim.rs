//! Headless scenario runner: fixed physics clock, separate visual clock,
//! scripted driver input, telemetry on stdout and a state digest at the end.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use kartphys_chassis::Chassis;
use kartphys_core::hash::hex32;
use kartphys_core::{vec3, DriverInput, GroundProbe, StepCtx, StepHasher};
use kartphys_io::{build_vehicle, load_spec, spec_digest};
use kartphys_terrain::{FlatGround, HeightField};

#[derive(Parser, Debug)]
#[command(name = "drive_sim", version, about = "Drive a spec'd vehicle through a scripted run")]
struct Opts {
    /// Vehicle spec JSON
    spec: PathBuf,

    /// Physics ticks to run
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Physics rate (Hz)
    #[arg(long, default_value_t = 50.0)]
    rate: f32,

    /// Visual frames per physics tick
    #[arg(long, default_value_t = 2)]
    frames_per_tick: u32,

    /// Roll over a procedural bumpy field instead of the flat plane
    #[arg(long)]
    bumpy: bool,

    /// Print telemetry every N ticks
    #[arg(long, default_value_t = 25)]
    every: u64,
}

/// Pull away at full throttle, then lift and sweep into a left turn.
fn script(t: f32) -> DriverInput {
    DriverInput {
        steer: if t < 3.0 { 0.0 } else { ((t - 3.0) * 0.25).min(0.3) },
        throttle: if t < 3.0 { t.min(1.0) } else { 0.15 },
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opts::parse();
    anyhow::ensure!(opt.rate > 0.0, "physics rate must be positive");
    anyhow::ensure!(opt.frames_per_tick > 0, "need at least one visual frame per tick");

    let spec = load_spec(&opt.spec)?;
    log::info!("spec digest {}", hex32(spec_digest(&spec)));
    let (mut vehicle, desc) = build_vehicle(&spec)?;
    let mut chassis = Chassis::new(desc);

    let flat = FlatGround { height: 0.0 };
    let field;
    let probe: &dyn GroundProbe = if opt.bumpy {
        field = HeightField::from_fn(
            glam::UVec2::new(512, 64),
            glam::Vec2::new(1.0, 1.0),
            |x, z| 0.05 * (0.8 * x).sin() * (0.6 * z).cos(),
        );
        log::info!(
            "bumpy field {}x{} nodes, surface {:.2}..{:.2} m",
            field.dims.x, field.dims.y, field.min_y, field.max_y,
        );
        &field
    } else {
        &flat
    };

    let dt = 1.0 / opt.rate;
    let vdt = dt / opt.frames_per_tick as f32;
    let gravity = vec3(0.0, -9.81, 0.0);

    for tick in 0..opt.ticks {
        let t = tick as f32 * dt;
        vehicle.apply_input(script(t));
        for _ in 0..opt.frames_per_tick {
            vehicle.advance_visual(vdt);
        }
        let report = vehicle.advance_physics(&mut chassis, probe, StepCtx { dt, tick });
        chassis.integrate(gravity, dt);

        if tick % opt.every == 0 {
            let s = vehicle.follow_sample(&chassis);
            println!(
                "tick {tick:5}  pos ({:7.2}, {:5.2}, {:7.2})  speed {:5.2} m/s  grounded {}  susp {:8.1} N  drive {:8.1} N",
                s.position.x, s.position.y, s.position.z, s.speed,
                report.wheels_grounded, report.suspension_total, report.drive_total,
            );
        }
    }

    let mut h = StepHasher::new();
    chassis.digest(&mut h);
    vehicle.digest(&mut h);
    println!("state digest {}", hex32(h.finalize()));
    Ok(())
}
