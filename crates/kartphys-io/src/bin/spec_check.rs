use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use kartphys_core::hash::hex32;
use kartphys_io::{build_vehicle, load_spec, spec_digest};

#[derive(Parser, Debug)]
#[command(name = "spec_check", version, about = "Validate a vehicle spec and print its derived numbers")]
struct Opts {
    /// Vehicle spec JSON
    spec: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opts::parse();

    let spec = load_spec(&opt.spec)?;
    let (vehicle, _chassis) = build_vehicle(&spec)?;

    let weight = spec.chassis.mass_kg * 9.81;
    let per_wheel = weight / spec.wheels.len() as f32;

    println!("spec:      {} (v{})", spec.name, spec.version);
    println!("digest:    {}", hex32(spec_digest(&spec)));
    println!("wheels:    {}", spec.wheels.len());
    println!("weight:    {weight:.0} N ({per_wheel:.0} N per wheel static)");
    for w in &spec.wheels {
        let sag = per_wheel / w.spring_n_per_m;
        if sag > w.travel_m {
            log::warn!("wheel '{}' bottoms out under static load", w.id);
        }
        println!(
            "  {:<12} sag {:5.1} mm of {:3.0} mm travel{}",
            w.id,
            sag * 1000.0,
            w.travel_m * 1000.0,
            if w.driven { "  [driven]" } else { "" },
        );
    }
    let lock = vehicle.steering().full_lock();
    println!("full lock: inner {:.2} deg, outer {:.2} deg", lock.left_deg, lock.right_deg);
    Ok(())
}
