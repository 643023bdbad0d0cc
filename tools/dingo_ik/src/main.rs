use clap::Parser;
use kinematics::{Error, JointAngles, Kinematics, LegId, Legs, TracingSink, WarningSink};
use miette::Result;
use nalgebra::{Vector3, vector};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

fn main() -> Result<()> {
    miette::set_panic_hook();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let overlay = cli.overlay();
    let kinematics = Kinematics::load(&cli.config, overlay.as_deref())?;

    match cli.command {
        Command::Leg { leg, x, y, z } => solve_leg(&kinematics, leg, vector![x, y, z], cli.raw)?,
        Command::Stance {
            height,
            forward,
            lateral,
        } => solve_stance(&kinematics, vector![forward, lateral, -height], cli.raw),
    }

    Ok(())
}

fn solve_leg(kinematics: &Kinematics, leg: LegId, target: Vector3<f64>, raw: bool) -> Result<()> {
    let solution = kinematics
        .solver()
        .solve_leg(leg, &target)
        .map_err(|source| Error::Solve { leg, source })?;

    for warning in solution.warnings.iter() {
        TracingSink.warn(leg, &warning);
    }
    tracing::debug!(%leg, reach = solution.reach, "solved leg");

    let angles = if raw {
        solution.angles
    } else {
        kinematics.convention().apply_leg(leg, solution.angles)
    };
    print_angles(leg, angles);

    Ok(())
}

fn solve_stance(kinematics: &Kinematics, offset: Vector3<f64>, raw: bool) {
    let geometry = kinematics.solver().geometry();
    let targets = Legs::from_fn(|leg| geometry.leg_origin(leg) + offset);

    let angles = if raw {
        let solution = kinematics.solver().solve(&targets);
        solution.report(&TracingSink);
        solution.leg_angles()
    } else {
        kinematics.solve(&targets, &TracingSink)
    };

    for (leg, result) in angles.iter() {
        match result {
            Ok(angles) => print_angles(leg, *angles),
            Err(error) => tracing::error!(%leg, %error, "failed to solve leg"),
        }
    }
}

fn print_angles(leg: LegId, angles: JointAngles) {
    let JointAngles { hip, upper, lower } = angles.to_degrees();
    println!("{leg}: hip {hip:8.3}°  upper {upper:8.3}°  lower {lower:8.3}°");
}

