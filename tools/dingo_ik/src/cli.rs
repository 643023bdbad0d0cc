use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kinematics::LegId;

/// `dingo_ik` - solve the leg joint angles of the dingo quadruped
///
/// Foot targets are given in the body frame in meters: x points forward, y to the left and z up.
/// Angles are printed in degrees, mapped to the servo zero points unless `--raw` is passed.
///
/// # Solving a single leg
/// ```sh
/// dingo_ik leg fr 0.11 -0.06 -0.2
/// ```
///
/// # Solving a stance
/// ```sh
/// dingo_ik stance --height 0.2 --forward 0.02
/// ```
#[derive(Parser)]
#[command(name = "dingo_ik", version, allow_negative_numbers = true)]
pub struct Cli {
    /// Directory containing `kinematics.toml`
    #[arg(short, long, default_value = "config")]
    pub config: PathBuf,

    /// Apply the overlay in `<config>/overlay/<robot>`
    #[arg(short, long)]
    pub robot: Option<String>,

    /// Print the solver angles without applying the angle convention
    #[arg(long)]
    pub raw: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Overlay directory of the selected robot, if any.
    #[must_use]
    pub fn overlay(&self) -> Option<PathBuf> {
        self.robot
            .as_ref()
            .map(|robot| self.config.join("overlay").join(robot))
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Solve one leg from a body-frame foot target
    #[command(allow_negative_numbers = true)]
    Leg {
        /// One of `fr`, `fl`, `br` or `bl`
        #[arg(value_parser = parse_leg)]
        leg: LegId,
        x: f64,
        y: f64,
        z: f64,
    },
    /// Place every foot below its leg origin and solve all legs
    #[command(allow_negative_numbers = true)]
    Stance {
        /// Distance between the leg origins and the feet
        #[arg(long)]
        height: f64,

        /// Shift of every foot along the x-axis
        #[arg(long, default_value_t = 0.0)]
        forward: f64,

        /// Shift of every foot along the y-axis
        #[arg(long, default_value_t = 0.0)]
        lateral: f64,
    },
}

fn parse_leg(name: &str) -> Result<LegId, String> {
    LegId::ALL
        .into_iter()
        .find(|leg| leg.short_name().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown leg `{name}`, expected one of fr, fl, br or bl"))
}
