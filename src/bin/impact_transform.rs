use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use impact_transform::{Matrix4, StructuralProperties, Vector3};
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(about = "Inspect the structural properties of transform matrices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Infer the properties of a matrix from its entries
    Classify {
        /// The 16 entries in column-major order
        #[arg(num_args = 16, required = true, allow_negative_numbers = true)]
        entries: Vec<f64>,
    },
    /// Compose a chain of transforms starting from the identity and compare
    /// the predicted properties with those inferred from the result
    Compose {
        /// Steps applied on the right in order, e.g. `translate:1,2,3`,
        /// `rotate:0.5,0,0,1`, `scale:2,2,2`, `perspective:1.2,1.5,0.1,100`
        /// or `orthographic:-1,1,-1,1,0.1,10`
        #[arg(required = true)]
        steps: Vec<Step>,
        /// Invert the composed matrix before reporting
        #[arg(short, long)]
        invert: bool,
    },
}

#[derive(Clone, Debug)]
enum Step {
    Translate(Vector3<f64>),
    Rotate { angle: f64, axis: Vector3<f64> },
    Scale(Vector3<f64>),
    Perspective { fovy: f64, aspect: f64, z_near: f64, z_far: f64 },
    Orthographic([f64; 6]),
}

impl Step {
    fn apply(&self, m: &mut Matrix4<f64>) {
        match self {
            Self::Translate(translation) => {
                m.translate(translation);
            }
            Self::Rotate { angle, axis } => {
                m.rotate(*angle, &axis.normalized());
            }
            Self::Scale(factors) => {
                m.scale(factors);
            }
            Self::Perspective {
                fovy,
                aspect,
                z_near,
                z_far,
            } => {
                m.perspective_mul(*fovy, *aspect, *z_near, *z_far, false);
            }
            Self::Orthographic([left, right, bottom, top, z_near, z_far]) => {
                m.orthographic_mul(*left, *right, *bottom, *top, *z_near, *z_far, false);
            }
        }
    }
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, args) = s
            .split_once(':')
            .with_context(|| format!("Missing `:` in step `{s}`"))?;
        let args = args
            .split(',')
            .map(|arg| {
                arg.trim()
                    .parse::<f64>()
                    .with_context(|| format!("Invalid number `{arg}` in step `{s}`"))
            })
            .collect::<Result<Vec<_>>>()?;

        let expect_args = |count: usize| -> Result<()> {
            if args.len() != count {
                bail!(
                    "Step `{name}` takes {count} arguments, got {}",
                    args.len()
                );
            }
            Ok(())
        };

        match name {
            "translate" => {
                expect_args(3)?;
                Ok(Self::Translate(Vector3::new(args[0], args[1], args[2])))
            }
            "rotate" => {
                expect_args(4)?;
                Ok(Self::Rotate {
                    angle: args[0],
                    axis: Vector3::new(args[1], args[2], args[3]),
                })
            }
            "scale" => {
                expect_args(3)?;
                Ok(Self::Scale(Vector3::new(args[0], args[1], args[2])))
            }
            "perspective" => {
                expect_args(4)?;
                Ok(Self::Perspective {
                    fovy: args[0],
                    aspect: args[1],
                    z_near: args[2],
                    z_far: args[3],
                })
            }
            "orthographic" => {
                expect_args(6)?;
                Ok(Self::Orthographic([
                    args[0], args[1], args[2], args[3], args[4], args[5],
                ]))
            }
            _ => bail!("Unknown step `{name}`"),
        }
    }
}

fn report(m: &Matrix4<f64>) {
    let rows = m.to_rows_array();
    for row in rows.chunks_exact(4) {
        println!(
            "[{:>10.4} {:>10.4} {:>10.4} {:>10.4}]",
            row[0], row[1], row[2], row[3]
        );
    }

    let mut inferred = *m;
    inferred.determine_properties();

    println!(
        "predicted: {:?} ({})",
        m.properties(),
        m.properties().class()
    );
    println!(
        "inferred:  {:?} ({})",
        inferred.properties(),
        inferred.properties().class()
    );
    println!("predicted properties hold: {}", m.properties_hold());
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Classify { entries } => {
            let m = Matrix4::from_column_slice(&entries);
            log::debug!("Classified matrix as {}", m.class());
            report(&m);
        }
        Command::Compose { steps, invert } => {
            let mut m = Matrix4::identity();
            for step in &steps {
                step.apply(&mut m);
                log::debug!("After {step:?}: {}", m.class());
            }
            if invert {
                let Some(inverse) = m.try_inverse() else {
                    bail!("The composed matrix is singular");
                };
                m = inverse;
            }
            report(&m);
        }
    }
    Ok(())
}
