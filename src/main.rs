//! Command-line front end: parses fractions, optionally reduces or inverts them, and prints them.
use clap::Parser;
use log::{debug, warn};

use fraction::Fraction;

#[derive(Parser, Debug)]
#[command(about = "Reduce, invert and evaluate fractions such as 30000/1001 or 16:9")]
struct Args {
    /// Fractions written as `num/den`, `num:den` or `num`. Options go before the first fraction
    #[arg(required = true, allow_hyphen_values = true)]
    fractions: Vec<Fraction>,

    /// Reduce each fraction to lowest terms
    #[arg(short, long)]
    reduce: bool,

    /// Flip each fraction (after reducing, if both are given)
    #[arg(short = 'i', long)]
    reciprocal: bool,

    /// Print `{"num":..,"den":..}` JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(&self, mut fraction: Fraction) -> Fraction {
        if self.reduce {
            fraction.reduce();
        }
        if self.reciprocal {
            fraction = fraction.reciprocal();
        }
        fraction
    }
}

fn render(args: &Args, fraction: Fraction) -> anyhow::Result<String> {
    if args.json {
        return Ok(fraction.to_json()?);
    }

    Ok(match fraction.checked_to_f64() {
        Ok(value) => format!("{} = {:.6}", fraction, value),
        Err(e) => {
            warn!("{}: {}", fraction, e);
            format!("{} = undefined", fraction)
        }
    })
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();
    debug!("{:?}", args);

    for input in &args.fractions {
        println!("{}", render(&args, args.apply(*input))?);
    }
    Ok(())
}
