use clap::Parser;
use flexlay::{Direction, Error, LayoutTree, NodeDescription, PrintOptions};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Lays out a JSON node tree and prints the computed boxes.
#[derive(Parser, Debug)]
#[command(name = "flexlay", version, about)]
struct Args {
    /// JSON tree description; reads stdin when omitted
    input: Option<PathBuf>,

    /// Available width; unconstrained when omitted
    #[arg(long)]
    width: Option<f32>,

    /// Available height; unconstrained when omitted
    #[arg(long)]
    height: Option<f32>,

    /// Direction inherited by the root (ltr, rtl or inherit)
    #[arg(long, default_value = "ltr")]
    direction: Direction,

    /// Pixel density for rounding; 0 disables rounding
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Also log the laid-out tree at debug level
    #[arg(long)]
    print_tree: bool,
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();

    let description = NodeDescription::from_json(&read_input(args.input.as_ref())?)?;

    let mut tree = LayoutTree::new();
    let config = tree.default_config();
    tree.config_mut(config)?.set_point_scale_factor(args.scale)?;

    let root = description.build(&mut tree)?;
    tree.calculate_layout(
        root,
        args.width.unwrap_or(f32::NAN),
        args.height.unwrap_or(f32::NAN),
        args.direction,
    )?;

    if args.print_tree {
        log::debug!("\n{}", tree.print_tree(root, PrintOptions::all())?);
    }

    let snapshot = tree.snapshot(root)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
