use std::path::PathBuf;
use std::process;

use anvil_reader::anvil::types::models::DEFAULT_MAX_DEPTH;
use anvil_reader::{DecodeOptions, RegionReader, World, setblock_commands};
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "anvil-reader")]
#[command(about = "Inspect Anvil region files and decode their chunk records")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Maximum compound/list nesting depth when decoding records
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, global = true)]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List present chunk slots with their locations and timestamps
    Info {
        /// Region file (r.X.Z.mca)
        region: PathBuf,
    },
    /// Print the decoded tag tree of one chunk slot
    Dump {
        /// Region file (r.X.Z.mca)
        region: PathBuf,
        /// Slot X within the region (0-31)
        #[arg(allow_negative_numbers = true)]
        x: i32,
        /// Slot Z within the region (0-31)
        #[arg(allow_negative_numbers = true)]
        z: i32,
    },
    /// Print relative setblock commands for one chunk section
    Setblock {
        /// Absolute chunk X
        #[arg(allow_negative_numbers = true)]
        x: i32,
        /// Section Y
        #[arg(allow_negative_numbers = true)]
        y: i8,
        /// Absolute chunk Z
        #[arg(allow_negative_numbers = true)]
        z: i32,
        /// Region files to load
        #[arg(required = true)]
        regions: Vec<PathBuf>,
        /// Omit minecraft:air cells
        #[arg(long)]
        skip_air: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = DecodeOptions {
        max_depth: cli.max_depth,
    };

    if let Err(e) = run(cli.command, options) {
        eprintln!("\nERROR: Failed to read region data");
        eprintln!("  {}", e);
        process::exit(1);
    }
}

fn run(command: Command, options: DecodeOptions) -> anvil_reader::Result<()> {
    match command {
        Command::Info { region } => {
            let reader = RegionReader::open(&region)?.with_options(options);
            println!("Reading region file: {}", region.display());
            println!("{}", "=".repeat(60));

            let slots = reader.present_slots()?;
            for slot in &slots {
                let x = i32::from(slot.x());
                let z = i32::from(slot.z());
                let timestamp = reader.timestamp(x, z)?;
                match reader.locate(x, z)? {
                    Some(location) => println!(
                        "  {:>8}  offset={:<10} reserved={:<8} timestamp={}",
                        slot.to_string(),
                        location.offset,
                        location.max_len,
                        timestamp
                    ),
                    None => println!("  {:>8}  empty", slot.to_string()),
                }
            }

            println!("{}", "=".repeat(60));
            println!("Present chunks: {} of 1024", slots.len());
        }
        Command::Dump { region, x, z } => {
            let reader = RegionReader::open(&region)?.with_options(options);
            match reader.read_value(x, z)? {
                Some(value) => println!("{}", value),
                None => println!("Slot ({}, {}) is empty", x, z),
            }
        }
        Command::Setblock {
            x,
            y,
            z,
            regions,
            skip_air,
        } => {
            let mut world = World::with_options(options);
            let loaded = world.load_files(&regions);
            eprintln!(
                "Loaded {} of {} region files, {} chunks",
                loaded,
                regions.len(),
                world.len()
            );

            let blocks = world.blocks(x, y, z)?;
            for line in setblock_commands(&blocks, skip_air) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
