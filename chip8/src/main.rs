use std::path::PathBuf;

use clap::Parser;

use emu8_core::{Quirks, CPU_HZ};

mod run;

/// Runs a Chip-8 ROM headless, drawing the screen to the terminal
#[derive(Parser, Debug)]
#[command(name = "chip8", version)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Interpreter dialect: vip, chip48 or schip
    #[arg(long, default_value = "vip", value_parser = parse_quirks)]
    quirks: Quirks,

    /// Skip unknown instructions instead of halting
    #[arg(long)]
    permissive: bool,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Instructions executed per second
    #[arg(long, default_value_t = CPU_HZ)]
    cycles_per_second: u32,

    /// Stop after this many 60Hz frames
    #[arg(long)]
    frames: Option<u64>,

    /// Print a disassembly of the ROM instead of running it
    #[arg(short, long)]
    disassemble: bool,
}

fn parse_quirks(name: &str) -> Result<Quirks, String> {
    Quirks::preset(name).ok_or_else(|| format!("unknown dialect '{}'", name))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let quirks = if args.permissive {
        args.quirks.permissive()
    } else {
        args.quirks
    };

    if args.disassemble {
        return run::disassemble(&args.rom);
    }

    run::run(run::Options {
        rom: args.rom,
        quirks,
        seed: args.seed,
        cycles_per_second: args.cycles_per_second,
        frames: args.frames,
    })
}
