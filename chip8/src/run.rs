use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use log::{debug, info};

use emu8_core::constants::{MAX_PROGRAM_SIZE, PROGRAM_START};
use emu8_core::{disassemble as disassemble_rom, Chip8, FrameBuffer, Quirks, TIMER_HZ};

pub struct Options {
    pub rom: PathBuf,
    pub quirks: Quirks,
    pub seed: Option<u64>,
    pub cycles_per_second: u32,
    pub frames: Option<u64>,
}

pub fn disassemble(rom: &Path) -> anyhow::Result<()> {
    let bytes = read_rom(rom)?;
    if bytes.len() > MAX_PROGRAM_SIZE {
        bail!(
            "{} is {} bytes but at most {} fit in memory",
            rom.display(),
            bytes.len(),
            MAX_PROGRAM_SIZE
        );
    }
    for line in disassemble_rom(&bytes, PROGRAM_START) {
        println!("{}", line);
    }
    Ok(())
}

pub fn run(options: Options) -> anyhow::Result<()> {
    let mut chip8 = match options.seed {
        Some(seed) => Chip8::with_seed(options.quirks, seed),
        None => Chip8::new(options.quirks),
    };

    // Load ROM
    let bytes = read_rom(&options.rom)?;
    chip8
        .load_program(&bytes)
        .with_context(|| format!("unable to load {}", options.rom.display()))?;
    info!("successfully loaded {}", options.rom.display());

    // Set initial timing
    let frame_time = Duration::from_secs(1) / TIMER_HZ;
    let mut pending_cycles = 0;
    let mut last_frame = Instant::now();
    let mut beeping = false;
    let mut frame: u64 = 0;

    while options.frames.map_or(true, |frames| frame < frames) {
        // Update state
        for _ in 0..cycles_this_frame(options.cycles_per_second, &mut pending_cycles) {
            chip8
                .step()
                .with_context(|| format!("halted at {:03X}", chip8.pc()))?;
        }
        chip8.tick_60hz();

        if chip8.is_beeping() != beeping {
            beeping = chip8.is_beeping();
            debug!("sound {}", if beeping { "on" } else { "off" });
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame_buffer) = chip8.take_frame() {
            print!("\x1B[H\x1B[2J{}", render(frame_buffer));
        }

        // Handle timing
        let elapsed = last_frame.elapsed();
        if frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
        last_frame = Instant::now();
        frame += 1;
    }
    Ok(())
}

/// Splits `cycles_per_second` over 60Hz frames, carrying the remainder so that every 60 frames
/// add up to exactly `cycles_per_second`.
fn cycles_this_frame(cycles_per_second: u32, pending: &mut u32) -> u32 {
    let total = u64::from(*pending) + u64::from(cycles_per_second);
    *pending = (total % u64::from(TIMER_HZ)) as u32;
    (total / u64::from(TIMER_HZ)) as u32
}

fn read_rom(rom: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(rom).with_context(|| format!("unable to open {}", rom.display()))
}

/// Formats a FrameBuffer as text, two terminal rows per pixel row so pixels come out square-ish.
///
/// Each character cell covers a pixel from an upper and a lower row:
/// - both on: `█`
/// - upper only: `▀`
/// - lower only: `▄`
fn render(frame: &FrameBuffer) -> String {
    let rows: Vec<&[bool]> = frame.rows().collect();
    let mut out = String::with_capacity(frame.width() * frame.height());
    for pair in rows.chunks(2) {
        let upper = pair[0];
        let lower = pair.get(1).copied();
        for (x, top) in upper.iter().enumerate() {
            let bottom = lower.map_or(false, |row| row[x]);
            out.push(match (*top, bottom) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
    }
    out
}
