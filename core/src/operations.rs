use log::{debug, warn};
use rand::Rng;

use crate::constants::{FONT_GLYPH_SIZE, FONT_START};
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::quirks::Quirks;
use crate::state::{KeyWait, State};

/// Executes a single decoded instruction against `state`.
///
/// The program counter must already point past the instruction; jumps overwrite it and skips
/// bump it by another 2. Every operand is read before anything is written, and an instruction
/// that fails returns before touching the state.
pub fn execute<R: Rng + ?Sized>(
    instruction: Instruction,
    state: &mut State,
    quirks: &Quirks,
    rng: &mut R,
) -> Result<()> {
    use Instruction::*;

    match instruction {
        Sys { .. } => Ok(()),
        Cls => clr(state),
        Ret => rts(state),
        Jump { addr } => jump(state, addr),
        Call { addr } => call(state, addr),
        SkipEqByte { x, kk } => ske(state, x, kk),
        SkipNeByte { x, kk } => skne(state, x, kk),
        SkipEqReg { x, y } => skre(state, x, y),
        SkipNeReg { x, y } => skrne(state, x, y),
        LoadByte { x, kk } => load(state, x, kk),
        AddByte { x, kk } => add(state, x, kk),
        Move { x, y } => mv(state, x, y),
        Or { x, y } => or(state, x, y),
        And { x, y } => and(state, x, y),
        Xor { x, y } => xor(state, x, y),
        AddReg { x, y } => addr(state, x, y),
        Sub { x, y } => sub(state, x, x, y),
        SubN { x, y } => sub(state, x, y, x),
        ShiftRight { x, y } => shr(state, quirks, x, y),
        ShiftLeft { x, y } => shl(state, quirks, x, y),
        LoadIndex { addr } => loadi(state, addr),
        JumpOffset { addr } => jumpi(state, quirks, addr),
        Random { x, kk } => load(state, x, rng.gen::<u8>() & kk),
        Draw { x, y, n } => draw(state, x, y, n),
        SkipKeyPressed { x } => skpr(state, x),
        SkipKeyReleased { x } => skup(state, x),
        LoadDelay { x } => moved(state, x),
        WaitKey { x } => keyd(state, x),
        SetDelay { x } => loads(state, x),
        SetSound { x } => ld(state, x),
        AddIndex { x } => addi(state, x),
        LoadFont { x } => ldspr(state, x),
        Bcd { x } => bcd(state, x),
        Store { x } => stor(state, quirks, x),
        Read { x } => read(state, quirks, x),
        Unknown(word) => unknown(state, quirks, word),
    }
}

/// clear
fn clr(state: &mut State) -> Result<()> {
    state.frame_buffer.clear();
    state.draw_flag = true;
    Ok(())
}

/// PC = STACK.pop()
fn rts(state: &mut State) -> Result<()> {
    state.registers.pc = state.stack.pop()?;
    Ok(())
}

/// PC = addr
fn jump(state: &mut State, addr: u16) -> Result<()> {
    state.registers.pc = addr;
    Ok(())
}

/// STACK.push(PC); PC = addr
fn call(state: &mut State, addr: u16) -> Result<()> {
    state.stack.push(state.registers.pc)?;
    state.registers.pc = addr;
    Ok(())
}

/// if Vx == kk then pc += 2
fn ske(state: &mut State, x: u8, kk: u8) -> Result<()> {
    let condition = state.v(x) == kk;
    skip_if(state, condition)
}

/// if Vx != kk then pc += 2
fn skne(state: &mut State, x: u8, kk: u8) -> Result<()> {
    let condition = state.v(x) != kk;
    skip_if(state, condition)
}

/// if Vx == Vy then pc += 2
fn skre(state: &mut State, x: u8, y: u8) -> Result<()> {
    let condition = state.v(x) == state.v(y);
    skip_if(state, condition)
}

/// if Vx != Vy then pc += 2
fn skrne(state: &mut State, x: u8, y: u8) -> Result<()> {
    let condition = state.v(x) != state.v(y);
    skip_if(state, condition)
}

/// if Vx.pressed then pc += 2
fn skpr(state: &mut State, x: u8) -> Result<()> {
    let condition = state.keypad.is_pressed(state.v(x));
    skip_if(state, condition)
}

/// if !Vx.pressed then pc += 2
fn skup(state: &mut State, x: u8) -> Result<()> {
    let condition = !state.keypad.is_pressed(state.v(x));
    skip_if(state, condition)
}

fn skip_if(state: &mut State, condition: bool) -> Result<()> {
    if condition {
        state.registers.pc += 0x2;
    }
    Ok(())
}

/// Vx = kk
fn load(state: &mut State, x: u8, kk: u8) -> Result<()> {
    state.set_v(x, kk);
    Ok(())
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
fn add(state: &mut State, x: u8, kk: u8) -> Result<()> {
    state.set_v(x, state.v(x).wrapping_add(kk));
    Ok(())
}

/// Vx = Vy
fn mv(state: &mut State, x: u8, y: u8) -> Result<()> {
    let vy = state.v(y);
    state.set_v(x, vy);
    Ok(())
}

/// Vx |= Vy
fn or(state: &mut State, x: u8, y: u8) -> Result<()> {
    let res = state.v(x) | state.v(y);
    state.set_v(x, res);
    Ok(())
}

/// Vx &= Vy
fn and(state: &mut State, x: u8, y: u8) -> Result<()> {
    let res = state.v(x) & state.v(y);
    state.set_v(x, res);
    Ok(())
}

/// Vx ^= Vy
fn xor(state: &mut State, x: u8, y: u8) -> Result<()> {
    let res = state.v(x) ^ state.v(y);
    state.set_v(x, res);
    Ok(())
}

/// Vx += Vy; VF = overflow
fn addr(state: &mut State, x: u8, y: u8) -> Result<()> {
    let (res, over) = state.v(x).overflowing_add(state.v(y));
    state.set_v(x, res);
    state.registers.set_flag(over);
    Ok(())
}

/// Vx = Va - Vb; VF = !underflow
fn sub(state: &mut State, x: u8, a: u8, b: u8) -> Result<()> {
    let (res, under) = state.v(a).overflowing_sub(state.v(b));
    state.set_v(x, res);
    state.registers.set_flag(!under);
    Ok(())
}

/// Vx = src >> 1; VF = the bit shifted out
fn shr(state: &mut State, quirks: &Quirks, x: u8, y: u8) -> Result<()> {
    let src = state.v(shift_source(quirks, x, y));
    state.set_v(x, src >> 1);
    state.registers.set_flag(src & 0x1 == 0x1);
    Ok(())
}

/// Vx = src << 1; VF = the bit shifted out
fn shl(state: &mut State, quirks: &Quirks, x: u8, y: u8) -> Result<()> {
    let src = state.v(shift_source(quirks, x, y));
    state.set_v(x, src << 1);
    state.registers.set_flag(src & 0x80 == 0x80);
    Ok(())
}

fn shift_source(quirks: &Quirks, x: u8, y: u8) -> u8 {
    if quirks.shift_uses_vy {
        y
    } else {
        x
    }
}

/// I = addr
fn loadi(state: &mut State, addr: u16) -> Result<()> {
    state.registers.i = addr;
    Ok(())
}

/// PC = V0 + addr, or Vx + addr where x is the top nibble of addr
fn jumpi(state: &mut State, quirks: &Quirks, addr: u16) -> Result<()> {
    let register = if quirks.jump_offset_uses_vx {
        (addr >> 8) as u8
    } else {
        0x0
    };
    state.registers.pc = addr + u16::from(state.v(register));
    Ok(())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
fn draw(state: &mut State, x: u8, y: u8, n: u8) -> Result<()> {
    let (x, y) = (usize::from(state.v(x)), usize::from(state.v(y)));
    let sprite = state
        .memory
        .slice(usize::from(state.registers.i), usize::from(n))?;
    let collision = state.frame_buffer.draw_sprite(x, y, sprite);
    state.registers.set_flag(collision);
    state.draw_flag = true;
    Ok(())
}

/// Vx = DT
fn moved(state: &mut State, x: u8) -> Result<()> {
    let delay = state.timers.delay;
    state.set_v(x, delay);
    Ok(())
}

/// DT = Vx
fn loads(state: &mut State, x: u8) -> Result<()> {
    state.timers.delay = state.v(x);
    Ok(())
}

/// ST = Vx
fn ld(state: &mut State, x: u8) -> Result<()> {
    state.timers.sound = state.v(x);
    Ok(())
}

/// await keypress for Vx
/// Rewinds the pc so this instruction stays current until a key is pressed
fn keyd(state: &mut State, x: u8) -> Result<()> {
    debug!("waiting for a key press to store in V{:X}", x);
    state.awaiting_key = Some(KeyWait {
        register: x,
        seen: state.keypad,
    });
    state.registers.pc -= 0x2;
    Ok(())
}

/// Ends a pending `Fx0A` if a key went down since the last step.
/// Returns whether the machine is still waiting.
pub fn resume_key_wait(state: &mut State) -> bool {
    let wait = match state.awaiting_key {
        Some(wait) => wait,
        None => return false,
    };
    match state.keypad.newly_pressed(&wait.seen) {
        Some(key) => {
            debug!("key {:X} pressed, stored in V{:X}", key, wait.register);
            state.set_v(wait.register, key);
            state.awaiting_key = None;
            state.registers.pc += 0x2;
            false
        }
        None => {
            state.awaiting_key = Some(KeyWait {
                seen: state.keypad,
                ..wait
            });
            true
        }
    }
}

/// I += Vx
fn addi(state: &mut State, x: u8) -> Result<()> {
    state.registers.i = state.registers.i.wrapping_add(u16::from(state.v(x)));
    Ok(())
}

/// I = FONT_START + Vx * 5
/// Set I to the memory address of the font glyph for the low nibble of Vx
fn ldspr(state: &mut State, x: u8) -> Result<()> {
    state.registers.i = FONT_START + u16::from(state.v(x) & 0xF) * FONT_GLYPH_SIZE;
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
fn bcd(state: &mut State, x: u8) -> Result<()> {
    let vx = state.v(x);
    let bcd = [vx / 100 % 10, vx / 10 % 10, vx % 10];
    state
        .memory
        .slice_mut(usize::from(state.registers.i), bcd.len())?
        .copy_from_slice(&bcd);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
fn stor(state: &mut State, quirks: &Quirks, x: u8) -> Result<()> {
    let count = usize::from(x) + 1;
    state
        .memory
        .slice_mut(usize::from(state.registers.i), count)?
        .copy_from_slice(&state.registers.v[..count]);
    advance_index(state, quirks, count);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
fn read(state: &mut State, quirks: &Quirks, x: u8) -> Result<()> {
    let count = usize::from(x) + 1;
    let bytes = state
        .memory
        .slice(usize::from(state.registers.i), count)?;
    state.registers.v[..count].copy_from_slice(bytes);
    advance_index(state, quirks, count);
    Ok(())
}

fn advance_index(state: &mut State, quirks: &Quirks, count: usize) {
    if quirks.memory_ops_advance_i {
        state.registers.i = state.registers.i.wrapping_add(count as u16);
    }
}

fn unknown(state: &mut State, quirks: &Quirks, word: u16) -> Result<()> {
    let address = state.registers.pc - 0x2;
    if quirks.strict_unknown_opcode {
        return Err(Chip8Error::UnknownInstruction { word, address });
    }
    warn!("skipping unknown instruction {:04X} at {:03X}", word, address);
    Ok(())
}
