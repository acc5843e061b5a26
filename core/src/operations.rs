use log::warn;
use rand::Rng;

use crate::alu::{self, AluOp};
use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG_REGISTER, FONT_SPRITE_HEIGHT, FONT_START,
};
use crate::error::Fault;
use crate::instruction::Instruction;
use crate::state::{Keypad, State};

/// Executes a single instruction against `state`.
///
/// Returns the address of the next instruction; the caller stores it in the pc. On a fault
/// nothing in `state` has been modified.
pub fn execute<R: Rng + ?Sized>(
    instruction: Instruction,
    state: &mut State,
    keys: &Keypad,
    rng: &mut R,
) -> Result<u16, Fault> {
    // the fall-through address; handlers return it, skip past it, or replace it
    let next = state.pc + 0x2;
    match instruction {
        Instruction::Clear => Ok(clr(state, next)),
        Instruction::Return => rts(state),
        Instruction::Jump(addr) => Ok(addr),
        Instruction::Call(addr) => call(state, addr),
        Instruction::SkipEqImm(x, kk) => Ok(skip_if(next, reg(state, x) == kk)),
        Instruction::SkipNeImm(x, kk) => Ok(skip_if(next, reg(state, x) != kk)),
        Instruction::SkipEqReg(x, y) => Ok(skip_if(next, reg(state, x) == reg(state, y))),
        Instruction::SkipNeReg(x, y) => Ok(skip_if(next, reg(state, x) != reg(state, y))),
        Instruction::LoadImm(x, kk) => {
            state.v[x as usize] = kk;
            Ok(next)
        }
        Instruction::AddImm(x, kk) => {
            state.v[x as usize] = reg(state, x).wrapping_add(kk);
            Ok(next)
        }
        Instruction::Alu(op, x, y) => Ok(arithmetic(state, op, x, y, next)),
        Instruction::LoadIndex(addr) => {
            state.i = addr;
            Ok(next)
        }
        Instruction::JumpOffset(addr) => Ok(addr + u16::from(state.v[0x0])),
        Instruction::Random(x, kk) => {
            state.v[x as usize] = alu::random_and(rng.gen(), kk).value;
            Ok(next)
        }
        Instruction::Draw(x, y, n) => draw(state, x, y, n, next),
        Instruction::SkipKeyPressed(x) => Ok(skip_if(next, keys[key_index(state, x)])),
        Instruction::SkipKeyNotPressed(x) => Ok(skip_if(next, !keys[key_index(state, x)])),
        Instruction::GetDelay(x) => {
            state.v[x as usize] = state.delay_timer;
            Ok(next)
        }
        Instruction::WaitKey(x) => Ok(wait_key(state, x, keys, next)),
        Instruction::SetDelay(x) => {
            state.delay_timer = reg(state, x);
            Ok(next)
        }
        Instruction::SetSound(x) => {
            state.sound_timer = reg(state, x);
            Ok(next)
        }
        Instruction::AddIndex(x) => {
            state.i = state.i.wrapping_add(u16::from(reg(state, x)));
            Ok(next)
        }
        Instruction::FontSprite(x) => {
            let digit = u16::from(reg(state, x) & 0xF);
            state.i = FONT_START + digit * FONT_SPRITE_HEIGHT;
            Ok(next)
        }
        Instruction::Bcd(x) => bcd(state, x, next),
        Instruction::Store(x) => stor(state, x, next),
        Instruction::Read(x) => read(state, x, next),
        Instruction::Unsupported(op) => {
            warn!("ignoring unsupported opcode {:04X} at {:04X}", op, state.pc);
            Ok(next)
        }
    }
}

fn reg(state: &State, r: u8) -> u8 {
    state.v[r as usize]
}

/// Keys are addressed by the low nibble of Vx
fn key_index(state: &State, x: u8) -> usize {
    usize::from(reg(state, x) & 0xF)
}

/// if condition then pc += 2
fn skip_if(next: u16, condition: bool) -> u16 {
    if condition {
        next + 0x2
    } else {
        next
    }
}

/// clear
fn clr(state: &mut State, next: u16) -> u16 {
    state.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    next
}

/// PC = STACK.pop() + 2
fn rts(state: &mut State) -> Result<u16, Fault> {
    let caller = state.pop()?;
    Ok(caller + 0x2)
}

/// STACK.push(PC); PC = addr
fn call(state: &mut State, addr: u16) -> Result<u16, Fault> {
    state.push(state.pc)?;
    Ok(addr)
}

/// VF = flag when the operation defines one; Vx = Vx op Vy
///
/// The flag is written first, so when VF is also the destination it ends up holding the result.
fn arithmetic(state: &mut State, op: AluOp, x: u8, y: u8, next: u16) -> u16 {
    let out = op.apply(reg(state, x), reg(state, y));
    if let Some(flag) = out.flag {
        state.v[FLAG_REGISTER] = flag;
    }
    state.v[x as usize] = out.value;
    next
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n onto the FrameBuffer.
///
/// The origin wraps around the display; rows and columns past the right or bottom edge are
/// clipped. VF is 1 if any lit pixel was erased, otherwise 0.
fn draw(state: &mut State, x: u8, y: u8, n: u8, next: u16) -> Result<u16, Fault> {
    let rows = n as usize;
    let mut sprite = [0u8; 0x10];
    sprite[..rows].copy_from_slice(state.slice(state.i as usize, rows)?);

    let origin_x = reg(state, x) as usize % DISPLAY_WIDTH;
    let origin_y = reg(state, y) as usize % DISPLAY_HEIGHT;

    let mut collision = 0x0;
    for (row, byte) in sprite[..rows].iter().enumerate() {
        let py = origin_y + row;
        if py >= DISPLAY_HEIGHT {
            break;
        }
        for bit in 0..8 {
            let px = origin_x + bit;
            if px >= DISPLAY_WIDTH {
                break;
            }
            let pixel = (byte >> (7 - bit)) & 0x1;
            collision |= pixel & state.frame_buffer[py][px];
            state.frame_buffer[py][px] ^= pixel;
        }
    }

    state.v[FLAG_REGISTER] = collision;
    state.draw_flag = true;
    Ok(next)
}

/// await keypress for Vx
/// Holds the pc until some key is down, then stores the lowest pressed key in Vx.
fn wait_key(state: &mut State, x: u8, keys: &Keypad, next: u16) -> u16 {
    match keys.iter().position(|&pressed| pressed) {
        Some(key) => {
            state.v[x as usize] = key as u8;
            next
        }
        None => state.pc,
    }
}

/// mem[I..I+3] = bcd(Vx)
fn bcd(state: &mut State, x: u8, next: u16) -> Result<u16, Fault> {
    let value = reg(state, x);
    let digits = [value / 100, value / 10 % 10, value % 10];
    state
        .slice_mut(state.i as usize, digits.len())?
        .copy_from_slice(&digits);
    Ok(next)
}

/// mem[I..=I+x] = V0..=Vx
fn stor(state: &mut State, x: u8, next: u16) -> Result<u16, Fault> {
    let len = x as usize + 1;
    let v = state.v;
    state
        .slice_mut(state.i as usize, len)?
        .copy_from_slice(&v[..len]);
    Ok(next)
}

/// V0..=Vx = mem[I..=I+x]
fn read(state: &mut State, x: u8, next: u16) -> Result<u16, Fault> {
    let len = x as usize + 1;
    let mut loaded = [0u8; 16];
    loaded[..len].copy_from_slice(state.slice(state.i as usize, len)?);
    state.v[..len].copy_from_slice(&loaded[..len]);
    Ok(next)
}
