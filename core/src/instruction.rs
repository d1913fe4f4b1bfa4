use std::fmt;

use crate::opcode::Opcode;

/// A decoded Chip-8 instruction.
///
/// `x` and `y` are register indices, `kk` an 8-bit literal, `n` a 4-bit literal and `addr` a
/// 12-bit address. Words that don't name an instruction decode to `Unknown` so the executor can
/// decide whether that is fatal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `0nnn` call a machine code routine; ignored
    Sys { addr: u16 },
    /// `00E0` clear the screen
    Cls,
    /// `00EE` return from a subroutine
    Ret,
    /// `1nnn`
    Jump { addr: u16 },
    /// `2nnn`
    Call { addr: u16 },
    /// `3xkk` skip if Vx == kk
    SkipEqByte { x: u8, kk: u8 },
    /// `4xkk` skip if Vx != kk
    SkipNeByte { x: u8, kk: u8 },
    /// `5xy0` skip if Vx == Vy
    SkipEqReg { x: u8, y: u8 },
    /// `6xkk`
    LoadByte { x: u8, kk: u8 },
    /// `7xkk`
    AddByte { x: u8, kk: u8 },
    /// `8xy0`
    Move { x: u8, y: u8 },
    /// `8xy1`
    Or { x: u8, y: u8 },
    /// `8xy2`
    And { x: u8, y: u8 },
    /// `8xy3`
    Xor { x: u8, y: u8 },
    /// `8xy4`
    AddReg { x: u8, y: u8 },
    /// `8xy5`
    Sub { x: u8, y: u8 },
    /// `8xy6`
    ShiftRight { x: u8, y: u8 },
    /// `8xy7`
    SubN { x: u8, y: u8 },
    /// `8xyE`
    ShiftLeft { x: u8, y: u8 },
    /// `9xy0` skip if Vx != Vy
    SkipNeReg { x: u8, y: u8 },
    /// `Annn`
    LoadIndex { addr: u16 },
    /// `Bnnn`
    JumpOffset { addr: u16 },
    /// `Cxkk`
    Random { x: u8, kk: u8 },
    /// `Dxyn`
    Draw { x: u8, y: u8, n: u8 },
    /// `Ex9E`
    SkipKeyPressed { x: u8 },
    /// `ExA1`
    SkipKeyReleased { x: u8 },
    /// `Fx07`
    LoadDelay { x: u8 },
    /// `Fx0A`
    WaitKey { x: u8 },
    /// `Fx15`
    SetDelay { x: u8 },
    /// `Fx18`
    SetSound { x: u8 },
    /// `Fx1E`
    AddIndex { x: u8 },
    /// `Fx29`
    LoadFont { x: u8 },
    /// `Fx33`
    Bcd { x: u8 },
    /// `Fx55`
    Store { x: u8 },
    /// `Fx65`
    Read { x: u8 },
    Unknown(u16),
}

/// Selects the correct Instruction for a given word
pub fn decode(word: u16) -> Instruction {
    use Instruction::*;

    let op = Opcode(word);
    let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
    match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => Cls,
        (0x0, 0x0, 0xE, 0xE) => Ret,
        (0x0, ..) => Sys { addr },
        (0x1, ..) => Jump { addr },
        (0x2, ..) => Call { addr },
        (0x3, ..) => SkipEqByte { x, kk },
        (0x4, ..) => SkipNeByte { x, kk },
        (0x5, .., 0x0) => SkipEqReg { x, y },
        (0x6, ..) => LoadByte { x, kk },
        (0x7, ..) => AddByte { x, kk },
        (0x8, .., 0x0) => Move { x, y },
        (0x8, .., 0x1) => Or { x, y },
        (0x8, .., 0x2) => And { x, y },
        (0x8, .., 0x3) => Xor { x, y },
        (0x8, .., 0x4) => AddReg { x, y },
        (0x8, .., 0x5) => Sub { x, y },
        (0x8, .., 0x6) => ShiftRight { x, y },
        (0x8, .., 0x7) => SubN { x, y },
        (0x8, .., 0xE) => ShiftLeft { x, y },
        (0x9, .., 0x0) => SkipNeReg { x, y },
        (0xA, ..) => LoadIndex { addr },
        (0xB, ..) => JumpOffset { addr },
        (0xC, ..) => Random { x, kk },
        (0xD, ..) => Draw { x, y, n },
        (0xE, _, 0x9, 0xE) => SkipKeyPressed { x },
        (0xE, _, 0xA, 0x1) => SkipKeyReleased { x },
        (0xF, _, 0x0, 0x7) => LoadDelay { x },
        (0xF, _, 0x0, 0xA) => WaitKey { x },
        (0xF, _, 0x1, 0x5) => SetDelay { x },
        (0xF, _, 0x1, 0x8) => SetSound { x },
        (0xF, _, 0x1, 0xE) => AddIndex { x },
        (0xF, _, 0x2, 0x9) => LoadFont { x },
        (0xF, _, 0x3, 0x3) => Bcd { x },
        (0xF, _, 0x5, 0x5) => Store { x },
        (0xF, _, 0x6, 0x5) => Read { x },
        _ => Unknown(word),
    }
}

impl fmt::Display for Instruction {
    /// Conventional assembler mnemonics, e.g. `LD V1, 0x0A` or `DRW V0, V1, 5`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys { addr } => write!(f, "SYS 0x{:03X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump { addr } => write!(f, "JP 0x{:03X}", addr),
            Call { addr } => write!(f, "CALL 0x{:03X}", addr),
            SkipEqByte { x, kk } => write!(f, "SE V{:X}, 0x{:02X}", x, kk),
            SkipNeByte { x, kk } => write!(f, "SNE V{:X}, 0x{:02X}", x, kk),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte { x, kk } => write!(f, "LD V{:X}, 0x{:02X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, 0x{:02X}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex { addr } => write!(f, "LD I, 0x{:03X}", addr),
            JumpOffset { addr } => write!(f, "JP V0, 0x{:03X}", addr),
            Random { x, kk } => write!(f, "RND V{:X}, 0x{:02X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyReleased { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Read { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(word) => write!(f, "DW 0x{:04X}", word),
        }
    }
}

/// One line of a disassembly listing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Disassembled {
    pub address: u16,
    pub opcode: Opcode,
    pub instruction: Instruction,
}

impl fmt::Display for Disassembled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:03X}  {:04X}  {}",
            self.address, self.opcode, self.instruction
        )
    }
}

/// Decodes `bytes` two at a time as if they were loaded at `origin`.
///
/// Data mixed into a ROM is decoded like everything else; a trailing odd byte is padded with 0.
pub fn disassemble(bytes: &[u8], origin: u16) -> Vec<Disassembled> {
    let mut address = origin;
    bytes
        .chunks(2)
        .map(|pair| {
            let opcode = Opcode::from_bytes(pair[0], pair.get(1).copied().unwrap_or(0));
            let here = address;
            address = address.wrapping_add(2);
            Disassembled {
                address: here,
                opcode,
                instruction: decode(opcode.word()),
            }
        })
        .collect()
}

#[cfg(test)]
mod test_instruction {
    use super::Instruction::*;
    use super::*;
    use proptest::prelude::*;

    /// The top nibble each instruction is encoded under
    fn family(instruction: Instruction) -> u8 {
        match instruction {
            Sys { .. } | Cls | Ret => 0x0,
            Jump { .. } => 0x1,
            Call { .. } => 0x2,
            SkipEqByte { .. } => 0x3,
            SkipNeByte { .. } => 0x4,
            SkipEqReg { .. } => 0x5,
            LoadByte { .. } => 0x6,
            AddByte { .. } => 0x7,
            Move { .. }
            | Or { .. }
            | And { .. }
            | Xor { .. }
            | AddReg { .. }
            | Sub { .. }
            | ShiftRight { .. }
            | SubN { .. }
            | ShiftLeft { .. } => 0x8,
            SkipNeReg { .. } => 0x9,
            LoadIndex { .. } => 0xA,
            JumpOffset { .. } => 0xB,
            Random { .. } => 0xC,
            Draw { .. } => 0xD,
            SkipKeyPressed { .. } | SkipKeyReleased { .. } => 0xE,
            LoadDelay { .. }
            | WaitKey { .. }
            | SetDelay { .. }
            | SetSound { .. }
            | AddIndex { .. }
            | LoadFont { .. }
            | Bcd { .. }
            | Store { .. }
            | Read { .. } => 0xF,
            Unknown(word) => (word >> 12) as u8,
        }
    }

    #[test]
    fn test_0nnn_sys() {
        assert_eq!(decode(0x0123), Sys { addr: 0x123 });
    }

    #[test]
    fn test_00e0_cls() {
        assert_eq!(decode(0x00E0), Cls);
    }

    #[test]
    fn test_00ee_ret() {
        assert_eq!(decode(0x00EE), Ret);
    }

    #[test]
    fn test_address_families() {
        assert_eq!(decode(0x1ABC), Jump { addr: 0xABC });
        assert_eq!(decode(0x2ABC), Call { addr: 0xABC });
        assert_eq!(decode(0xAABC), LoadIndex { addr: 0xABC });
        assert_eq!(decode(0xBABC), JumpOffset { addr: 0xABC });
    }

    #[test]
    fn test_byte_families() {
        assert_eq!(decode(0x3122), SkipEqByte { x: 0x1, kk: 0x22 });
        assert_eq!(decode(0x4122), SkipNeByte { x: 0x1, kk: 0x22 });
        assert_eq!(decode(0x6122), LoadByte { x: 0x1, kk: 0x22 });
        assert_eq!(decode(0x7122), AddByte { x: 0x1, kk: 0x22 });
        assert_eq!(decode(0xC1F0), Random { x: 0x1, kk: 0xF0 });
    }

    #[test]
    fn test_5xy0_and_9xy0_need_zero_low_nibble() {
        assert_eq!(decode(0x5120), SkipEqReg { x: 0x1, y: 0x2 });
        assert_eq!(decode(0x9120), SkipNeReg { x: 0x1, y: 0x2 });
        assert_eq!(decode(0x5121), Unknown(0x5121));
        assert_eq!(decode(0x912F), Unknown(0x912F));
    }

    #[test]
    fn test_8xyn_arithmetic() {
        let (x, y) = (0x1, 0x2);
        assert_eq!(decode(0x8120), Move { x, y });
        assert_eq!(decode(0x8121), Or { x, y });
        assert_eq!(decode(0x8122), And { x, y });
        assert_eq!(decode(0x8123), Xor { x, y });
        assert_eq!(decode(0x8124), AddReg { x, y });
        assert_eq!(decode(0x8125), Sub { x, y });
        assert_eq!(decode(0x8126), ShiftRight { x, y });
        assert_eq!(decode(0x8127), SubN { x, y });
        assert_eq!(decode(0x812E), ShiftLeft { x, y });
        assert_eq!(decode(0x8128), Unknown(0x8128));
    }

    #[test]
    fn test_dxyn_drw() {
        assert_eq!(decode(0xD125), Draw { x: 0x1, y: 0x2, n: 0x5 });
    }

    #[test]
    fn test_ex_keys() {
        assert_eq!(decode(0xE19E), SkipKeyPressed { x: 0x1 });
        assert_eq!(decode(0xE1A1), SkipKeyReleased { x: 0x1 });
        assert_eq!(decode(0xE1A2), Unknown(0xE1A2));
    }

    #[test]
    fn test_fx_misc() {
        assert_eq!(decode(0xF107), LoadDelay { x: 0x1 });
        assert_eq!(decode(0xF10A), WaitKey { x: 0x1 });
        assert_eq!(decode(0xF115), SetDelay { x: 0x1 });
        assert_eq!(decode(0xF118), SetSound { x: 0x1 });
        assert_eq!(decode(0xF11E), AddIndex { x: 0x1 });
        assert_eq!(decode(0xF129), LoadFont { x: 0x1 });
        assert_eq!(decode(0xF133), Bcd { x: 0x1 });
        assert_eq!(decode(0xF455), Store { x: 0x4 });
        assert_eq!(decode(0xF465), Read { x: 0x4 });
        assert_eq!(decode(0xF1FF), Unknown(0xF1FF));
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(decode(0x00E0).to_string(), "CLS");
        assert_eq!(decode(0x1208).to_string(), "JP 0x208");
        assert_eq!(decode(0x610A).to_string(), "LD V1, 0x0A");
        assert_eq!(decode(0x8AB4).to_string(), "ADD VA, VB");
        assert_eq!(decode(0xD015).to_string(), "DRW V0, V1, 5");
        assert_eq!(decode(0xF265).to_string(), "LD V2, [I]");
        assert_eq!(decode(0xFFFF).to_string(), "DW 0xFFFF");
    }

    #[test]
    fn test_disassemble() {
        let listing = disassemble(&[0x00, 0xE0, 0x60, 0x05, 0x12], 0x200);
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[1].address, 0x202);
        assert_eq!(listing[1].instruction, LoadByte { x: 0x0, kk: 0x05 });
        assert_eq!(listing[2].opcode, Opcode(0x1200));
        assert_eq!(listing[0].to_string(), "0x200  00E0  CLS");
    }

    #[test]
    fn test_disassemble_wraps_addresses_past_the_address_space() {
        let listing = disassemble(&vec![0u8; 0x10002], 0x200);
        assert_eq!(listing.len(), 0x8001);
        assert_eq!(listing[0x7EFF].address, 0xFFFE);
        assert_eq!(listing[0x7F00].address, 0x0000);
        assert_eq!(listing[0x8000].address, 0x0200);
    }

    #[test]
    fn test_every_word_matches_its_family() {
        for word in 0..=u16::MAX {
            assert_eq!(family(decode(word)), (word >> 12) as u8, "{:04X}", word);
        }
    }

    proptest! {
        #[test]
        fn test_decode_is_pure(word in any::<u16>()) {
            prop_assert_eq!(decode(word), decode(word));
        }

        #[test]
        fn test_unknown_keeps_its_word(word in any::<u16>()) {
            if let Unknown(raw) = decode(word) {
                prop_assert_eq!(raw, word);
            }
        }
    }
}
