/// # Quirks
/// Points where historical interpreters disagree about what an instruction does.
///
/// ROMs were written against one interpreter's behavior, so the machine has to be told which
/// dialect to speak. The default is the original COSMAC VIP interpreter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quirks {
    /// `8XY6`/`8XYE` shift VY into VX; when false VX is shifted in place
    pub shift_uses_vy: bool,
    /// `BNNN` jumps to `NNN + VX` with X taken from the top nibble of NNN; when false `NNN + V0`
    pub jump_offset_uses_vx: bool,
    /// `FX55`/`FX65` leave I pointing past the last register stored or loaded
    pub memory_ops_advance_i: bool,
    /// An unknown instruction halts the machine; when false it is skipped
    pub strict_unknown_opcode: bool,
}

impl Quirks {
    pub fn cosmac_vip() -> Self {
        Quirks {
            shift_uses_vy: true,
            jump_offset_uses_vx: false,
            memory_ops_advance_i: true,
            strict_unknown_opcode: true,
        }
    }

    /// The HP-48 interpreters most 1990s ROMs were written for
    pub fn chip48() -> Self {
        Quirks {
            shift_uses_vy: false,
            jump_offset_uses_vx: true,
            memory_ops_advance_i: false,
            ..Quirks::cosmac_vip()
        }
    }

    /// Super-Chip 1.1 behavior for the base instruction set
    pub fn super_chip() -> Self {
        Quirks::chip48()
    }

    /// Looks up a preset by name: `vip`, `chip48` or `schip`
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "vip" | "cosmac" | "cosmac-vip" => Some(Quirks::cosmac_vip()),
            "chip48" | "chip-48" => Some(Quirks::chip48()),
            "schip" | "superchip" | "super-chip" => Some(Quirks::super_chip()),
            _ => None,
        }
    }

    /// Skip unknown instructions instead of halting
    pub fn permissive(self) -> Self {
        Quirks {
            strict_unknown_opcode: false,
            ..self
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks::cosmac_vip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cosmac_vip() {
        let quirks = Quirks::default();
        assert!(quirks.shift_uses_vy);
        assert!(!quirks.jump_offset_uses_vx);
        assert!(quirks.memory_ops_advance_i);
        assert!(quirks.strict_unknown_opcode);
    }

    #[test]
    fn test_presets_by_name() {
        assert_eq!(Quirks::preset("VIP"), Some(Quirks::cosmac_vip()));
        assert_eq!(Quirks::preset("chip48"), Some(Quirks::chip48()));
        assert_eq!(Quirks::preset("schip"), Some(Quirks::super_chip()));
        assert_eq!(Quirks::preset("xo-chip"), None);
    }

    #[test]
    fn test_permissive_only_relaxes_unknown_opcodes() {
        let quirks = Quirks::chip48().permissive();
        assert!(!quirks.strict_unknown_opcode);
        assert!(quirks.jump_offset_uses_vx);
    }
}
