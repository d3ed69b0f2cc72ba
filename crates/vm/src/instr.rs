//! Defines the [`Instruction`] type, responsible for representing a single machine word
//! holding an opcode and its immediate operand.
//!
//! # Layout
//!
//! ```text
//!  31                                8 7          0
//! +-----------------------------------+------------+
//! |              operand              |   opcode   |
//! +-----------------------------------+------------+
//! ```
//!
//! The operand is an unsigned 24-bit value. It is never sign extended.

use std::fmt;

/// The number of bits of an instruction word used by the opcode field.
pub const OPCODE_BITS: u32 = 8;

/// The mask selecting the opcode field of an instruction word.
pub const OPCODE_MASK: u32 = 0xFF;

/// The largest value the operand field of an instruction can hold.
pub const OPERAND_MAX: u32 = 0x00FF_FFFF;

/// The set of operations an instruction can name.
///
/// Only a subset of these is implemented by the dispatcher. The remaining names are reserved:
/// executing one of them faults exactly like an unknown opcode would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Stops the machine.
    Halt = 0,
    /// Pushes the operand onto the stack.
    Push = 1,
    /// Pops the top of the stack and discards it.
    Pop = 2,
    /// Pops `b` then `a` and pushes `a + b`.
    Add = 3,
    /// Pops `b` then `a` and pushes `a - b`.
    Sub = 4,
    /// Pops `b` then `a` and pushes `a * b`.
    Mul = 5,
    /// Pops `b` then `a` and pushes `a / b`.
    Div = 6,
    /// Reserved.
    Load = 7,
    /// Reserved.
    Store = 8,
    /// Reserved.
    Mov = 9,
    /// Reserved.
    Jmp = 10,
    /// Reserved.
    Jz = 11,
    /// Reserved.
    Jnz = 12,
    /// Reserved.
    Call = 13,
    /// Reserved.
    Ret = 14,
    /// Pops the top of the stack and writes it to the output sink.
    Print = 15,
    /// Reserved.
    Read = 16,
    /// Does nothing.
    Nop = 17,
}

impl OpCode {
    /// Returns the [`OpCode`] named by the provided opcode byte, if any.
    pub const fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => Self::Halt,
            1 => Self::Push,
            2 => Self::Pop,
            3 => Self::Add,
            4 => Self::Sub,
            5 => Self::Mul,
            6 => Self::Div,
            7 => Self::Load,
            8 => Self::Store,
            9 => Self::Mov,
            10 => Self::Jmp,
            11 => Self::Jz,
            12 => Self::Jnz,
            13 => Self::Call,
            14 => Self::Ret,
            15 => Self::Print,
            16 => Self::Read,
            17 => Self::Nop,
            _ => return None,
        })
    }

    /// Returns the assembly mnemonic of the opcode.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Halt => "HALT",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Mov => "MOV",
            Self::Jmp => "JMP",
            Self::Jz => "JZ",
            Self::Jnz => "JNZ",
            Self::Call => "CALL",
            Self::Ret => "RET",
            Self::Print => "PRINT",
            Self::Read => "READ",
            Self::Nop => "NOP",
        }
    }

    /// Whether the instruction makes use of its operand field.
    #[inline(always)]
    pub const fn takes_operand(self) -> bool {
        matches!(self, Self::Push)
    }
}

impl fmt::Display for OpCode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A single encoded instruction word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Instruction(pub u32);

impl Instruction {
    /// Packs an opcode byte and an operand into an instruction word.
    ///
    /// # Truncation
    ///
    /// The operand field is only 24 bits wide. Any bit of `operand` above [`OPERAND_MAX`] is
    /// masked away, so this conversion is lossy for operands outside of `0..=OPERAND_MAX`.
    #[inline(always)]
    pub const fn encode(opcode: u8, operand: u32) -> Self {
        Self(opcode as u32 | ((operand & OPERAND_MAX) << OPCODE_BITS))
    }

    /// Creates an instruction naming a known [`OpCode`].
    ///
    /// The operand is truncated the same way [`Instruction::encode`] does.
    #[inline(always)]
    pub const fn new(op: OpCode, operand: u32) -> Self {
        Self::encode(op as u8, operand)
    }

    /// Splits the instruction into its opcode byte and its operand.
    #[inline(always)]
    pub const fn decode(self) -> (u8, u32) {
        (self.opcode(), self.operand())
    }

    /// Returns the raw opcode field of the instruction.
    #[inline(always)]
    pub const fn opcode(self) -> u8 {
        (self.0 & OPCODE_MASK) as u8
    }

    /// Returns the operand field of the instruction.
    #[inline(always)]
    pub const fn operand(self) -> u32 {
        self.0 >> OPCODE_BITS
    }

    /// Returns the [`OpCode`] named by the instruction, if it names one at all.
    #[inline(always)]
    pub const fn op_code(self) -> Option<OpCode> {
        OpCode::from_u8(self.opcode())
    }
}

impl From<OpCode> for Instruction {
    #[inline(always)]
    fn from(op: OpCode) -> Self {
        Self::new(op, 0)
    }
}

impl From<Instruction> for u32 {
    #[inline(always)]
    fn from(instr: Instruction) -> Self {
        instr.0
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("opcode", &self.op_code())
            .field("operand", &self.operand())
            .finish()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op_code() {
            Some(op) if op.takes_operand() || self.operand() != 0 => {
                write!(f, "{} {}", op, self.operand())
            }
            Some(op) => write!(f, "{op}"),
            None => write!(f, "OP(0x{:02x}) {}", self.opcode(), self.operand()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_documentation() {
        let instr = Instruction::new(OpCode::Push, 10);
        assert_eq!(instr.0, 0x0000_0A01);
        assert_eq!(instr.opcode(), 1);
        assert_eq!(instr.operand(), 10);
    }

    #[test]
    fn round_trips_within_range() {
        for opcode in 0..=u8::MAX {
            for operand in [0, 1, 2, 255, 256, 0x1234, 0x00AB_CDEF, OPERAND_MAX - 1, OPERAND_MAX] {
                let word = Instruction::encode(opcode, operand);
                assert_eq!(word.decode(), (opcode, operand));
            }
        }
    }

    #[test]
    fn operand_is_masked_to_24_bits() {
        let instr = Instruction::encode(OpCode::Push as u8, 0x0100_0005);
        assert_eq!(instr.operand(), 5);
        assert_eq!(instr.op_code(), Some(OpCode::Push));

        let instr = Instruction::encode(OpCode::Push as u8, u32::MAX);
        assert_eq!(instr.operand(), OPERAND_MAX);
    }

    #[test]
    fn operand_is_not_sign_extended() {
        let instr = Instruction(0xFFFF_FF01);
        assert_eq!(instr.operand(), 0x00FF_FFFF);
    }

    #[test]
    fn every_opcode_round_trips_through_its_byte() {
        for byte in 0..=17u8 {
            let op = OpCode::from_u8(byte).unwrap();
            assert_eq!(op as u8, byte);
        }
        assert_eq!(OpCode::from_u8(18), None);
        assert_eq!(OpCode::from_u8(99), None);
    }

    #[test]
    fn display_disassembles() {
        assert_eq!(Instruction::new(OpCode::Push, 10).to_string(), "PUSH 10");
        assert_eq!(Instruction::from(OpCode::Add).to_string(), "ADD");
        assert_eq!(Instruction::encode(99, 5).to_string(), "OP(0x63) 5");
    }
}
