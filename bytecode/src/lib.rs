//! LS-8 bytecode definitions
//!
//! Every instruction is an opcode byte followed by up to two operand bytes.
//! The opcode alone determines how many operands follow, see [`layout`].

#![no_std]

#[cfg(feature = "disasm")]
mod disasm;
mod gen_valider;

#[cfg(feature = "disasm")]
pub use disasm::{disasm, DisasmError};

macro_rules! constmod {
    ($vis:vis $mname:ident($repr:ty) {
        $(#![doc = $mdoc:literal])*
        $($cname:ident = $val:expr $(,$doc:literal)?;)*
    }) => {
        $(#[doc = $mdoc])*
        $vis mod $mname {
            $(
                $(#[doc = $doc])?
                pub const $cname: $repr = $val;
            )*
        }
    };
}

/// Invoke macro with bytecode definition format
/// # Input syntax
/// ```text
/// macro!(
///     INSTRUCTION_TYPE(p0: TYPE, p1: TYPE, …)
///         => [INSTRUCTION_A, INSTRUCTION_B, …],
///     …
/// );
/// ```
/// - Operand types
///     - R: Register index (u8, has to be below [`REG_COUNT`])
///     - I: Immediate byte (u8)
#[macro_export]
macro_rules! invoke_with_def {
    ($macro:path) => {
        $macro!(
            bb(p0: R, p1: R)
                => [ADD, MLT],
            bi(p0: R, p1: I)
                => [LDI],
            b(p0: R)
                => [PRN, PSH, POP, CLL],
            n()
                => [HLT, RET],
        );
    };
}

macro_rules! gen_meta {
    (
        $(
            $ityn:ident
            ($($param_i:ident: $param_ty:ident),* $(,)?)
            => [$($opcode:ident),* $(,)?],
        )*
    ) => {
        /// Every defined opcode
        pub const OPCODES: &[u8] = &[$($(opcode::$opcode,)*)*];

        /// Operand layout of an opcode, [`None`] if the byte is not an opcode
        pub const fn layout(op: u8) -> Option<&'static [Operand]> {
            use crate::opcode::*;
            match op {
                $($($opcode)|* => Some(&[$(operand_kind!($param_ty)),*]),)*
                _ => None,
            }
        }

        /// Instruction mnemonic
        pub const fn mnemonic(op: u8) -> Option<&'static str> {
            use crate::opcode::*;
            match op {
                $($($opcode => Some(stringify!($opcode)),)*)*
                _ => None,
            }
        }

        /// Look up opcode by its mnemonic, ignoring ASCII case
        pub fn from_mnemonic(name: &str) -> Option<u8> {
            $($(
                if name.eq_ignore_ascii_case(stringify!($opcode)) {
                    return Some(opcode::$opcode);
                }
            )*)*
            None
        }
    };
}

macro_rules! operand_kind {
    (R) => {
        Operand::Reg
    };
    (I) => {
        Operand::Imm
    };
}

invoke_with_def!(gen_valider::gen_valider);
invoke_with_def!(gen_meta);

constmod!(pub opcode(u8) {
    //! Opcode constant module
    //!
    //! The two high bits of an encoding happen to match the operand count,
    //! nothing relies on it.

    HLT = 0b0000_0001, "N; Halt the machine";
    LDI = 0b1000_0010, "BI; #0 ← imm #1";
    PRN = 0b0100_0111, "B; Print #0 as decimal";
    ADD = 0b1010_0000, "BB; #0 ← #0 + #1";
    MLT = 0b1010_0010, "BB; #0 ← #0 × #1";
    PSH = 0b0100_0101, "B; SP ← SP - 1, [SP] ← #0";
    POP = 0b0100_0110, "B; #0 ← [SP], [SP] ← 0, SP ← SP + 1";
    CLL = 0b0101_0000, "B; SP ← SP - 1, [SP] ← PC, PC ← #0";
    RET = 0b0001_0001, "N; PC ← [SP] + 2, [SP] ← 0, SP ← SP + 1";
});

/// Register file size
pub const REG_COUNT: u8 = 8;

/// Maximum operand bytes of any instruction
pub const MAX_OPERANDS: usize = 2;

/// Operand kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Register index
    Reg,
    /// Immediate byte
    Imm,
}

/// Operand count of an opcode
pub const fn operand_count(op: u8) -> Option<u8> {
    match layout(op) {
        Some(operands) => Some(operands.len() as u8),
        None => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamBB(pub u8, pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamB(pub u8);

/// Instruction operands decodable from fetched bytes
pub trait OpParam: Sized {
    /// Size in bytes
    const SIZE: usize;

    /// Construct from operand bytes, only first [`Self::SIZE`] are meaningful
    fn from_operands(operands: [u8; MAX_OPERANDS]) -> Self;
}

impl OpParam for ParamBB {
    const SIZE: usize = 2;

    #[inline]
    fn from_operands([p0, p1]: [u8; MAX_OPERANDS]) -> Self {
        Self(p0, p1)
    }
}

impl OpParam for ParamB {
    const SIZE: usize = 1;

    #[inline]
    fn from_operands([p0, _]: [u8; MAX_OPERANDS]) -> Self {
        Self(p0)
    }
}

impl OpParam for () {
    const SIZE: usize = 0;

    #[inline]
    fn from_operands(_: [u8; MAX_OPERANDS]) -> Self {}
}
