use {
    crate::{layout, mnemonic, Operand},
    core::fmt::{self, Write},
};

/// Disassembly failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisasmError {
    /// Byte at index is not an opcode
    InvalidInstruction(usize),
    /// Instruction at index has its operands cut off by the end of image
    TruncatedInstruction(usize),
    /// Output writer failed
    Fmt,
}

impl From<fmt::Error> for DisasmError {
    fn from(_: fmt::Error) -> Self {
        Self::Fmt
    }
}

impl fmt::Display for DisasmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInstruction(index) => write!(f, "invalid instruction at {index:#04x}"),
            Self::TruncatedInstruction(index) => {
                write!(f, "truncated instruction at {index:#04x}")
            }
            Self::Fmt => f.write_str("formatting failed"),
        }
    }
}

impl core::error::Error for DisasmError {}

/// Write one line per instruction in form `AA: MNE r0, 8`
pub fn disasm(program: &[u8], out: &mut impl Write) -> Result<(), DisasmError> {
    let mut index = 0;
    while let Some(&op) = program.get(index) {
        let (Some(name), Some(operands)) = (mnemonic(op), layout(op)) else {
            return Err(DisasmError::InvalidInstruction(index));
        };

        let bytes = program
            .get(index + 1..index + 1 + operands.len())
            .ok_or(DisasmError::TruncatedInstruction(index))?;

        write!(out, "{index:02X}: {name}")?;
        for (n, (kind, byte)) in operands.iter().zip(bytes).enumerate() {
            out.write_str(if n == 0 { " " } else { ", " })?;
            match kind {
                Operand::Reg => write!(out, "r{byte}")?,
                Operand::Imm => write!(out, "{byte}")?,
            }
        }
        out.write_char('\n')?;

        index += 1 + operands.len();
    }

    Ok(())
}
