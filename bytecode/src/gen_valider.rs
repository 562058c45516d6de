//! Generate LS-8 program validator

macro_rules! gen_valider {
    (
        $(
            $ityn:ident
            ($($param_i:ident: $param_ty:ident),* $(,)?)
            => [$($opcode:ident),* $(,)?],
        )*
    ) => {
        pub mod valider {
            //! Validate if program image is sound to execute

            /// Program validation error kind
            #[derive(Clone, Copy, Debug, PartialEq, Eq)]
            pub enum ErrorKind {
                /// Unknown opcode
                InvalidInstruction,
                /// Operands run past the end of the image
                TruncatedInstruction,
                /// Register operand outside of the register file
                InvalidRegister,
            }

            /// Error
            #[derive(Clone, Copy, Debug, PartialEq, Eq)]
            pub struct Error {
                /// Kind
                pub kind:  ErrorKind,
                /// Location in bytecode
                pub index: usize,
            }

            impl core::fmt::Display for Error {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    let kind = match self.kind {
                        ErrorKind::InvalidInstruction => "invalid instruction",
                        ErrorKind::TruncatedInstruction => "truncated instruction",
                        ErrorKind::InvalidRegister => "invalid register operand",
                    };
                    write!(f, "{kind} at {:#04x}", self.index)
                }
            }

            impl core::error::Error for Error {}

            /// Perform bytecode validation. If it passes, every instruction
            /// in the image decodes and only names existing registers.
            ///
            /// The image is swept linearly, so data embedded between
            /// instructions will be rejected.
            pub fn validate(program: &[u8]) -> Result<(), Error> {
                use crate::opcode::*;

                let mut index = 0;
                while let Some(&op) = program.get(index) {
                    index = match op {
                        $(
                            $($opcode)|* => {
                                #[allow(unused_mut, unused_variables)]
                                let mut operands = program[index + 1..].iter().copied();
                                $(
                                    let Some($param_i) = operands.next() else {
                                        return Err(Error {
                                            kind: ErrorKind::TruncatedInstruction,
                                            index,
                                        });
                                    };
                                    $crate::gen_valider::param_chk!($param_ty, $param_i, index)?;
                                )*
                                index + 1 $(+ $crate::gen_valider::one!($param_i))*
                            }
                        )*

                        // The plebs
                        _ => {
                            return Err(Error {
                                kind: ErrorKind::InvalidInstruction,
                                index,
                            })
                        }
                    };
                }

                Ok(())
            }
        }
    };
}

/// Check a single operand
macro_rules! param_chk {
    (R, $param:ident, $index:ident) => {
        if $param < $crate::REG_COUNT {
            Ok(())
        } else {
            Err(Error {
                kind:  ErrorKind::InvalidRegister,
                index: $index,
            })
        }
    };

    (I, $param:ident, $index:ident) => {{
        let _ = $param;
        Ok::<(), Error>(())
    }};

    ($_0:ident, $($_1:tt)*) => {
        compile_error!("Invalid operand type");
    };
}

macro_rules! one {
    ($_:ident) => {
        1
    };
}

pub(crate) use {gen_valider, one, param_chk};
