//! Welcome to the land of The Great Dispatch Loop
//!
//! Have fun

use {
    super::{
        mem::{Address, Memory},
        Vm, VmRunError, VmRunOk,
    },
    ls8bytecode::{mnemonic, OpParam, ParamB, ParamBB, MAX_OPERANDS},
};

impl<Mem, const TIMER_QUOTIENT: usize> Vm<Mem, TIMER_QUOTIENT>
where
    Mem: Memory,
{
    /// Execute program
    ///
    /// Returns on HLT, on PRN (with the value to print), after every
    /// `TIMER_QUOTIENT` instructions (host step quota, zero disables it)
    /// or on fatal error. On error PC is left pointing at the faulting
    /// instruction.
    pub fn run(&mut self) -> Result<VmRunOk, VmRunError> {
        loop {
            if self.halted {
                return Ok(VmRunOk::End);
            }

            let pc = self.pc;
            match self.dispatch() {
                Ok(None) => (),
                Ok(Some(ok)) => return Ok(ok),
                Err(e) => {
                    self.pc = pc;
                    return Err(e);
                }
            }

            if TIMER_QUOTIENT != 0 {
                self.timer = self.timer.wrapping_add(1);
                if self.timer % TIMER_QUOTIENT == 0 {
                    return Ok(VmRunOk::Timer);
                }
            }
        }
    }

    /// Execute single instruction
    ///
    /// Every arm advances PC past its operands unless it transfers control
    fn dispatch(&mut self) -> Result<Option<VmRunOk>, VmRunError> {
        use ls8bytecode::opcode::*;

        let pc = self.pc;
        let op = self
            .memory
            .prog_read(pc)
            .ok_or(VmRunError::ProgramFetchLoadEx(pc))?;

        log::trace!("{pc}: {}", mnemonic(op).unwrap_or("???"));

        match op {
            HLT => {
                self.halted = true;
                return Ok(Some(VmRunOk::End));
            }
            LDI => {
                let ParamBB(tg, imm) = self.decode()?;
                self.write_reg(tg, imm)?;
            }
            PRN => {
                let ParamB(reg) = self.decode()?;
                let value = self.read_reg(reg)?;

                // So we don't get timer interrupt after PRN
                if TIMER_QUOTIENT != 0 {
                    self.timer = self.timer.wrapping_add(1);
                }
                return Ok(Some(VmRunOk::Print(value)));
            }
            ADD | MLT => {
                let ParamBB(a0, a1) = self.decode()?;
                self.alu(op, a0, a1)?;
            }
            PSH => {
                // Pushing SP stores its value from before the push
                let ParamB(reg) = self.decode()?;
                let value = self.read_reg(reg)?;
                self.push(value)?;
            }
            POP => {
                let ParamB(reg) = self.decode()?;

                // Fault before touching the stack
                self.read_reg(reg)?;
                let value = self.pop()?;
                self.write_reg(reg, value)?;
            }
            CLL => {
                // Saved address is the CLL opcode itself, RET compensates
                let ParamB(reg) = self.decode()?;
                self.read_reg(reg)?;

                // Fetch succeeded, so PC is inside RAM and fits a byte
                self.push(pc.get() as u8)?;

                // Target is read after the push, `CLL r7` sees the new SP
                self.pc = Address::from(self.read_reg(reg)?);
            }
            RET => {
                let saved = self.pop()?;
                self.pc = Address::from(saved) + 2_u8;
            }
            op => return Err(VmRunError::InvalidOpcode(pc, op)),
        }

        Ok(None)
    }

    /// Arithmetic logic unit, `#a ← #a op #b`
    ///
    /// Only ADD and MLT are arithmetic opcodes, anything else is refused.
    pub fn alu(&mut self, op: u8, a: u8, b: u8) -> Result<(), VmRunError> {
        use ls8bytecode::opcode::*;

        match op {
            ADD => self.binary_op(a, b, u8::wrapping_add),
            MLT => self.binary_op(a, b, u8::wrapping_mul),
            op => Err(VmRunError::InvalidAluOp(op)),
        }
    }

    /// Decode instruction operands
    #[inline(always)]
    fn decode<T: OpParam>(&mut self) -> Result<T, VmRunError> {
        let mut operands = [0; MAX_OPERANDS];
        for (n, operand) in operands.iter_mut().take(T::SIZE).enumerate() {
            let addr = self.pc + (n + 1);
            *operand = self
                .memory
                .prog_read(addr)
                .ok_or(VmRunError::ProgramFetchLoadEx(addr))?;
        }

        self.pc += 1 + T::SIZE;
        Ok(T::from_operands(operands))
    }

    /// Perform binary operation over two registers
    #[inline(always)]
    fn binary_op(&mut self, a0: u8, a1: u8, op: impl Fn(u8, u8) -> u8) -> Result<(), VmRunError> {
        let value = op(self.read_reg(a0)?, self.read_reg(a1)?);
        self.write_reg(a0, value)
    }
}
