use {
    crate::{mem::Memory, Vm},
    core::fmt,
};

/// Machine state line: PC, the three bytes from PC on and all registers
///
/// ```text
/// TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4
/// ```
pub struct Trace<'a, Mem, const TIMER_QUOTIENT: usize>(pub(crate) &'a Vm<Mem, TIMER_QUOTIENT>);

impl<Mem: Memory, const TIMER_QUOTIENT: usize> fmt::Display for Trace<'_, Mem, TIMER_QUOTIENT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vm = self.0;
        write!(f, "TRACE: {:02X} |", vm.pc.get())?;
        for n in 0..3_u8 {
            match vm.memory.load(vm.pc + n) {
                Ok(byte) => write!(f, " {byte:02X}")?,
                Err(_) => f.write_str(" --")?,
            }
        }

        f.write_str(" |")?;
        for value in vm.registers.as_array() {
            write!(f, " {value:02X}")?;
        }
        Ok(())
    }
}
