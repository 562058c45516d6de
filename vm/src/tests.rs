extern crate alloc;

use {
    crate::{
        mem::{Address, Memory, Ram},
        Vm, VmRunError, VmRunOk, RAM_SIZE, SP, SP_INIT,
    },
    alloc::{format, string::ToString, vec, vec::Vec},
    ls8bytecode::opcode::*,
};

fn boot<const TIMER_QUOTIENT: usize>(prog: &[u8]) -> Vm<Ram, TIMER_QUOTIENT> {
    let mut ram = Ram::default();
    ram.load_image(prog).unwrap();
    Vm::new(ram)
}

/// Run until halt or error, collecting printed values
fn run_to_end(vm: &mut Vm<Ram, 0>) -> (Result<(), VmRunError>, Vec<u8>) {
    let mut output = vec![];
    loop {
        match vm.run() {
            Ok(VmRunOk::Print(value)) => output.push(value),
            Ok(VmRunOk::End) => return (Ok(()), output),
            Ok(VmRunOk::Timer) => unreachable!("timer is disabled"),
            Err(e) => return (Err(e), output),
        }
    }
}

#[test]
fn initial_state() {
    let vm = boot::<0>(&[]);
    assert_eq!(vm.pc, Address::NULL);
    assert_eq!(vm.registers.sp(), SP_INIT);
    assert_eq!(vm.registers.as_array(), &[0, 0, 0, 0, 0, 0, 0, 0xF4]);
    assert!(vm.memory.cells().iter().all(|&b| b == 0));
    assert!(!vm.is_halted());
}

#[test]
fn add_and_print() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        LDI, 0, 8,
        LDI, 1, 3,
        ADD, 0, 1,
        PRN, 0,
        HLT,
    ]);

    assert_eq!(run_to_end(&mut vm), (Ok(()), vec![11]));
    assert!(vm.is_halted());
    assert_eq!(vm.pc, Address::new(11));
}

#[test]
fn mlt_and_print() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        LDI, 0, 4,
        LDI, 1, 5,
        MLT, 0, 1,
        PRN, 0,
        HLT,
    ]);

    assert_eq!(run_to_end(&mut vm), (Ok(()), vec![20]));
}

#[test]
fn alu_wraps() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        LDI, 0, 200,
        LDI, 1, 100,
        ADD, 0, 1,
        LDI, 2, 16,
        MLT, 2, 2,
        PRN, 0,
        PRN, 2,
        HLT,
    ]);

    assert_eq!(run_to_end(&mut vm), (Ok(()), vec![44, 0]));
}

#[test]
fn alu_over_register_pairs() {
    for a in 0..8 {
        for b in 0..8 {
            for (x, y) in [(0_u8, 0_u8), (1, 2), (7, 9), (255, 1), (128, 3)] {
                let mut vm = boot(&[LDI, a, x, LDI, b, y, ADD, a, b, HLT]);
                assert_eq!(run_to_end(&mut vm).0, Ok(()));
                let x = if a == b { y } else { x };
                assert_eq!(vm.read_reg(a), Ok(x.wrapping_add(y)));

                let mut vm = boot(&[LDI, a, x, LDI, b, y, MLT, a, b, HLT]);
                assert_eq!(run_to_end(&mut vm).0, Ok(()));
                assert_eq!(vm.read_reg(a), Ok(x.wrapping_mul(y)));
            }
        }
    }
}

#[test]
fn alu_refuses_unknown_operation() {
    let mut vm = boot::<0>(&[]);
    vm.write_reg(0, 3).unwrap();
    vm.write_reg(1, 4).unwrap();

    assert_eq!(vm.alu(PRN, 0, 1), Err(VmRunError::InvalidAluOp(PRN)));
    assert_eq!(vm.alu(0, 0, 1), Err(VmRunError::InvalidAluOp(0)));
    assert_eq!(vm.read_reg(0), Ok(3));

    assert_eq!(vm.alu(ADD, 0, 1), Ok(()));
    assert_eq!(vm.read_reg(0), Ok(7));
}

#[test]
fn push_pop_scenario() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        LDI, 0, 9,
        PSH, 0,
        POP, 1,
        PRN, 1,
        HLT,
    ]);

    assert_eq!(run_to_end(&mut vm), (Ok(()), vec![9]));
    assert_eq!(vm.memory.load(Address::from(SP_INIT - 1)), Ok(0));
    assert_eq!(vm.registers.sp(), SP_INIT);
}

#[test]
fn push_then_pop_primitives() {
    let mut vm = boot::<0>(&[]);
    for value in [0, 1, 0x7F, 0xFF] {
        vm.push(value).unwrap();
        assert_eq!(vm.registers.sp(), SP_INIT - 1);
        assert_eq!(vm.top(), Ok(value));
        assert_eq!(vm.pop(), Ok(value));
        assert_eq!(vm.registers.sp(), SP_INIT);
        assert_eq!(vm.memory.load(Address::from(SP_INIT - 1)), Ok(0));
    }
}

#[test]
fn stack_is_lifo() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        LDI, 0, 1,
        LDI, 1, 2,
        LDI, 2, 3,
        PSH, 0,
        PSH, 1,
        PSH, 2,
        POP, 3,
        POP, 4,
        POP, 5,
        HLT,
    ]);

    assert_eq!(run_to_end(&mut vm).0, Ok(()));
    assert_eq!(&vm.registers.as_array()[3..6], &[3, 2, 1]);
    assert_eq!(vm.registers.sp(), SP_INIT);
    assert!(vm.memory.cells()[0xF1..0xF4].iter().all(|&b| b == 0));
}

#[test]
fn stack_pointer_wraps() {
    let mut vm = boot::<0>(&[]);
    vm.registers.set_sp(0);
    vm.push(5).unwrap();
    assert_eq!(vm.registers.sp(), 0xFF);
    assert_eq!(vm.memory.load(Address::new(0xFF)), Ok(5));
    assert_eq!(vm.pop(), Ok(5));
    assert_eq!(vm.registers.sp(), 0);
}

#[test]
fn call_resumes_after_call_site() {
    #[rustfmt::skip]
    let mut vm = boot::<1>(&[
        LDI, 1, 6, // 0x00
        CLL, 1,    // 0x03
        HLT,       // 0x05
        RET,       // 0x06
    ]);

    assert_eq!(vm.run(), Ok(VmRunOk::Timer));
    assert_eq!(vm.pc, Address::new(3));

    assert_eq!(vm.run(), Ok(VmRunOk::Timer));
    assert_eq!(vm.pc, Address::new(6));
    assert_eq!(vm.registers.sp(), SP_INIT - 1);
    assert_eq!(vm.top(), Ok(3));

    assert_eq!(vm.run(), Ok(VmRunOk::Timer));
    assert_eq!(vm.pc, Address::new(5));
    assert_eq!(vm.registers.sp(), SP_INIT);
    assert_eq!(vm.memory.load(Address::from(SP_INIT - 1)), Ok(0));

    assert_eq!(vm.run(), Ok(VmRunOk::End));
}

#[test]
fn subroutine_doubles_register() {
    #[rustfmt::skip]
    let mut vm = boot(&[
        LDI, 0, 7,  // 0x00
        LDI, 1, 11, // 0x03
        CLL, 1,     // 0x06
        PRN, 0,     // 0x08
        HLT,        // 0x0A
        ADD, 0, 0,  // 0x0B
        RET,        // 0x0E
    ]);

    assert_eq!(run_to_end(&mut vm), (Ok(()), vec![14]));
    assert_eq!(vm.registers.sp(), SP_INIT);
}

#[test]
fn call_through_stack_pointer_sees_pushed_sp() {
    let mut vm = boot::<1>(&[CLL, SP]);
    assert_eq!(vm.run(), Ok(VmRunOk::Timer));
    assert_eq!(vm.registers.sp(), SP_INIT - 1);
    assert_eq!(vm.pc, Address::from(SP_INIT - 1));
    assert_eq!(vm.top(), Ok(0));
}

#[test]
fn call_to_bad_register_leaves_stack_alone() {
    let mut vm = boot(&[CLL, 8]);
    assert_eq!(run_to_end(&mut vm).0, Err(VmRunError::RegOutOfBounds(8)));
    assert_eq!(vm.pc, Address::NULL);
    assert_eq!(vm.registers.sp(), SP_INIT);
    assert_eq!(vm.memory.load(Address::from(SP_INIT - 1)), Ok(0));
}

#[test]
fn ram_hexdump() {
    let vm = boot::<0>(&[LDI, 0, 8, HLT]);
    let dump = format!("{:?}", vm.memory);
    let rows: Vec<_> = dump.lines().collect();
    assert_eq!(rows.len(), RAM_SIZE / 16);
    assert_eq!(rows[0], "00: 82 00 08 01 00 00 00 00 00 00 00 00 00 00 00 00");
    assert_eq!(rows[15], "F0: 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00");
}

#[test]
fn invalid_opcode() {
    let mut vm = boot(&[LDI, 0, 1, 0xFF]);
    assert_eq!(
        run_to_end(&mut vm).0,
        Err(VmRunError::InvalidOpcode(Address::new(3), 0xFF))
    );
    assert_eq!(vm.pc, Address::new(3));
}

#[test]
fn empty_ram_is_invalid_opcode() {
    let mut vm = boot(&[]);
    assert_eq!(
        run_to_end(&mut vm).0,
        Err(VmRunError::InvalidOpcode(Address::NULL, 0))
    );
}

#[test]
fn register_out_of_bounds() {
    let mut vm = boot(&[LDI, 8, 1, HLT]);
    assert_eq!(run_to_end(&mut vm).0, Err(VmRunError::RegOutOfBounds(8)));
    assert_eq!(vm.pc, Address::NULL);

    let mut vm = boot(&[PSH, 200, HLT]);
    assert_eq!(run_to_end(&mut vm).0, Err(VmRunError::RegOutOfBounds(200)));
    assert_eq!(vm.registers.sp(), SP_INIT);
}

#[test]
fn fetch_past_end_of_ram() {
    let mut prog = vec![0; RAM_SIZE];
    prog[..5].copy_from_slice(&[LDI, 0, 0xFF, CLL, 0]);
    prog[0xFF] = PRN;

    let mut vm = boot(&prog);
    assert_eq!(
        run_to_end(&mut vm).0,
        Err(VmRunError::ProgramFetchLoadEx(Address::new(0x100)))
    );
    assert_eq!(vm.pc, Address::new(0xFF));
}

#[test]
fn image_larger_than_ram() {
    let mut ram = Ram::default();
    assert!(ram.load_image(&[HLT; RAM_SIZE + 1]).is_err());
}

#[test]
fn halted_stays_halted() {
    let mut vm = boot::<0>(&[HLT, PRN, 0]);
    assert_eq!(vm.run(), Ok(VmRunOk::End));
    assert_eq!(vm.run(), Ok(VmRunOk::End));
    assert_eq!(vm.pc, Address::NULL);
}

#[test]
fn timer_interrupts() {
    let mut vm = boot::<2>(&[LDI, 0, 1, LDI, 1, 2, LDI, 2, 3, HLT]);
    assert_eq!(vm.run(), Ok(VmRunOk::Timer));
    assert_eq!(vm.pc, Address::new(6));
    assert_eq!(vm.run(), Ok(VmRunOk::End));
}

#[test]
fn writes_to_sp_are_visible() {
    let mut vm = boot(&[LDI, SP, 0x80, PSH, 0, HLT]);
    assert_eq!(run_to_end(&mut vm).0, Ok(()));
    assert_eq!(vm.registers.sp(), 0x7F);
}

#[test]
fn trace_line() {
    let mut vm = boot::<1>(&[LDI, 0, 8, HLT]);
    assert_eq!(
        vm.trace().to_string(),
        "TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4"
    );

    assert_eq!(vm.run(), Ok(VmRunOk::Timer));
    assert_eq!(
        vm.trace().to_string(),
        "TRACE: 03 | 01 00 00 | 08 00 00 00 00 00 00 F4"
    );

    vm.pc = Address::new(0xFE);
    assert_eq!(
        vm.trace().to_string(),
        "TRACE: FE | 00 00 -- | 08 00 00 00 00 00 00 F4"
    );
}
