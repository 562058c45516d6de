//! LS-8 Runtime
mod image;
mod logger;

use {
    argh::FromArgs,
    color_eyre::eyre::{eyre, Result, WrapErr},
    log::LevelFilter,
    ls8bytecode::valider,
    ls8vm::{mem::Ram, Vm, VmRunOk},
    std::{
        io::{self, Write},
        path::PathBuf,
        process::exit,
    },
};

/// Run an LS-8 program image
#[derive(FromArgs)]
struct Config {
    /// program image, one binary byte literal per line
    #[argh(positional)]
    image: PathBuf,

    /// print machine state before every instruction to stderr
    #[argh(switch, short = 't')]
    trace: bool,

    /// reject images which do not decode as a plain instruction sequence
    #[argh(switch)]
    validate: bool,

    /// print disassembly of the image instead of running it
    #[argh(switch, short = 'd')]
    disasm: bool,

    /// print registers to stderr after the program halts
    #[argh(switch)]
    dump_registers: bool,

    /// log level: off, error, warn, info, debug or trace
    #[argh(option, default = "LevelFilter::Warn")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let config: Config = argh::from_env();
    logger::init(config.log_level)?;

    // Load program
    log::info!("Loading image from \"{}\"", config.image.display());
    let image = image::read(&config.image)
        .wrap_err_with(|| format!("Failed to load \"{}\"", config.image.display()))?;
    log::info!("Image of {} bytes loaded", image.len());

    if config.validate {
        valider::validate(&image).wrap_err("Image validation failed")?;
    }

    if config.disasm {
        let mut listing = String::new();
        let stat = ls8bytecode::disasm(&image, &mut listing);
        print!("{listing}");
        return stat.wrap_err("Disassembly failed");
    }

    let mut ram = Ram::default();
    ram.load_image(&image).map_err(|e| eyre!(e))?;

    // Tracing needs control back after every instruction
    if config.trace {
        execute(Vm::<_, 1>::new(ram), &config)
    } else {
        execute(Vm::<_, 0>::new(ram), &config)
    }
}

fn execute<const TIMER_QUOTIENT: usize>(
    mut vm: Vm<Ram, TIMER_QUOTIENT>,
    config: &Config,
) -> Result<()> {
    let mut out = io::stdout().lock();
    let trace = |vm: &Vm<Ram, TIMER_QUOTIENT>| {
        if config.trace {
            eprintln!("{}", vm.trace());
        }
    };

    trace(&vm);
    let stat = loop {
        match vm.run() {
            Ok(VmRunOk::Print(value)) => {
                writeln!(out, "{value}")?;
                trace(&vm);
            }
            Ok(VmRunOk::Timer) => trace(&vm),
            Ok(VmRunOk::End) => break Ok(()),
            Err(e) => break Err(e),
        }
    };
    out.flush()?;

    if config.dump_registers || stat.is_err() {
        eprintln!("\n== Registers ==\n{:?}\nPC: {}", vm.registers, vm.pc);
    }

    if let Err(e) = stat {
        eprintln!("\n== Memory ==\n{:?}", vm.memory);
        eprintln!("[E] Runtime error: {e}");
        exit(2);
    }

    log::info!("Program halted at {}", vm.pc);
    Ok(())
}
