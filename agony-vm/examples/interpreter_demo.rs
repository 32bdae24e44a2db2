//! # Interpreter Demo
//!
//! Demonstrates running programs through the Agony interpreter.

use agony_vm::{ExecutionResult, Interpreter, InterpreterConfig, Program, StreamHost};

fn main() {
    println!("=== Agony Interpreter Demo ===\n");

    // Example 1: Build a character out of nibbles and print it
    demo_print_character();

    // Example 2: Echo input until end of stream
    demo_echo();

    // Example 3: A loop that never ends
    demo_cycle_limit();
}

fn demo_print_character() {
    println!("--- Demo 1: Print a Character ---");

    // High nibble 4, low nibble 1: 'A'
    let program = Program::parse("{@@@@}@.$");
    program.pretty_print();

    let mut interp = Interpreter::new(&program, StreamHost::new(&b""[..], Vec::new()));
    report(interp.run());

    let (_, output) = interp.into_host().into_parts();
    println!("Output: {:?}\n", String::from_utf8_lossy(&output));
}

fn demo_echo() {
    println!("--- Demo 2: Echo ---");

    let program = Program::parse("read , while [ print . read , ]");
    println!("Source: {}", program.source());
    println!("Code:   {}", program.to_source());

    let mut interp = Interpreter::new(&program, StreamHost::new(&b"nibbles"[..], Vec::new()));
    report(interp.run());

    let (_, output) = interp.into_host().into_parts();
    println!("Output: {:?}\n", String::from_utf8_lossy(&output));
}

fn demo_cycle_limit() {
    println!("--- Demo 3: Cycle Limit ---");

    let config = InterpreterConfig::default()
        .with_core_size(32)
        .with_max_cycles(1_000);
    let program = Program::parse("@()");

    let mut interp = match Interpreter::with_config(config, &program, StreamHost::new(&b""[..], Vec::new())) {
        Ok(interp) => interp,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    report(interp.run());

    let regs = interp.registers();
    println!("{}", interp.core().disassemble());
    println!("{}\n", interp.core().pointer_line(regs.cell, regs.exec));
}

fn report(result: agony_vm::Result<ExecutionResult>) {
    match result {
        Ok(ExecutionResult::Halted { reason, cycles }) => {
            println!("✓ Halted ({:?}) after {} cycles", reason, cycles);
        }
        Ok(ExecutionResult::CycleLimitReached { cycles }) => {
            println!("⚠ Cycle limit reached after {} cycles", cycles);
        }
        Err(e) => {
            println!("✗ Error: {}", e);
        }
    }
}
