use ldvm_core::config::Config;
use ldvm_core::core::{CycleOutcome, Interpreter, Program};
use ldvm_core::stats::CycleStats;
use ldvm_core::Instruction;

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Interpreter over a validated in-memory program.
#[derive(Debug)]
pub struct TestContext {
    /// Interpreter under test.
    pub interp: Interpreter,
}

impl TestContext {
    /// Builds an interpreter with the default configuration.
    pub fn new(insts: Vec<Instruction>) -> Self {
        Self::with_config(insts, &Config::default())
    }

    /// Builds an interpreter; panics if the program does not validate.
    pub fn with_config(insts: Vec<Instruction>, config: &Config) -> Self {
        init_tracing();
        let program = Program::new(insts, &config.memory).expect("test program must validate");
        Self {
            interp: Interpreter::new(program, config),
        }
    }

    /// Runs one cycle.
    pub fn cycle(&mut self) -> CycleOutcome {
        self.interp.interpret_one_cycle()
    }

    /// Runs `n` cycles and returns the last outcome.
    pub fn run(&mut self, n: usize) -> CycleOutcome {
        let mut last = CycleOutcome::Completed;
        for _ in 0..n {
            last = self.cycle();
        }
        last
    }

    /// Reads a bit; panics when out of range.
    pub fn bit(&self, addr: usize) -> bool {
        self.interp.memory().bit(addr).expect("bit address in range")
    }

    /// Reads an integer; panics when out of range.
    pub fn int(&self, addr: usize) -> i32 {
        self.interp.memory().int(addr).expect("int address in range")
    }

    /// Writes a bit between cycles.
    pub fn set_bit(&mut self, addr: usize, value: bool) {
        self.interp
            .memory_mut()
            .set_bit(addr, value)
            .expect("bit address in range");
    }

    /// Writes an integer between cycles.
    pub fn set_int(&mut self, addr: usize, value: i32) {
        self.interp
            .memory_mut()
            .set_int(addr, value)
            .expect("int address in range");
    }

    /// Accumulated statistics.
    pub fn stats(&self) -> &CycleStats {
        self.interp.stats()
    }
}
