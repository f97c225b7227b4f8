//! Bytecode assembly

use super::registry::{FunctionRegistry, Program, StepContext};
use super::Bytecode;
use crate::coefficient::Coefficient;
use crate::config::{MachineConfig, Strategy};
use crate::error::{CompileError, CompileResult};
use crate::function::FunctionCore;
use crate::labels::Labels;
use crate::processor::worker_pool;
use crate::value::ValueKind;
use parking_lot::Mutex;
use rayon::ThreadPool;
use std::sync::Arc;

/// Assembles bytecode into executable programs
///
/// Assembly walks the instructions in order, tracking the value kind that
/// flows between neighbors. A step whose declared input kind does not
/// accept the kind produced before it is rejected with
/// [`CompileError::TypeMismatch`]; `Any` defers the check to runtime.
///
/// Parallel programs run on one worker pool, built on first use and shared
/// by every clone of the compiler.
#[derive(Debug, Clone)]
pub struct Compiler {
    registry: FunctionRegistry,
    config: MachineConfig,
    pool: Arc<Mutex<Option<Arc<ThreadPool>>>>,
}

impl Compiler {
    /// Compiler over `registry`, evaluating per `config`
    #[must_use]
    pub fn new(registry: FunctionRegistry, config: MachineConfig) -> Self {
        Self {
            registry,
            config,
            pool: Arc::default(),
        }
    }

    /// Built-in steps, default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FunctionRegistry::with_defaults(), MachineConfig::default())
    }

    /// With configuration; detaches from any previously built pool
    #[must_use]
    pub fn with_config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self.pool = Arc::default();
        self
    }

    /// The registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// The configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// The shared worker pool, built with `worker_threads` on first call
    ///
    /// # Errors
    /// `CompileError::Processor` if the pool cannot be built.
    pub fn worker_pool(&self) -> CompileResult<Arc<ThreadPool>> {
        let mut slot = self.pool.lock();
        if let Some(pool) = slot.as_ref() {
            return Ok(Arc::clone(pool));
        }
        let pool = Arc::new(worker_pool(self.config.worker_threads)?);
        tracing::debug!(threads = pool.current_num_threads(), "built worker pool");
        *slot = Some(Arc::clone(&pool));
        Ok(pool)
    }

    /// Assemble a top-level program
    ///
    /// Under [`Strategy::Parallel`] the program is evaluated on a worker pool.
    ///
    /// # Errors
    /// The first assembly error found.
    pub fn compile(&self, bytecode: &Bytecode) -> CompileResult<Program> {
        let (program, output) = self.compile_from(bytecode, ValueKind::Any)?;
        tracing::debug!(
            program = %program,
            output = %output,
            strategy = ?self.config.strategy,
            "compiled bytecode"
        );
        match self.config.strategy {
            Strategy::Serial => Ok(program),
            Strategy::Parallel => Ok(program.parallel_on(self.worker_pool()?)),
        }
    }

    /// Assemble `bytecode` fed with values of kind `input`
    ///
    /// Returns the program and the kind it produces.
    ///
    /// # Errors
    /// The first assembly error found.
    pub fn compile_from(
        &self,
        bytecode: &Bytecode,
        input: ValueKind,
    ) -> CompileResult<(Program, ValueKind)> {
        let mut program = Program::identity();
        let mut flowing = input;

        for (index, instruction) in bytecode.instructions.iter().enumerate() {
            let factory = self.registry.get(&instruction.op).ok_or_else(|| {
                CompileError::UnknownInstruction {
                    op: instruction.op.clone(),
                    index,
                }
            })?;

            if !factory.input().accepts(flowing) {
                return Err(CompileError::TypeMismatch {
                    op: instruction.op.clone(),
                    index,
                    expected: factory.input(),
                    found: flowing,
                });
            }

            let labels = Labels::of(instruction.labels.iter().map(String::as_str))?;
            let coefficient = Coefficient::new(instruction.coefficient.unwrap_or(1));
            let context = StepContext {
                op: &instruction.op,
                index,
                args: &instruction.args,
                core: FunctionCore::new(coefficient, labels),
                input: flowing,
                compiler: self,
            };
            (program, flowing) = factory.build(&context, program)?;
        }

        Ok((program, flowing))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::with_defaults()
    }
}
