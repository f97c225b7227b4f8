//! Function registry for bytecode assembly
//!
//! Maps instruction names to [`StepFactory`]s. A factory declares the value
//! kind it consumes and, given the program assembled so far, appends its
//! function and reports the kind it produces.

use super::{Argument, Bytecode, Compiler};
use crate::compilation::Compilation;
use crate::error::{CompileError, CompileResult};
use crate::function::FunctionCore;
use crate::value::{Value, ValueKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An assembled bytecode program
pub type Program = Compilation<u64, Value, Value>;

type BuildFn =
    dyn Fn(&StepContext<'_>, Program) -> CompileResult<(Program, ValueKind)> + Send + Sync;

/// Everything a factory sees about the instruction being assembled
pub struct StepContext<'c> {
    /// Instruction name
    pub op: &'c str,
    /// Position in the enclosing bytecode
    pub index: usize,
    /// Raw arguments
    pub args: &'c [Argument],
    /// Coefficient and labels from the instruction
    pub core: FunctionCore<u64>,
    /// Kind flowing into this instruction
    pub input: ValueKind,
    pub(crate) compiler: &'c Compiler,
}

impl StepContext<'_> {
    /// Assemble a nested bytecode argument fed with `input`
    ///
    /// # Errors
    /// Any error from assembling the nested program.
    pub fn compile_nested(
        &self,
        bytecode: &Bytecode,
        input: ValueKind,
    ) -> CompileResult<(Program, ValueKind)> {
        self.compiler.compile_from(bytecode, input)
    }

    /// All arguments as plain values
    ///
    /// # Errors
    /// `InvalidArguments` if any argument is nested bytecode.
    pub fn values(&self) -> CompileResult<Vec<Value>> {
        self.args
            .iter()
            .map(|arg| match arg {
                Argument::Value(value) => Ok(value.clone()),
                Argument::Bytecode(_) => Err(self.invalid("expected value arguments")),
            })
            .collect()
    }

    /// Exactly one plain value argument
    ///
    /// # Errors
    /// `InvalidArguments` on any other arity or argument kind.
    pub fn single_value(&self) -> CompileResult<Value> {
        match self.args {
            [Argument::Value(value)] => Ok(value.clone()),
            _ => Err(self.invalid("expected exactly one value argument")),
        }
    }

    /// All arguments as nested bytecode
    ///
    /// # Errors
    /// `InvalidArguments` if any argument is a plain value.
    pub fn nested(&self) -> CompileResult<Vec<&Bytecode>> {
        self.args
            .iter()
            .map(|arg| match arg {
                Argument::Bytecode(bytecode) => Ok(bytecode),
                Argument::Value(_) => Err(self.invalid("expected bytecode arguments")),
            })
            .collect()
    }

    /// `InvalidArguments` for this instruction
    #[must_use]
    pub fn invalid(&self, reason: impl Into<String>) -> CompileError {
        CompileError::invalid_arguments(self.op, reason)
    }
}

/// Builds one instruction into a program
#[derive(Clone)]
pub struct StepFactory {
    input: ValueKind,
    build: Arc<BuildFn>,
}

impl StepFactory {
    /// Factory consuming `input` values
    pub fn new<F>(input: ValueKind, build: F) -> Self
    where
        F: Fn(&StepContext<'_>, Program) -> CompileResult<(Program, ValueKind)>
            + Send
            + Sync
            + 'static,
    {
        Self {
            input,
            build: Arc::new(build),
        }
    }

    /// Kind this step consumes
    #[inline]
    #[must_use]
    pub fn input(&self) -> ValueKind {
        self.input
    }

    /// Append the step to `program`
    ///
    /// # Errors
    /// Whatever the factory reports.
    pub fn build(
        &self,
        context: &StepContext<'_>,
        program: Program,
    ) -> CompileResult<(Program, ValueKind)> {
        (self.build)(context, program)
    }
}

impl fmt::Debug for StepFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepFactory")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

/// Registry of instruction factories
#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry {
    factories: HashMap<String, StepFactory>,
}

impl FunctionRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create registry with the built-in steps
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        super::steps::register_defaults(&mut registry);
        registry
    }

    /// Register or replace the factory for `name`
    pub fn register(&mut self, name: &str, factory: StepFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Factory for `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StepFactory> {
        self.factories.get(name)
    }

    /// Check if a factory exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Remove a factory
    #[inline]
    pub fn remove(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered factories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
