//! Bytecode - the submission form of a program
//!
//! A [`Bytecode`] is an ordered list of [`Instruction`]s. Instruction
//! arguments are either plain [`Value`]s or nested bytecode (the
//! sub-pipelines of `union` and `choose`). The [`Compiler`] assembles
//! bytecode into a [`Program`] using the factories of a [`FunctionRegistry`].
//!
//! The serde derives are for embedding and tooling; no wire encoding is
//! attached to them.

mod compiler;
mod registry;
mod steps;

pub use compiler::Compiler;
pub use registry::{FunctionRegistry, Program, StepContext, StepFactory};

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered instruction list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bytecode {
    /// Instructions in execution order
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

impl Bytecode {
    /// Empty bytecode, compiling to the identity program
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction
    #[must_use]
    pub fn step(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Number of instructions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether there are no instructions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns the serde error if `json` is not bytecode.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, instruction) in self.instructions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{instruction}")?;
        }
        f.write_str("]")
    }
}

/// One step of a bytecode program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Registered function name
    pub op: String,
    /// Positional arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,
    /// Labels bound to the step's output
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Step coefficient, unity when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficient: Option<u64>,
}

impl Instruction {
    /// Instruction without arguments
    #[must_use]
    pub fn new(op: impl Into<String>) -> Self {
        Self {
            op: op.into(),
            args: Vec::new(),
            labels: Vec::new(),
            coefficient: None,
        }
    }

    /// Append a value argument
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(Argument::Value(value.into()));
        self
    }

    /// Append a nested bytecode argument
    #[must_use]
    pub fn nested(mut self, bytecode: Bytecode) -> Self {
        self.args.push(Argument::Bytecode(bytecode));
        self
    }

    /// Add a label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Set the coefficient
    #[must_use]
    pub fn with_coefficient(mut self, coefficient: u64) -> Self {
        self.coefficient = Some(coefficient);
        self
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.op)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}

/// Instruction argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Argument {
    /// Plain value
    Value(Value),
    /// Nested program
    Bytecode(Bytecode),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Bytecode(bytecode) => write!(f, "{bytecode}"),
        }
    }
}
