//! Traversal machine core (trav-core)
//!
//! Typed processing pipelines over weighted traversers:
//! 1. **Assembly**: append functions to a [`Compilation`], or compile
//!    [`Bytecode`] against a [`FunctionRegistry`]
//! 2. **Execution**: feed [`Traverser`]s through the compilation's processor
//!
//! Branch functions ([`UnionBranch`], [`ChooseBranch`], [`SwitchBranch`])
//! split one traverser into several nested compilations.
//!
//! # Quick Start
//!
//! ```rust
//! use trav_core::prelude::*;
//!
//! let noop = Compilation::<u64, &str, &str>::identity();
//! let union = Compilation::identity().branch(UnionBranch::new(vec![noop.clone(), noop]));
//!
//! let out = union.evaluate_objects(vec!["x"]).unwrap();
//! assert_eq!(out, vec!["x", "x"]);
//! ```

// Core modules
pub mod coefficient;
pub mod compilation;
pub mod display;
pub mod error;
pub mod function;
pub mod labels;
pub mod processor;
pub mod traverser;

// Dynamic programs
pub mod bytecode;
pub mod config;
pub mod value;

// Re-exports
pub use bytecode::{Argument, Bytecode, Compiler, FunctionRegistry, Instruction, Program};
pub use coefficient::{Coefficient, Weight};
pub use compilation::Compilation;
pub use config::{MachineConfig, Strategy};
pub use error::{CompileError, CompileResult, ConfigError, ExecutionError};
pub use function::{
    BranchFunction, ChooseBranch, Fallback, FilterFn, FilterFunction, FlatMapFn,
    FlatMapFunction, Function, FunctionCore, MapFn, MapFunction, SwitchBranch, UnionBranch,
};
pub use labels::Labels;
pub use processor::{ConstantProcessor, IdentityProcessor, ParallelProcessor, Processor, Traversers};
pub use traverser::{Object, Traverser};
pub use value::{Value, ValueKind};

/// Common imports
pub mod prelude {
    pub use crate::bytecode::{Bytecode, Compiler, Instruction, Program};
    pub use crate::coefficient::{Coefficient, Weight};
    pub use crate::compilation::Compilation;
    pub use crate::error::{CompileError, ExecutionError};
    pub use crate::function::{
        BranchFunction, ChooseBranch, FilterFn, FlatMapFn, Function, FunctionCore, MapFn,
        SwitchBranch, UnionBranch,
    };
    pub use crate::labels::Labels;
    pub use crate::traverser::Traverser;
    pub use crate::value::{Value, ValueKind};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
