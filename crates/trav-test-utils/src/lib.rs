//! Testing utilities for the trav workspace
//!
//! Shared test helpers, fixtures, and fakes.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trav_core::{Bytecode, Compilation, Instruction, MapFn, MapFunction, Object, Value};
use trav_driver::{ChannelId, Transport, TransportError};

/// Shared invocation counter
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Identity map step that bumps `counter` on every call
pub fn counting_map<S: Object>(name: &str, counter: &Counter) -> impl MapFunction<u64, S, S> {
    let counter = counter.clone();
    MapFn::new(name, move |object: &S| {
        counter.bump();
        object.clone()
    })
}

/// Selector yielding `key` for every input, counting evaluations
pub fn counting_selector<S: Object, K: Object>(key: K, counter: &Counter) -> Compilation<u64, S, K> {
    let counter = counter.clone();
    Compilation::identity().map(MapFn::new("select", move |_: &S| {
        counter.bump();
        key.clone()
    }))
}

/// Sub-pipeline tagging its input with `tag`
pub fn tagging(tag: &'static str) -> Compilation<u64, String, String> {
    Compilation::identity().map(MapFn::new(tag, move |s: &String| format!("{s}/{tag}")))
}

pub fn longs(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Long).collect()
}

pub fn strings(values: &[&str]) -> Vec<Value> {
    values.iter().map(|s| Value::from(*s)).collect()
}

/// `inject(values...)`
pub fn inject(values: Vec<Value>) -> Instruction {
    values
        .into_iter()
        .fold(Instruction::new("inject"), Instruction::arg)
}

/// Union of two empty sub-programs over an injected `"x"`
pub fn union_of_noops() -> Bytecode {
    Bytecode::new().step(inject(strings(&["x"]))).step(
        Instruction::new("union")
            .nested(Bytecode::new())
            .nested(Bytecode::new()),
    )
}

/// Transport that records submissions and answers with a fixed response
#[derive(Debug)]
pub struct RecordingTransport {
    channel: ChannelId,
    response: Vec<Value>,
    sent: Mutex<Vec<Bytecode>>,
}

impl RecordingTransport {
    pub fn new(response: Vec<Value>) -> Self {
        Self {
            channel: ChannelId::new(),
            response,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Bytecode> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn channel(&self) -> ChannelId {
        self.channel
    }

    async fn send(&self, bytecode: &Bytecode) -> Result<Vec<Value>, TransportError> {
        self.sent.lock().push(bytecode.clone());
        Ok(self.response.clone())
    }
}
