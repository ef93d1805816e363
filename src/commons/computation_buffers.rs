//! A resizable memory arena handed to the memory-optimized FFT primitives.

use dyn_stack::PodStack;

/// A resizable buffer usable as a `PodStack` for the FFT primitives and other
/// functions managing temporary memory through `dyn-stack`.
#[derive(Default)]
pub struct ComputationBuffers {
    memory: Vec<u8>,
}

impl ComputationBuffers {
    pub fn new() -> Self {
        Self { memory: Vec::new() }
    }

    /// Resize the underlying memory buffer, reallocating when the requested
    /// capacity exceeds the current one.
    pub fn resize(&mut self, capacity: usize) {
        self.memory.resize(capacity, 0);
    }

    pub fn stack(&mut self) -> &mut PodStack {
        PodStack::new(&mut self.memory)
    }
}
