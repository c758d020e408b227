//! [`Canvas`](crate::canvas::Canvas) implementations.

mod engine;
mod reference;

pub use engine::EngineCanvas;
pub use reference::ReferenceCanvas;
