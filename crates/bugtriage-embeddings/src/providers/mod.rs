pub mod deterministic;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use deterministic::DeterministicProvider;

#[cfg(feature = "onnx")]
pub use onnx::OnnxProvider;
