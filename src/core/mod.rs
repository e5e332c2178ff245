pub mod chance;
pub mod engine;
pub mod scenario;
pub mod session;
