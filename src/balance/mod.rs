pub mod aggregator;
pub mod engine;
pub mod projector;
pub mod simplifier;
