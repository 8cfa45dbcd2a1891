//! Object storage implementations

pub mod local;

pub use local::LocalObjectStorage;
