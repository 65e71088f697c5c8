//! Integration test common infrastructure.
//!
//! Provides a dispatcher harness over an in-memory database and a fake IRC
//! server for driving the connection supervisor.

pub mod harness;
pub mod server;

#[allow(unused_imports)]
pub use harness::Harness;
#[allow(unused_imports)]
pub use server::FakeServer;
