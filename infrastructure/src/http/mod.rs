//! HTTP acceptor adapter
//!
//! Implements AcceptorGateway over the acceptors' JSON REST interface.

pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod wire;
