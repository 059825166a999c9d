//! # Service Module
//!
//! The swap state machine and the host-facing service around it.

mod htlc_service;
mod state_machine;

pub use htlc_service::HtlcService;
pub use state_machine::SwapStateMachine;
