//! Integration tests for the realtime console core.
//!
//! Each test wires the real connection manager and state machines to an
//! in-memory transport and a scripted backend, so full flows run without
//! a network.

mod helpers;

mod chat_flow_test;
mod notification_flow_test;
mod reconnect_test;
