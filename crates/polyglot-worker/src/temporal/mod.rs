// Temporal integration module
// Decision: All Temporal-specific code lives in this module; the rest of the crate sees only the backend traits
//
// This module contains:
// - convert.rs: handler errors as Temporal application failures
// - client.rs: connection to the Temporal frontend (Connector / OrchestrationClient)
// - worker.rs: core worker plus the workflow and activity pollers

mod client;
mod convert;
mod worker;

pub use client::{TemporalClient, TemporalConnector};
pub use worker::TemporalTaskWorker;
