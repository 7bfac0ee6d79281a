//! Test modules for the queue producer
//!
//! `support` provides a scripted cluster: a resolver that answers with
//! whichever endpoint is currently marked master, and a transport whose
//! per-broker behaviour can be switched between HTTP answers and refusals.

mod publish;
mod support;
