//! Record storage the ledgers and handlers build on.

pub mod credentials;
pub mod messages;
