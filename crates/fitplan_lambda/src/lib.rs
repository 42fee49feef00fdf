//! AWS-oriented adapters and handlers for the fitness-plan backend.
//!
//! Handlers are synchronous functions over the adapter traits in
//! [`adapters`]. The DynamoDB, Bedrock and EventBridge adapters bridge to the
//! async SDK clients from inside the Lambda runtime; the in-memory adapters
//! back the tests. Domain types live in `fitplan_core`.

pub mod adapters;
pub mod handlers;
pub mod logging;
