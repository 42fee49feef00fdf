pub mod bedrock;
pub mod dynamo;
pub mod eventbridge;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;
pub mod model;
pub mod notify;
pub mod record_store;
