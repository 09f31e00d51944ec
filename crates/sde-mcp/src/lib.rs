pub mod dispatch;
pub mod handle;
pub mod jsonrpc;
pub mod tools;

pub use dispatch::ToolDispatcher;
pub use handle::ApiHandle;
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use tools::{ToolDefinition, ToolRegistry};
