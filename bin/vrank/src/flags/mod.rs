//! CLI flags shared across subcommands.

mod globals;
pub use globals::GlobalArgs;

mod rpc;
pub use rpc::RpcArgs;
