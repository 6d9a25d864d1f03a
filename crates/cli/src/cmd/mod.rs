mod build;
mod depends;
mod namespaces;
mod order;

pub use build::cmd_build;
pub use depends::cmd_depends;
pub use namespaces::cmd_namespaces;
pub use order::cmd_order;
