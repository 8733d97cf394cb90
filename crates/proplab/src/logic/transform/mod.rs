pub mod collectors;
pub mod visitor;

pub use collectors::collect_vars;
