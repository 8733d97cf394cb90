/// Hard cap on the number of distinct variables a truth table may have.
/// Clients may lower the limit, never raise it past this.
pub const MAX_TABLE_VARIABLES: usize = 16;

/// Default cap on the number of distinct variables a truth table may have.
/// The table has 2^n rows.
pub const DEFAULT_TABLE_VARIABLES: usize = 12;

/// Deepest formula tree the parser builds. Counts operators and
/// parentheses along any path from the root.
pub const MAX_FORMULA_DEPTH: usize = 256;
