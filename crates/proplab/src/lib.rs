pub mod calculi;
pub mod calculus;
pub mod consts;
pub mod logic;
pub mod parse;
pub mod tamper_protect;
pub mod truth_table;

pub use consts::MAX_TABLE_VARIABLES;
pub use logic::{structurally_equal, LogicNode, SynEq};

pub use calculi::equivalence::{check_rule, EquivRule};
pub use calculus::Calculus;
pub use parse::normalize::{to_canonical_operators, to_display_symbols};
pub use parse::{parse_prop_formula, validate_formula, ParseErr};
pub use truth_table::{generate_table, generate_table_with, TruthTable, TruthTableErr};
