pub mod equivalence;

pub use equivalence::EquivProof;
