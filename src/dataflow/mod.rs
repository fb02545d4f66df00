pub mod engine;

pub use engine::{iterate_to_fixpoint, Analysis, Results};
