pub mod copy_elim;

pub use copy_elim::try_get_unnecessary_copies;
