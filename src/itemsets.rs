pub mod count;
pub mod lattice;
pub mod search;
