pub mod attack;
pub mod between;
pub mod magic;
pub mod tables;

pub use tables::Tables;
