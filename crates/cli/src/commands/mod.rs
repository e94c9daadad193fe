pub mod send;
pub mod tracking;
