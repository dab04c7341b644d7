pub mod client;
pub mod daemon;
pub mod offline;
pub mod protocol;
