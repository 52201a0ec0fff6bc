pub mod common;
pub mod digest;
pub mod kv;
