pub mod keys;
pub mod logger;
