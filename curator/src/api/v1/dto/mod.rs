pub mod chat_logs;
pub mod knowledge;

pub use chat_logs::*;
pub use knowledge::*;
