pub mod chat_logs;
pub mod health;
pub mod knowledge;

pub use health::health_check;
