mod chat;
mod knowledge;

pub use chat::*;
pub use knowledge::*;
