pub mod codec;
pub mod entity;
pub mod error;
pub mod port;
