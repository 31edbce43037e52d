pub mod kinesis;
pub mod publisher;
