pub mod policy;
pub mod poller;
