pub mod fetcher;
pub mod yahoo;
