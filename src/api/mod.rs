pub mod channel;
pub mod coincap;
pub mod news;
pub mod weather;
