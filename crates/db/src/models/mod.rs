pub mod asset;
pub mod booking;
