pub mod assets;
pub mod booking;
pub mod scan;
