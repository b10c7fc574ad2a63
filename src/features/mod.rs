pub mod complaints;
pub mod frontend;
pub mod uploads;
