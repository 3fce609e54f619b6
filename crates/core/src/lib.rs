#![forbid(unsafe_code)]

pub mod history;
pub mod model;
pub mod time;
pub mod week;

pub use time::{Clock, WeekZone};
