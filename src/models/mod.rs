pub mod time_records;
pub mod timers;
pub mod users;
pub mod weekly;
