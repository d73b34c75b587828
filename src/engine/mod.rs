pub mod query;
pub mod result;
pub mod store;
#[cfg(test)]
pub mod testing;
pub mod time_window;
pub mod tracking;
