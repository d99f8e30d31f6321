pub mod api;
pub mod notifications;
pub mod preferences;
pub mod shops;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;
