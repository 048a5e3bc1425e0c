pub mod config;
pub mod digits;
pub mod extract;
pub mod journal;
pub mod lookup;
pub mod reader;
pub mod resolve;
pub mod walker;

#[cfg(test)]
pub(crate) mod test_fixtures;
