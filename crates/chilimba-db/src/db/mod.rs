pub mod connection;
pub mod migrate;
pub mod query;
pub mod schema;
pub mod sqlite_types;

#[cfg(test)]
pub mod test_support;
