pub mod csv_store;

#[cfg(test)]
pub use csv_store::read_table;
pub use csv_store::write_table;
