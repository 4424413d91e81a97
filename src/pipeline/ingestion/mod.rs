// Pipeline ingestion: reading the listings sheet into a raw table

pub mod csv_reader;

pub use csv_reader::{parse_cell, read_csv, read_csv_file, CsvOptions};
