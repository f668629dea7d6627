pub mod cibc;
pub mod plain;

pub use cibc::parse_cibc_csv;
pub use plain::parse_plain_csv;
