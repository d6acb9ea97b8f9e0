// #![warn(rust_2018_idioms)]

pub mod driver;

pub mod ast;
pub mod check;
pub mod files;
pub mod help;
pub mod keywords;
pub mod lang;
pub mod macros;
pub mod operators;
pub mod options;
pub mod parse;
pub mod print;
pub mod reporting;
pub mod session;
pub mod sname;
pub mod source;
pub mod typedefs;
pub mod types;

mod dym;

// Public exports
pub use driver::{Driver, Status};

pub const BUG_REPORT_URL: &str = concat!(env!("CARGO_PKG_REPOSITORY"), "/issues/new");
