pub mod audit;
pub mod cipher;
pub mod parsers;
pub mod store;
