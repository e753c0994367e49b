pub mod audit;
pub mod cipher;
pub mod gateway;
pub mod parser;
