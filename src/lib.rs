pub mod codegen;
pub mod config;
pub mod fetch;
pub mod join;
pub mod parse;
pub mod pipeline;
pub mod sink;
pub mod tables;
pub mod vendor;
