pub mod catalog;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
