pub mod cli;
pub mod completion;
pub mod config;
pub mod console;
pub mod error;
pub mod export;
pub mod extractor;
pub mod pipeline;
pub mod scanner;
