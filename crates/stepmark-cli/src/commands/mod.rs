//! CLI command implementations.

pub mod generate;
pub mod info;
pub mod list;
pub mod run;

pub use generate::GenerateCommand;
pub use run::RunCommand;
