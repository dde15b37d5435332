pub mod cli;
pub mod paths;
pub mod settings;

pub use cli::Cli;
pub use settings::Settings;
