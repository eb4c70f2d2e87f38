pub mod settings;
pub mod song;
pub mod stats;
pub mod target;
