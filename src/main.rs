//! Application entry point and thread bootstrapper.

mod commentary;
mod frontend;
mod input;
mod leaderboard;
mod logic;
mod models;
mod shared;
mod system;

use crate::commentary::{LocalReviewer, ReviewManager};
use crate::leaderboard::Leaderboard;
use crate::models::settings::Settings;
use crate::system::bus::SystemBus;

fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    log::info!("MAIN: Booting NeoClick...");

    let bus = SystemBus::new();
    let settings = Settings::load();

    let leaderboard = Leaderboard::open_default();
    let reviews = ReviewManager::new(Box::new(LocalReviewer::new()));

    let logic_bus = bus.clone();
    logic::start_thread(logic_bus, settings.clone(), reviews, leaderboard);

    frontend::run(bus, settings.clone());

    if let Err(e) = settings.save() {
        log::warn!("MAIN: Failed to persist settings: {}", e);
    }

    // The logic thread owns the live board; reopen for the final print.
    let standings = Leaderboard::open_default();
    for (rank, entry) in standings.entries().iter().enumerate() {
        log::info!(
            "MAIN: #{:<2} {:<16} {:>6} pts {:>5.1}% (saved at {})",
            rank + 1,
            entry.name,
            entry.score,
            entry.accuracy,
            entry.date
        );
    }
}
