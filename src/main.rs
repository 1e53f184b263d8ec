use std::sync::Arc;

use game::dealer::Dealer;
use game::input::Keyboard;
use game::presenter::ConsolePresenter;
use game::rules::FeatureRules;
use models::exit_code::ExitCode;
use models::settings::Settings;

mod game;
mod models;
mod utils;

const DEFAULT_SETTINGS: &str = "settings.toml";

#[tokio::main]
async fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_SETTINGS.to_string());
    let settings = match Settings::load(&path) {
        Ok(settings) => Arc::new(settings),
        Err(error) => {
            logger!(ERROR, "Invalid configuration in `{path}`: {error}");
            std::process::exit(ExitCode::InvalidConfig as i32);
        }
    };

    let rules = Arc::new(FeatureRules::new(settings.feature_size, settings.feature_count));
    let dealer = Dealer::new(Arc::clone(&settings), rules, Arc::new(ConsolePresenter));
    let handle = dealer.handle();

    let keyboard = tokio::spawn(Keyboard::new(&settings, dealer.players()).run());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.terminate();
        }
    });

    let status = dealer.run().await;
    keyboard.abort();
    std::process::exit(status.code);
}
