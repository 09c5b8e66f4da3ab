use anyhow::Result;

mod app;
mod assistant;
mod config;
mod data;
mod handler;
mod profile;
mod support;
mod tui;
mod ui;

use app::App;
use config::Config;
use profile::ProfileStore;
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    tui::install_panic_hook();

    let store = ProfileStore::new()?;
    let config = Config::load().unwrap_or_else(|_| Config::new());
    let mut app = App::new(store, config);

    // A restored session skips the sign-in screen, so kick off the daily
    // tip fetch here; fresh logins do it from the auth handler.
    if app.profile.is_some() {
        app.spawn_tip_fetch();
    }

    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(&mut app, event).await?;
        }

        app.poll_tasks().await;
    }

    tui::restore()?;
    Ok(())
}
