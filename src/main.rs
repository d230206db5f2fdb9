mod app;
mod assets;
mod audio;
mod config;
mod library;
mod mix;
mod runtime;
mod search;
mod soundscape;
mod sync;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
