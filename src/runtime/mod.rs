use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;

mod event_loop;
mod logging;
mod settings;
mod startup;
mod tasks;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, warning) = settings::load_settings();

    if let Some(dir) = config::default_data_dir() {
        logging::init(&dir);
    }
    if let Some(w) = warning {
        log::warn!("{w}");
    }
    log::info!("soundscaper {} starting up", env!("CARGO_PKG_VERSION"));

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("soundscaper-worker")
        .build()?;

    let services = startup::build(&settings)?;
    let (event_tx, event_rx) = mpsc::channel::<tasks::AppEvent>();
    let tasks = tasks::Tasks::new(rt.handle().clone(), event_tx, services.clone());
    let mut app = App::new(settings.mixer.default_volume, settings.mixer.volume_step);

    tasks.refresh();
    tasks.rescan();
    tasks.account_status();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &services, &tasks, &mut app, &event_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    services.session.clear_all();
    rt.shutdown_timeout(Duration::from_secs(2));
    services.playback.shutdown();
    log::info!("soundscaper shut down");

    run_result
}
