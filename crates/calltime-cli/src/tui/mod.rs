mod app;
mod capture;
mod dialog;
mod platform;
mod slides;
mod tasks;
mod ui;

use std::io::Write;
use std::time::{Duration, Instant};

use calltime_store::{Config, StorePaths};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use tokio::sync::mpsc;

use app::{App, Effect, Settings};
use tasks::{Completion, Services};

/// Redraw cadence; also drives the progress fill and toast expiry.
const TICK: Duration = Duration::from_millis(100);

/// Run the interactive slideshow until the user quits.
pub fn run(paths: &StorePaths, config: Config) -> anyhow::Result<()> {
    let services = Services {
        source: calltime_client::recap_source(&config)?,
        sender: calltime_client::gift_sender(&config)?,
    };
    let settings = Settings {
        download_dir: config.download_dir(paths),
        user_id: config.user_id,
        year: config.year,
        share_base_url: config.share_base_url,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let mut terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(std::io::stdout(), EnableMouseCapture) {
        ratatui::restore();
        return Err(e.into());
    }
    tracing::info!("slideshow started");
    let result = event_loop(&mut terminal, runtime.handle(), &services, settings);
    if let Err(e) = crossterm::execute!(std::io::stdout(), DisableMouseCapture) {
        tracing::warn!(error = %e, "failed to disable mouse capture");
    }
    ratatui::restore();
    runtime.shutdown_timeout(Duration::from_millis(500));

    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    handle: &tokio::runtime::Handle,
    services: &Services,
    settings: Settings,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut app = App::new(settings);
    let mut effects = app.start();

    loop {
        for effect in effects.drain(..) {
            match effect {
                Effect::Spawn(job) => tasks::spawn(handle, services, job, tx.clone()),
                Effect::OpenLink { url, purpose } => {
                    let mut stdout = std::io::stdout();
                    let result = platform::deliver_link(&mut stdout, &url).map_err(|e| e.to_string());
                    app.link_delivered(purpose, result);
                }
            }
        }

        let frame = terminal.draw(|f| ui::render(f, &app))?;
        app.viewport = frame.area;
        if let Some(job) = app.take_capture(frame.buffer) {
            tasks::spawn(handle, services, job, tx.clone());
        }

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    effects.extend(app.handle_key(key));
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        while let Ok(done) = rx.try_recv() {
            app.complete(done);
        }
        app.tick(Instant::now());

        if app.should_quit {
            app.shutdown();
            break;
        }
    }

    std::io::stdout().flush()?;
    Ok(())
}
