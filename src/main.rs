mod chart;
mod chartspec;
mod model;
mod palette;
mod stats;
mod store;
mod ui;

use ui::Dayboard;

/// Best effort; the dashboard runs fine without logging. The returned
/// handle must stay alive for the lifetime of the process.
fn init_logging() -> Option<flexi_logger::LoggerHandle> {
    let spec = std::env::var("DAYBOARD_LOG").unwrap_or_else(|_| String::from("info"));
    match flexi_logger::Logger::try_with_str(&spec).and_then(|l| l.start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("logger init failed: {e}");
            None
        }
    }
}

fn main() -> iced::Result {
    let _logger = init_logging();
    log::info!("starting dayboard v{}", env!("CARGO_PKG_VERSION"));

    iced::application(Dayboard::title, Dayboard::update, Dayboard::view)
        .theme(Dayboard::theme)
        .window(iced::window::Settings {
            size: (950.0, 680.0).into(),
            min_size: Some((720.0, 520.0).into()),
            ..Default::default()
        })
        .run_with(|| (Dayboard::new(), iced::Task::none()))
}
