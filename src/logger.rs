use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::path::Path;

/// Initializes the global logger.
///
/// Call once at the start of `main`. The level comes from `RUST_LOG`
/// (`RUST_LOG=debug`, `RUST_LOG=warn`, ...) and falls back to `default_level`.
/// Records go to stderr, and to `log_file` as well when one is given.
pub fn init(default_level: LevelFilter, log_file: Option<&Path>) {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .unwrap_or(default_level);

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let console = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = Dispatch::new()
        .level(level)
        .level_for("rustyline", LevelFilter::Warn)
        .chain(console);

    if let Some(path) = log_file {
        match fern::log_file(path) {
            Ok(file) => {
                dispatch = dispatch.chain(
                    Dispatch::new()
                        .format(|out, message, record| {
                            out.finish(format_args!(
                                "[{} {} {}] {}",
                                Local::now().format("%Y-%m-%d %H:%M:%S"),
                                record.level(),
                                record.target(),
                                message
                            ))
                        })
                        .chain(file),
                );
            }
            Err(e) => eprintln!("Failed to open log file '{}': {}", path.display(), e),
        }
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {}", e);
    }
}
