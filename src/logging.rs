use env_logger::Env;
use log::LevelFilter;
use std::io::Write;

/// Logs go to stderr so stdout stays clean for reports. `RUST_LOG`
/// overrides the level picked here.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    log::debug!("Logging initialized with level: {default_level}");
}
