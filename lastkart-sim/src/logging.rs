use fern::Dispatch;
use log::LevelFilter;

fn level_filter(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        // anything else is treated as info
        _ => LevelFilter::Info,
    }
}

pub fn setup_logging(level: &str) -> Result<(), fern::InitError> {
    Dispatch::new()
        .level(level_filter(level))
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S%.3f]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
