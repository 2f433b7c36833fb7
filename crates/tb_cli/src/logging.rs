use log::LevelFilter;

/// Env var overriding the log level (`error`, `warn`, `info`, `debug`, `trace`)
pub const LOG_ENV: &str = "TB_LOG";

/// Level from `-v` count, unless `TB_LOG` names one.
pub fn level_for(verbosity: u8) -> LevelFilter {
    if let Some(level) = std::env::var(LOG_ENV).ok().and_then(|v| v.trim().parse::<LevelFilter>().ok()) {
        return level;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logs to stderr so stdout stays clean for JSON output.
pub fn setup_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
