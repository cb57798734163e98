use std::path::Path;

/// Route `log` records to stderr, and to `log_file` when given.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<(), String> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                humantime::format_rfc3339_seconds(std::time::SystemTime::now()),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = log_file {
        let file_logger = fern::log_file(path)
            .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;
        dispatch = dispatch.chain(file_logger);
    }

    dispatch
        .apply()
        .map_err(|e| format!("Failed to initialize logger: {}", e))
}
