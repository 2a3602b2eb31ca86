/// Core library crate — primitives shared by every subsystem of the world
/// server: coordinate math, wire byte-order helpers, guid tagging, and the
/// spatial constants the grid/cell layer is built on.
use log::{LevelFilter, SetLoggerError};
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

pub mod byte_operations;
pub mod constants;
pub mod types;

/// Configure the global `log` logger with a stderr appender and, optionally,
/// a plain file appender. Call once at process startup.
pub fn initialize_logger(
    log_level: LevelFilter,
    file_path: Option<&str>,
) -> Result<(), SetLoggerError> {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();

    let mut config_builder = Config::builder();

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {l} - {m}\n")))
            .build(path)
            .unwrap();

        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
    }

    config_builder = config_builder.appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(log_level)))
            .build("stderr", Box::new(stderr)),
    );

    let mut root_builder = Root::builder().appender("stderr");
    if file_path.is_some() {
        root_builder = root_builder.appender("logfile");
    }

    let config = config_builder.build(root_builder.build(log_level)).unwrap();

    log4rs::init_config(config)?;
    Ok(())
}
