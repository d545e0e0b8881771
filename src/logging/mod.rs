pub mod run_log;

use log::LevelFilter;

pub fn init_console(verbose: bool) {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new().filter_level(log_level).init();
}
