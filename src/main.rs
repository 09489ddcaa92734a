use bm_runner::ApplicationError;
use log::{LevelFilter, error};

fn main() {
    let res = bm_runner::cli::run();
    if let Err(err) = res {
        let severity = match err.downcast_ref::<ApplicationError>() {
            Some(app_err) if app_err.is_fatal() => "FATAL",
            _ => "Error",
        };
        // The logger may not be initialized yet if the failure happened early
        if log::max_level() == LevelFilter::Off {
            eprintln!("{severity}: {err:#}");
        } else {
            error!("{severity}: {err:#}");
        }
        std::process::exit(1);
    }
}
