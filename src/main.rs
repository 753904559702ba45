use fuel_stats::logging::*;
use fuel_stats::{config, storage, web};

#[tokio::main]
async fn main() {
    let log = DEFAULT.new(o!("function" => "main"));
    info!(log, "Starting up");
    report_level(&log);

    let source = match storage::from_config() {
        Ok(source) => source,
        Err(err) => {
            crit!(log, "no usable fuel log source"; "error" => %err);
            std::process::exit(1);
        }
    };
    info!(log, "fuel log source"; "source" => source.describe());

    let port = config::get("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    let state = web::AppState::new(source);
    match web::run(state, port).await {
        Ok(_) => info!(log, "shutting down"),
        Err(err) => {
            error!(log, "shutting down: {:?}", err);
            std::process::exit(1);
        }
    }
}
