use std::process::ExitCode;

use medassist_lib::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    medassist_lib::init_tracing();

    match medassist_lib::run(AppConfig::from_env()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("MedAssist stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
