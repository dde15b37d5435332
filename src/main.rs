use clap::Parser;

use sshsnare::config::{Cli, Settings};

#[tokio::main]
async fn main() {
    let settings = Settings::from(Cli::parse());

    let exit_code = {
        // Present only with --log-dir; dropping it flushes the log file
        let _guard = sshsnare::logging::init_logging(settings.log_dir.clone());

        tracing::info!("Starting sshsnare on ports {}", settings.ports);

        match sshsnare::app::run(settings).await {
            Ok(written) => {
                tracing::info!("Record stream closed after {} records", written);
                0
            }
            Err(e) => {
                tracing::error!("{}", e);
                e.exit_code()
            }
        }
    };

    std::process::exit(exit_code);
}
