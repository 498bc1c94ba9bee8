use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use labelme2mask::utils::create_progress_bar;
use labelme2mask::{run_batch, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.to_mask_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let output_dir = args.output_dir();
    info!(
        "Rasterizing {} into {} ({} labels, background {})",
        args.input_dir.display(),
        output_dir.display(),
        config.labels.len(),
        config.background
    );

    let pb = create_progress_bar(0, "masks");
    let result = run_batch(&args.input_dir, &output_dir, &config, Some(&pb));
    pb.finish_and_clear();

    match result {
        Ok(stats) => {
            stats.print_summary();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
