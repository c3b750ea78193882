use {clap::Parser, std::process::ExitCode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Existing environment variables take precedence over the `.env` file.
    dotenvy::dotenv().ok();
    let args = match anchor_deployer::arguments::Arguments::try_parse() {
        Ok(args) => args,
        // `--help` and `--version` are not errors.
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    observe::tracing::initialize(&args.logging.config());
    tracing::info!("running deployer with validated arguments:\n{}", args);

    match anchor_deployer::run(args, &mut std::io::stdout().lock()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(?err, "deployment failed");
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
