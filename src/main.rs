use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = cybersaver::cli::Cli::parse();
    cybersaver::logging::install(cli.verbose);

    if let Err(err) = cybersaver::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
