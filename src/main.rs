use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    if let Err(err) = protogen::cli::run_cli() {
        eprintln!("Failed to generate protobuf TypeScript types:");
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
