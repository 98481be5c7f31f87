use pattern_params::{builtin, cli};
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout carries JSON only; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let command_line_interface = cli::CommandLineInterface::load();
    let result = builtin::registry()
        .map_err(anyhow::Error::from)
        .and_then(|registry| command_line_interface.run(&registry));
    if let Err(error) = result {
        eprintln!("[error] {error:#}");
        std::process::exit(1);
    }
}
