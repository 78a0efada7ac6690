use brrtcors::cli::{run_cli, Cli};
use brrtcors::otel;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logging = otel::init_logging(&cli.log_level)?;
    run_cli(cli)
}
