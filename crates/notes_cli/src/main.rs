use anyhow::Result;
use clap::Parser;
use flexi_logger::Logger;
use notes_cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Logs go to stderr so stdout stays clean for --json.
    let _logger = Logger::try_with_env_or_str(level)?.start()?;

    let stdout = std::io::stdout();
    notes_cli::run(args, &mut stdout.lock())
}
