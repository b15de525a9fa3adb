use std::process::ExitCode;

use clap::Parser;

use dt_synth::SynthError;

mod cli;
mod logging;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init_tracing(cli.json);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(synth) = err.downcast_ref::<SynthError>() {
                if synth.is_silent() {
                    eprintln!("docthis: {synth}");
                    return ExitCode::SUCCESS;
                }
            }
            eprint!("{}", diagnostic(&err));
            ExitCode::FAILURE
        }
    }
}

/// A report suitable for pasting into an issue.
fn diagnostic(err: &anyhow::Error) -> String {
    let mut report = format!(
        "docthis {} failed on {}-{}\n",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    for (depth, cause) in err.chain().enumerate() {
        report.push_str(&format!("  {depth}: {cause}\n"));
    }
    report
}
