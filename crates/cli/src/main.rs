use std::process::ExitCode;

fn main() -> ExitCode {
    shelfscan_cli::run()
}
