use std::process::ExitCode;

fn main() -> ExitCode {
    tmagen_lib::run()
}
