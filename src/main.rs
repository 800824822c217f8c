use std::process::ExitCode;

fn main() -> ExitCode {
    match clipbridge_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("clipbridge: {err:#}");
            ExitCode::FAILURE
        }
    }
}
