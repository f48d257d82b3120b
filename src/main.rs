use std::process::ExitCode;

fn main() -> ExitCode {
    match schoa_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("SCHOA failed: {e}");
            ExitCode::FAILURE
        }
    }
}
