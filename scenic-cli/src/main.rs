//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = scenic_cli::run() {
        eprintln!("scenic: {err}");
        std::process::exit(1);
    }
}
