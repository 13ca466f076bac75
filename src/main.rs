use std::process;

fn main() {
    process::exit(proctor::cli::run());
}
