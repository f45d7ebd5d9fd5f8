//! llamac entry point.

fn main() {
    env_logger::init();
    std::process::exit(llamac::cli::run_cli());
}
