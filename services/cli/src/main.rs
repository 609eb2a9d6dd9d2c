fn main() {
    if let Err(err) = dealscope_cli::run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
