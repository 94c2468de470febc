fn main() {
    if let Err(err) = interval_capture::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
