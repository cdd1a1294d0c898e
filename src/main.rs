fn main() {
    if let Err(error) = transcribe_tool::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
