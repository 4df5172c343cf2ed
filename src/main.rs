fn main() {
    if let Err(e) = mason::cli::main() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
