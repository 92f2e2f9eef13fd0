fn main() {
    if let Err(err) = postseason_brackets::run() {
        eprintln!("postseason-brackets: {err}");
        std::process::exit(1);
    }
}
