fn main() {
    if let Err(err) = roster_sort::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
