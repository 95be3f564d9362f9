fn main() {
    if let Err(err) = co2_emissions::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
