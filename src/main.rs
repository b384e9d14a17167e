fn main() {
    std::process::exit(pcqueue::app::startup::startup());
}
