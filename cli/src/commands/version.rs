//! Version command

/// Run the version command.
pub fn run() {
    println!("sd-cmd {}", env!("CARGO_PKG_VERSION"));
}
