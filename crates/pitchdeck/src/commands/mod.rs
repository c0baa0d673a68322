pub mod completion;
pub mod config;
pub mod export;
pub mod links;
pub mod prepare_html;
pub mod qr;
pub mod resolve;

use colored::Colorize;

pub fn print_version() {
    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").bold(),
        env!("CARGO_PKG_VERSION").cyan()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION").dimmed());
}
