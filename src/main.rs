use crate::cli::run;

pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod services;
pub mod session;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
