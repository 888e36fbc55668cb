//! `mindmap`: work with a stored mind map from the command line.
//!
//! The store is a directory holding one file per key (`mindMapState`,
//! `gemini_api_key`), the same records the browser keeps in `localStorage`.

mod cli;

use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = cli::Cli::parse();
    if let Err(e) = cli::run(args) {
        eprintln!("mindmap: {e}");
        std::process::exit(1);
    }
}
