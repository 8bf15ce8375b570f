//! mouth_letters — interactive entry point.

use log::error;
use mouth_letters::app::{run, AppConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Mouth Letters — open wide, spit out glyphs          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Mode: simulated face  (mouse moves, hold Space to open)");
    println!("  F = drop the face   K = keypoints   Q / Esc = quit");
    println!();

    if let Err(e) = run(AppConfig::default()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
