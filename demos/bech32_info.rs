extern crate bech32_info;
extern crate env_logger;

use std::env;
use std::process;

use bech32_info::analyze;

/// Prints the wire report of every argument, one JSON object per line.
///
/// Set `RUST_LOG=debug` to see why a string failed to parse.
fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: bech32_info <bech32 string>...");
        process::exit(2);
    }

    let mut all_ok = true;
    for arg in &args {
        let report = analyze(arg);
        all_ok &= report.is_ok();
        println!("{}", report.to_json());
    }
    if !all_ok {
        process::exit(1);
    }
}
