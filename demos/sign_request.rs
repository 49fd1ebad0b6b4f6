//! Print the headers a request would carry, without sending it.

use std::env;

use spirius::{Credentials, SignatureFormat, SignedRequestBuilder, UnixTimestamp};

fn main() {
    let args: Vec<String> = env::args().collect();
    if !(5..=6).contains(&args.len()) {
        eprintln!("usage: sign_request <shared_key> <username> <timestamp> <json_body> [--literal-escape]");
        std::process::exit(2);
    }

    let credentials = Credentials::new(&args[1], &args[2]).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(2);
    });
    let timestamp: u64 = args[3].parse().unwrap_or_else(|_| {
        eprintln!("invalid timestamp: {}", args[3]);
        std::process::exit(2);
    });
    let format = match args.get(5).map(String::as_str) {
        None => SignatureFormat::Standard,
        Some("--literal-escape") => SignatureFormat::LiteralEscape,
        Some(other) => {
            eprintln!("unknown flag: {other}");
            std::process::exit(2);
        }
    };

    let headers = SignedRequestBuilder::new(&credentials)
        .format(format)
        .sign(UnixTimestamp::new(timestamp), args[4].as_bytes())
        .unwrap_or_else(|err| {
            eprintln!("{err}");
            std::process::exit(1);
        });
    for (name, value) in headers.to_pairs() {
        println!("{name}: {value}");
    }
}
