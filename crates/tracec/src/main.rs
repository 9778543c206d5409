//! tracec CLI
//!
//! Renders a captured call stack as an HTML table or console statements.

use tracec::cli::{run, CliError};

fn main() {
    tracec::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", tracec::cli::USAGE);
        return;
    }

    match run(&args) {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(err @ CliError::Usage(_)) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
