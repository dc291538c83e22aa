fn main() {
    use clap::Parser;
    use std::error::Error;
    let args = url2epub::cli::Args::parse();
    url2epub::logging::init_logging(args.verbose);
    match url2epub::cli::run(&args) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            eprintln!("{}", e);
            if args.verbose {
                let mut source = e.source();
                while let Some(s) = source {
                    eprintln!("  cause: {}", s);
                    source = s.source();
                }
            }
            std::process::exit(e.exit_code());
        }
    }
}
