//! crypto-price: print the USD price of one crypto currency. Always exits 0.

use clap::Parser;
use url2epub::config::{load_config, Config};
use url2epub::price::{render_quote, PriceClient, DEFAULT_SYMBOL};

#[derive(Parser, Debug)]
#[command(name = "crypto-price")]
#[command(about = "Print the USD price of a crypto currency")]
struct Args {
    /// Currency symbol, e.g. BTC or ETH (case-insensitive).
    #[arg(default_value = DEFAULT_SYMBOL)]
    symbol: String,

    /// Debug logging.
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    url2epub::logging::init_logging(args.verbose);
    let symbol = args.symbol.trim().to_ascii_uppercase();

    let config = match load_config() {
        Ok(c) => c.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            Config::default()
        }
    };

    let result = PriceClient::from_config(&config).and_then(|client| client.usd_price(&symbol));
    if let Err(e) = &result {
        tracing::warn!(symbol = %symbol, error = %e, "price lookup failed");
    }
    println!("{}", render_quote(&symbol, &result));
}
