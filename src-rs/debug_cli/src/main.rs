mod cli;
mod client;
mod models;
mod render;
mod repl;

use client::HTTPClient;
use repl::Repl;

fn main() {
    let config = cli::parse_config();
    let client = HTTPClient::new(&config.base_url);
    let mut repl = Repl::new(config, client);
    repl.run();
}
