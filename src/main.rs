pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod download;
pub mod feed;

fn main() -> anyhow::Result<()> {
    cli::run()
}
