use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{
    catalog, config, controller::Controller, favorites::FavoritesStore, http::server::HttpServer,
    render,
};

#[derive(Parser)]
#[command(name = "trackgrid")]
#[command(author = "Sasha Pak")]
#[command(version = "0.1")]
#[command(about = "Music search and preview widget")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the http server hosting the widget
    Serve,
    /// One-shot catalog search printed to stdout
    Search {
        query: String,
        /// Max results to fetch
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List favorite track ids
    Favorites,
}

/// Entrypoint for CLI
pub fn run() {
    env_logger::init();

    let cli = Cli::parse();

    let cfg = config::Config::load(cli.config.to_str().unwrap()).unwrap();

    match &cli.command {
        Commands::Serve {} => {
            println!("Starting HTTP server...");

            let catalog =
                catalog::from_config(&cfg.catalog).expect("Failed to initialize catalog client");
            let favorites = FavoritesStore::load(&cfg.favorites.path);
            let controller = Controller::new(catalog, favorites, cfg.catalog.default_limit);

            let http_server = HttpServer::new(controller, cfg.http);

            println!(
                "Widget running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }

        Commands::Search { query, limit } => {
            let query = query.trim();
            if query.is_empty() {
                println!("{}", render::PROMPT_EMPTY_QUERY);
                return;
            }

            let catalog =
                catalog::from_config(&cfg.catalog).expect("Failed to initialize catalog client");
            let favorites = FavoritesStore::load(&cfg.favorites.path);

            let limit = effective_limit(*limit, cfg.catalog.default_limit);

            match catalog.search(query, limit) {
                Ok(tracks) => {
                    if tracks.is_empty() {
                        println!("{}", render::STATUS_NO_RESULTS);
                    }

                    for track in tracks {
                        let marker = if favorites.is_favorite(track.id) {
                            "★"
                        } else {
                            " "
                        };

                        println!("{} {}", marker, track.title);
                        println!("    {} • {}", track.artist, track.album);
                        println!("    preview: {}", track.preview_url);
                    }
                }

                Err(e) => {
                    log::error!("search {query:?} failed: {e}");
                    println!("{}", render::STATUS_FETCH_ERROR);
                }
            }
        }

        Commands::Favorites {} => {
            let favorites = FavoritesStore::load(&cfg.favorites.path);

            if favorites.ids().is_empty() {
                println!("No favorites saved yet");
            }

            for id in favorites.ids() {
                println!("  - {}", id);
            }
        }
    }
}

/// A zero or absent --limit falls back to the configured default,
/// same as the search endpoint.
fn effective_limit(flag: Option<u32>, default: u32) -> u32 {
    flag.filter(|&limit| limit > 0).unwrap_or(default)
}
