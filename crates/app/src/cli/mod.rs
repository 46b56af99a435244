use clap::{Parser, Subcommand};
use dukkan_app::database::{self, DatabaseSettings, Db};

mod catalog;
mod db;
mod token;

#[derive(Debug, Parser)]
#[command(name = "dukkan-app", about = "Dukkan admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Catalog(catalog::CatalogCommand),
    Db(db::DbCommand),
    Token(token::TokenCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Catalog(command) => catalog::run(command).await,
            Commands::Db(command) => db::run(command).await,
            Commands::Token(command) => token::run(command).await,
        }
    }
}

/// Open a pool with CLI defaults.
async fn connect(database_url: &str) -> Result<Db, String> {
    let settings = DatabaseSettings::from_url(database_url);

    database::connect(&settings)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}
