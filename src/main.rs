//! Stockroom CLI - command-line front end for the item inventory

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stockroom::config::{self, StockroomConfig};
use stockroom::ui::{self, Icons};
use stockroom::{InventoryClient, NewItem};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(version)]
#[command(about = "Single-user item inventory backed by SQLite")]
#[command(long_about = r#"
Stockroom keeps a small inventory of items with their price, quantity and
supplier contact details.

Example usage:
  stockroom dummy
  stockroom list
  stockroom sell --id 1
  stockroom type --uri content://com.example.stockroom/items/1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a stockroom.toml in the current directory
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// List every item
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one item
    Show {
        #[arg(long)]
        id: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Add a new item
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        quantity: i64,
        /// Image reference (free text)
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        supplier_name: String,
        #[arg(long)]
        supplier_phone: String,
        #[arg(long)]
        supplier_mail: String,
    },

    /// Sell one unit of an item
    Sell {
        #[arg(long)]
        id: i64,
    },

    /// Receive stock for an item
    Receive {
        #[arg(long)]
        id: i64,
        #[arg(long, default_value = "1")]
        amount: i64,
    },

    /// Delete one item
    Delete {
        #[arg(long)]
        id: i64,
    },

    /// Delete every item
    Clear,

    /// Insert a sample item
    Dummy,

    /// Print the MIME type of a resource URI
    Type {
        #[arg(long)]
        uri: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Commands::Init { force } = cli.command {
        let path = cli.config.unwrap_or_else(config::default_config_path);
        let contents = StockroomConfig {
            database: Some(format!(".stockroom/{}", stockroom::storage::schema::DATABASE_NAME)),
        };
        config::write_config(&path, &contents, force)?;
        ui::success(&format!("Wrote {}", path.display()));
        return Ok(());
    }

    let loaded = config::load_config(cli.config.as_deref())?;
    let database = config::resolve_database_path(cli.database.as_deref(), loaded.as_ref(), Path::new("."));
    config::ensure_db_dir(&database)?;
    tracing::debug!("Using database {}", database.display());
    let client = InventoryClient::open(&database)?;

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),

        Commands::List { json } => {
            let items = client.items()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                ui::info("Inventory", "empty (try `stockroom dummy`)");
            } else {
                println!("{}", ui::item_table(&items));
            }
        }

        Commands::Show { id, json } => {
            let Some(item) = client.get_item(id)? else {
                anyhow::bail!("No item with id {}", id);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&item)?);
            } else {
                ui::item_detail(&item);
            }
        }

        Commands::Add {
            name,
            price,
            quantity,
            image,
            supplier_name,
            supplier_phone,
            supplier_mail,
        } => {
            let item = NewItem {
                name,
                price,
                quantity,
                image,
                supplier_name,
                supplier_phone,
                supplier_mail,
            };
            match client.create_item(&item)? {
                Some(id) => ui::success(&format!("{} Saved item #{}", Icons::NEW, id)),
                None => anyhow::bail!("Error with saving item"),
            }
        }

        Commands::Sell { id } => {
            let Some(item) = client.get_item(id)? else {
                anyhow::bail!("No item with id {}", id);
            };
            if item.quantity == 0 {
                ui::warn(&format!("{} is sold out", item.name));
                return Ok(());
            }
            client.adjust_quantity(id, -1)?;
            println!("{} {} now {}", Icons::DOWN, item.name, ui::quantity_label(item.quantity - 1));
        }

        Commands::Receive { id, amount } => {
            if amount <= 0 {
                anyhow::bail!("--amount must be positive");
            }
            if client.adjust_quantity(id, amount)? == 0 {
                anyhow::bail!("No item with id {}", id);
            }
            println!("{} Received {} for item #{}", Icons::UP, amount, id);
        }

        Commands::Delete { id } => {
            if client.delete_one(id)? == 0 {
                ui::warn(&format!("No item with id {}", id));
            } else {
                println!("{} Deleted item #{}", Icons::DEL, id);
            }
        }

        Commands::Clear => {
            let rows = client.delete_all()?;
            println!("{} Deleted {} item(s)", Icons::DEL, rows);
        }

        Commands::Dummy => match client.insert_dummy()? {
            Some(id) => ui::success(&format!("Inserted sample item #{}", id)),
            None => anyhow::bail!("Error with inserting sample item"),
        },

        Commands::Type { uri } => {
            println!("{}", client.provider().get_type(&uri)?);
        }
    }

    Ok(())
}
