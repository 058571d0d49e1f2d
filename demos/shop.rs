//! Shop Example
//!
//! Drives a shop stored as JSON files in a directory.
//!
//! Use `--data-dir` to choose where the `parts.json` and `cart.json` snapshots live
//! Use `--config` to load a YAML shop configuration
//! Use `RUST_LOG=debug` to see every state change

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use partcart::prelude::*;

/// Shop example arguments
#[derive(Debug, Parser)]
struct ShopArgs {
    /// Directory holding the snapshot files
    #[arg(short, long, env = "PARTCART_DATA_DIR", default_value = "target/partcart")]
    data_dir: PathBuf,

    /// YAML configuration file
    #[arg(short, long, env = "PARTCART_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List parts, optionally filtered by name
    List {
        /// Name filter
        query: Option<String>,
    },

    /// Create a part, or update one with `--id`
    Save {
        /// Part name
        name: String,

        /// Unit price
        price: String,

        /// Stock quantity
        quantity: String,

        /// Part to update
        #[arg(long)]
        id: Option<u64>,
    },

    /// Delete a part
    Delete {
        /// Part id
        id: u64,
    },

    /// Add one unit of a part to the cart
    Add {
        /// Part id
        id: u64,
    },

    /// Set the quantity of a cart line
    Set {
        /// Part id
        id: u64,

        /// New quantity
        quantity: u32,
    },

    /// Remove a line from the cart
    Remove {
        /// Part id
        id: u64,
    },

    /// Check out the cart
    Checkout,
}

/// Shop Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = ShopArgs::parse();

    let config = match &args.config {
        Some(path) => ShopConfig::from_path(path)?,
        None => ShopConfig::default(),
    };

    let mut shop = Shop::open(FileStorage::open(&args.data_dir)?, config)?;
    let currency = shop.currency();

    match args.command.unwrap_or(Command::List { query: None }) {
        Command::List { query } => {
            let parts = search(shop.catalog(), query.as_deref().unwrap_or_default());

            println!("{}", part_table(&parts, currency));
            println!("{}", cart_table(shop.cart(), currency)?);

            return Ok(());
        }
        Command::Save {
            name,
            price,
            quantity,
            id,
        } => {
            let mut form = PartForm::new(name, price, quantity);

            if let Some(id) = id {
                form = form.editing(PartId::new(id));
            }

            let part = shop.save_part(&form)?;

            println!("Saved part {} ({})", part.id, part.name);
        }
        Command::Delete { id } => {
            shop.delete_part(PartId::new(id))?;
        }
        Command::Add { id } => {
            shop.add_to_cart(PartId::new(id))?;
        }
        Command::Set { id, quantity } => {
            shop.set_quantity(PartId::new(id), quantity)?;
        }
        Command::Remove { id } => {
            shop.remove_from_cart(PartId::new(id))?;
        }
        Command::Checkout => {
            let receipt = shop.checkout()?;

            println!("{}", receipt.confirmation(currency));

            return Ok(());
        }
    }

    println!("{}", catalog_table(shop.catalog(), currency));
    println!("{}", cart_table(shop.cart(), currency)?);

    Ok(())
}
