//! Frog storefront command line.
//!
//! ```bash
//! frog register --first-name Jan --last-name Kowalski --email jan@example.com --password hunter2
//! frog products list --search drinks
//! frog products add --name Cola --category Drinks --price 3.49 --stock 120
//! frog buy --id 1000 --password hunter2 P001=2 P002=1
//! frog history --id 1000 --password hunter2
//! ```
//!
//! Stores live under `--data-dir`, or wherever `FROG_DATA_DIR` points
//! (see [`StoreConfig::from_env`]). Log verbosity comes from `FROG_LOG`.

use std::error::Error;
use std::path::PathBuf;
use std::process;

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use frog::{Cart, DeleteBy, Product, RemoveBy, Shop, StoreConfig};

const GUEST_ID: &str = "GUEST";

#[derive(Parser)]
#[command(name = "frog")]
#[command(author, version, about = "Frog storefront")]
struct Cli {
    /// Directory holding customers.csv, products.csv and ledger/
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a customer account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// 9 digits
        #[arg(long)]
        phone: Option<String>,
    },
    /// Check a customer id and password
    Login {
        #[arg(long)]
        id: String,
        #[arg(long)]
        password: String,
    },
    /// Browse and manage the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Check out a cart of PRODUCT=QTY items and print the receipt
    Buy {
        #[arg(long, required_unless_present = "guest")]
        id: Option<String>,
        #[arg(long, required_unless_present = "guest")]
        password: Option<String>,
        /// Check out without an account
        #[arg(long, conflicts_with_all = ["id", "password"])]
        guest: bool,
        #[arg(required = true, value_parser = parse_item)]
        items: Vec<(String, u32)>,
    },
    /// Show a customer's purchase history
    History {
        #[arg(long)]
        id: String,
        #[arg(long)]
        password: String,
    },
    /// Edit account details
    Account {
        #[arg(long)]
        id: String,
        /// Current password
        #[arg(long)]
        password: String,
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Manage customer records
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products sorted by name
    List {
        /// Only products whose id, name or category contain this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a product; the id defaults to the next free P### number
    Add {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        stock: u32,
    },
    /// Remove products by id or name (tries id first, then name, when --by is omitted)
    Remove {
        key: String,
        #[arg(long, value_enum)]
        by: Option<ProductKey>,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    SetPhone { phone: String },
    SetEmail { email: String },
    SetPassword { new_password: String },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// List customers, optionally only those with a given last name
    List {
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Delete customers by id or last name (ledgers are kept)
    Delete {
        key: String,
        #[arg(long, value_enum, default_value_t = CustomerKey::Id)]
        by: CustomerKey,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProductKey {
    Id,
    Name,
}

#[derive(Clone, Copy, ValueEnum)]
enum CustomerKey {
    Id,
    LastName,
}

fn parse_item(item: &str) -> Result<(String, u32), String> {
    let (id, qty) = item
        .split_once('=')
        .ok_or_else(|| format!("expected PRODUCT=QTY, got {item:?}"))?;
    let qty = qty
        .parse()
        .map_err(|_| format!("invalid quantity in {item:?}"))?;
    Ok((id.to_string(), qty))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FROG_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match cli.data_dir {
        Some(dir) => StoreConfig::new(dir),
        None => StoreConfig::from_env(),
    };
    let shop = Shop::new(&config);

    match cli.command {
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            phone,
        } => {
            let id = shop.register(&first_name, &last_name, &email, &password, phone.as_deref())?;
            println!("Registered customer {id}");
        }
        Commands::Login { id, password } => {
            login(&shop, &id, &password)?;
            println!("Logged in as {id}");
        }
        Commands::Products { action } => products(&shop, action)?,
        Commands::Buy {
            id,
            password,
            guest,
            items,
        } => {
            let customer_id = match (guest, id, password) {
                (false, Some(id), Some(password)) => {
                    login(&shop, &id, &password)?;
                    id
                }
                _ => GUEST_ID.to_string(),
            };
            let cart = Cart::from_pairs(items)?;
            let at = Local::now().naive_local();
            let purchased = shop.purchase_at(&customer_id, cart, at)?;
            println!("{}", shop.receipt(&customer_id, &purchased, at)?);
        }
        Commands::History { id, password } => {
            login(&shop, &id, &password)?;
            let rows = shop.history(&id)?;
            if rows.is_empty() {
                println!("No purchases yet.");
            }
            for row in rows {
                println!("{row}");
            }
        }
        Commands::Account {
            id,
            password,
            action,
        } => {
            login(&shop, &id, &password)?;
            match action {
                AccountAction::SetPhone { phone } => shop.update_phone(&id, &phone)?,
                AccountAction::SetEmail { email } => shop.update_email(&id, &email)?,
                AccountAction::SetPassword { new_password } => {
                    shop.update_password(&id, &new_password)?
                }
            }
            println!("Account {id} updated");
        }
        Commands::Customers {
            action: CustomerAction::List { last_name },
        } => {
            let customers = shop.filter_customers(|c| {
                last_name
                    .as_deref()
                    .map_or(true, |name| c.last_name.eq_ignore_ascii_case(name))
            })?;
            for c in customers {
                println!(
                    "{}\t{} {}\t{}\t{}\t{}",
                    c.id,
                    c.first_name,
                    c.last_name,
                    c.email,
                    c.registration_date,
                    c.phone.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Customers {
            action: CustomerAction::Delete { key, by },
        } => {
            let by = match by {
                CustomerKey::Id => DeleteBy::Id,
                CustomerKey::LastName => DeleteBy::LastName,
            };
            let removed = shop.delete_customer(&key, by)?;
            println!("Deleted {removed} customer(s)");
        }
    }
    Ok(())
}

fn login(shop: &Shop, id: &str, password: &str) -> Result<(), Box<dyn Error>> {
    if !shop.authenticate(id, password) {
        return Err("invalid customer id or password".into());
    }
    Ok(())
}

fn products(shop: &Shop, action: ProductAction) -> Result<(), Box<dyn Error>> {
    match action {
        ProductAction::List { search } => {
            let mut products = match search {
                Some(query) => shop.search_products(&query)?,
                None => shop.list_products()?,
            };
            products.sort_by(|a, b| a.name.cmp(&b.name));
            for p in products {
                println!("{}\t{}\t{}\t{:.2}\t{}", p.id, p.name, p.category, p.price, p.stock);
            }
        }
        ProductAction::Add {
            id,
            name,
            category,
            price,
            stock,
        } => {
            let id = match id {
                Some(id) => id,
                None => shop.next_product_id()?,
            };
            shop.add(Product {
                id: id.clone(),
                name: name.clone(),
                category,
                price,
                stock,
            })?;
            println!("Added {name} (ID: {id})");
        }
        ProductAction::Remove { key, by } => {
            let removed = match by {
                Some(ProductKey::Id) => shop.remove(&key, RemoveBy::Id)?,
                Some(ProductKey::Name) => shop.remove(&key, RemoveBy::Name)?,
                None => match shop.remove(&key, RemoveBy::Id) {
                    Err(frog::Error::NotFound(_)) => shop.remove(&key, RemoveBy::Name)?,
                    other => other?,
                },
            };
            println!("Removed {removed} product(s)");
        }
    }
    Ok(())
}
