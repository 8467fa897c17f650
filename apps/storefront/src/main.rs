//! # Storefront CLI
//!
//! Drives the storefront services from the command line.
//!
//! ## Usage
//! ```bash
//! storefront menu
//! storefront detail <food_id> 2
//! storefront --user user-1 add <food_id> 2
//! storefront --user user-1 cart
//! storefront --user user-1 checkout --name "Asha Rao" --phone 9876543210 \
//!     --address "12 MG Road" --payment upi
//! ```
//!
//! Results are printed to stdout as pretty JSON. Failures print the
//! `ApiError` JSON to stderr and exit with status 1.

use std::env;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use storefront::{ApiError, ApiResult, Session, Storefront, StorefrontConfig};
use thali_core::order::CheckoutDetails;
use thali_core::PaymentMode;
use thali_db::{Database, DbConfig};

/// A parsed command line.
#[derive(Debug, PartialEq)]
struct Cli {
    user: Option<String>,
    command: Command,
}

#[derive(Debug, PartialEq)]
enum Command {
    Menu,
    Categories,
    Search(String),
    Category(String),
    Detail { food_id: String, quantity: i64 },
    Add { food_id: String, quantity: i64 },
    Cart,
    Increment(String),
    Decrement(String),
    Remove(String),
    /// `checkout` with no form flags shows the checkout summary.
    Prepare,
    Checkout(CheckoutForm),
    Orders,
    Order(String),
    Help,
}

/// Checkout flags; the payment mode falls back to the configured default.
#[derive(Debug, Default, PartialEq)]
struct CheckoutForm {
    full_name: String,
    phone: String,
    address: String,
    payment_mode: Option<PaymentMode>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    if cli.command == Command::Help {
        print_usage();
        return Ok(ExitCode::SUCCESS);
    }

    storefront::init_tracing();

    let mut config = StorefrontConfig::load()?;
    if let Some(user) = cli.user {
        config.user_id = Some(user);
    }

    let session = match session_for(config.user_id.as_deref()) {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e.message, "Rejected user id");
            return print_error(&e);
        }
    };

    if let Some(dir) = config.database_path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
    }

    let db = Database::new(
        DbConfig::new(config.database_path.clone()).max_connections(config.max_connections),
    )
    .await
    .context("opening the storefront database")?;
    info!(path = ?config.database_path, "Database connected and migrations applied");

    let storefront = Storefront::new(db.clone(), &config);

    let result = run(&storefront, session.as_ref(), cli.command, config.default_payment_mode).await;
    db.close().await;

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => print_error(&e),
    }
}

fn print_error(e: &ApiError) -> anyhow::Result<ExitCode> {
    eprintln!("{}", serde_json::to_string_pretty(e)?);
    Ok(ExitCode::FAILURE)
}

/// No user id means no session; a malformed one is reported, not dropped.
fn session_for(user_id: Option<&str>) -> ApiResult<Option<Session>> {
    user_id.map(Session::new).transpose()
}

/// Executes one command against the services.
async fn run(
    storefront: &Storefront,
    session: Option<&Session>,
    command: Command,
    default_payment_mode: PaymentMode,
) -> ApiResult<Value> {
    match command {
        Command::Menu => json(storefront.catalog().menu().await?),
        Command::Categories => json(storefront.catalog().categories().await?),
        Command::Search(query) => json(storefront.catalog().search(&query).await?),
        Command::Category(name) => json(storefront.catalog().by_category(&name).await?),
        Command::Detail { food_id, quantity } => {
            json(storefront.catalog().item_detail(&food_id, quantity).await?)
        }
        Command::Add { food_id, quantity } => {
            json(storefront.cart().add_to_cart(session, &food_id, quantity).await?)
        }
        Command::Cart => json(storefront.cart().view(session).await?),
        Command::Increment(line_id) => json(storefront.cart().increment(session, &line_id).await?),
        Command::Decrement(line_id) => json(storefront.cart().decrement(session, &line_id).await?),
        Command::Remove(line_id) => json(storefront.cart().remove(session, &line_id).await?),
        Command::Prepare => json(storefront.checkout().prepare(session).await?),
        Command::Checkout(form) => {
            let details = CheckoutDetails {
                full_name: form.full_name,
                phone: form.phone,
                address: form.address,
                payment_mode: form.payment_mode.unwrap_or(default_payment_mode),
            };
            json(storefront.checkout().place_order(session, &details).await?)
        }
        Command::Orders => json(storefront.checkout().orders(session).await?),
        Command::Order(order_id) => json(storefront.checkout().order(session, &order_id).await?),
        Command::Help => Ok(Value::Null),
    }
}

fn json<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(format!("Serialization failed: {}", e)))
}

// =============================================================================
// Argument Parsing
// =============================================================================

fn parse_args(args: &[String]) -> anyhow::Result<Cli> {
    let mut user = None;
    let mut rest: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--user" | "-u" => {
                user = Some(value_after(args, i, "--user")?.to_string());
                i += 1;
            }
            "--help" | "-h" => {
                return Ok(Cli {
                    user,
                    command: Command::Help,
                })
            }
            other => rest.push(other),
        }
        i += 1;
    }

    let Some((name, operands)) = rest.split_first() else {
        return Ok(Cli {
            user,
            command: Command::Help,
        });
    };

    let command = match *name {
        "menu" => Command::Menu,
        "categories" => Command::Categories,
        "search" => Command::Search(operands.join(" ")),
        "category" => Command::Category(operands.join(" ")),
        "detail" => Command::Detail {
            food_id: operand(operands, 0, "food_id")?,
            quantity: quantity(operands)?,
        },
        "add" => Command::Add {
            food_id: operand(operands, 0, "food_id")?,
            quantity: quantity(operands)?,
        },
        "cart" => Command::Cart,
        "inc" => Command::Increment(operand(operands, 0, "line_id")?),
        "dec" => Command::Decrement(operand(operands, 0, "line_id")?),
        "remove" => Command::Remove(operand(operands, 0, "line_id")?),
        "checkout" if operands.is_empty() => Command::Prepare,
        "checkout" => Command::Checkout(checkout_form(operands)?),
        "orders" => Command::Orders,
        "order" => Command::Order(operand(operands, 0, "order_id")?),
        "help" => Command::Help,
        other => bail!("Unknown command '{}'; try --help", other),
    };

    Ok(Cli { user, command })
}

fn checkout_form(operands: &[&str]) -> anyhow::Result<CheckoutForm> {
    let mut form = CheckoutForm::default();

    let mut i = 0;
    while i < operands.len() {
        let flag = operands[i];
        let value = operands
            .get(i + 1)
            .ok_or_else(|| anyhow!("{} needs a value", flag))?
            .to_string();
        match flag {
            "--name" => form.full_name = value,
            "--phone" => form.phone = value,
            "--address" => form.address = value,
            "--payment" => form.payment_mode = Some(value.parse()?),
            other => bail!("Unknown checkout option '{}'", other),
        }
        i += 2;
    }

    Ok(form)
}

fn value_after<'a>(args: &'a [String], i: usize, flag: &str) -> anyhow::Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} needs a value", flag))
}

fn operand(operands: &[&str], index: usize, name: &str) -> anyhow::Result<String> {
    operands
        .get(index)
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("Missing <{}>", name))
}

/// Optional second operand, default 1.
fn quantity(operands: &[&str]) -> anyhow::Result<i64> {
    match operands.get(1) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Quantity must be a whole number, got '{}'", raw)),
        None => Ok(1),
    }
}

fn print_usage() {
    println!("Thali Storefront");
    println!();
    println!("Usage: storefront [--user <ID>] <COMMAND>");
    println!();
    println!("Catalog:");
    println!("  menu                          Available foods with card prices");
    println!("  categories                    Menu categories");
    println!("  search <query>                Search name, category and description");
    println!("  category <name>               Foods in one category");
    println!("  detail <food_id> [qty]        Price breakdown for a quantity");
    println!();
    println!("Cart (needs --user or THALI_USER_ID):");
    println!("  add <food_id> [qty]           Put a food in the cart (replaces quantity)");
    println!("  cart                          Show the cart with totals");
    println!("  inc <line_id>                 Quantity +1");
    println!("  dec <line_id>                 Quantity -1 (never below 1)");
    println!("  remove <line_id>              Remove a line");
    println!();
    println!("Checkout (needs --user or THALI_USER_ID):");
    println!("  checkout                      Show the checkout summary");
    println!("  checkout --name <NAME> --phone <PHONE> --address <ADDRESS> [--payment cod|card|upi]");
    println!("  orders                        Order history");
    println!("  order <order_id>              One order");
    println!();
    println!("Environment: THALI_DB_PATH, THALI_DB_MAX_CONNECTIONS,");
    println!("             THALI_DEFAULT_PAYMENT_MODE, THALI_USER_ID, RUST_LOG");
}
