//! sus-cli: command line access to the StuffUSell customer API
//!
//! Usage:
//!   sus-cli username-available <username>     Check whether a username is free
//!   sus-cli categories                        List listing categories
//!   sus-cli sales-ticker                      Show the sales ticker
//!   sus-cli shipping-dates                    List available shipping dates
//!   sus-cli login <username> <password>       Log in and print the auth token
//!   sus-cli orders <auth-token>               List the customer's orders
//!   sus-cli invoices <auth-token> [page] [size]
//!   sus-cli status                            Show endpoint, connection and rate limit usage

use anyhow::{bail, Context};
use serde::Serialize;
use stuffusell_client::{CallContext, Configuration, SusClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "version" | "--version" | "-V" => {
            println!("sus-cli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let configuration = Configuration::from_env().context("invalid SUS_* configuration")?;
    let client = SusClient::new(configuration)?;
    let rest = &args[2..];
    let anonymous = CallContext::new();

    match args[1].as_str() {
        "username-available" => {
            let username = arg(rest, 0, "username")?;
            print_json(&client.is_username_available(&anonymous, username).await?)
        }
        "categories" => print_json(&client.categories(&anonymous).await?),
        "sales-ticker" => print_json(&client.sales_ticker(&anonymous).await?),
        "shipping-dates" => print_json(&client.available_shipping_dates(&anonymous).await?),
        "login" => {
            let username = arg(rest, 0, "username")?;
            let password = arg(rest, 1, "password")?;
            print_json(&client.login(&anonymous, username, password).await?)
        }
        "orders" => {
            let ctx = signed_in(rest)?;
            print_json(&client.orders(&ctx).await?)
        }
        "invoices" => {
            let ctx = signed_in(rest)?;
            let page = optional_number(rest, 1, 0)?;
            let size = optional_number(rest, 2, 20)?;
            print_json(&client.invoices(&ctx, page, size).await?)
        }
        "status" => print_json(&client.http().signals().await),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SUS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> anyhow::Result<&'a str> {
    match args.get(index) {
        Some(value) => Ok(value.as_str()),
        None => bail!("missing argument <{name}>"),
    }
}

fn signed_in(args: &[String]) -> anyhow::Result<CallContext> {
    Ok(CallContext::new().with_auth_token(arg(args, 0, "auth-token")?))
}

fn optional_number(args: &[String], index: usize, default: u32) -> anyhow::Result<u32> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("argument {} is not a number: {raw}", index + 1)),
        None => Ok(default),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_usage() {
    println!(
        r#"sus-cli: StuffUSell customer API from the command line

USAGE:
    sus-cli <COMMAND> [ARGS]

COMMANDS:
    username-available <username>       Check whether a username is free
    categories                          List listing categories
    sales-ticker                        Show the sales ticker
    shipping-dates                      List available shipping dates
    login <username> <password>         Log in and print the auth token
    orders <auth-token>                 List the customer's orders
    invoices <auth-token> [page] [size] List invoices (default page 0, size 20)
    status                              Show endpoint, connection and rate limit usage
    version                             Show version information
    help                                Show this help message

ENVIRONMENT:
    SUS_ENDPOINT                        API base URL
    SUS_ACCESS_TOKEN                    Access token (or keyring entry stuffusell/access-token)
    SUS_RPS, SUS_BURST                  Rate limit
    SUS_LOG                             Log filter (e.g. stuffusell_client=debug)"#
    );
}
