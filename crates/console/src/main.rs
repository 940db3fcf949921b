//! `counterdesk` command-line entry point.

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result, bail};

#[cfg(not(target_arch = "wasm32"))]
use counterdesk_auth::Credentials;
#[cfg(not(target_arch = "wasm32"))]
use counterdesk_console::{ApiClient, Console, ConsoleConfig, ConsoleError, storage::FileStore};

#[cfg(not(target_arch = "wasm32"))]
const USAGE: &str = "usage: counterdesk <status | login <username> <password> | logout | dashboard | cart [clear] | open <path>>";

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    let config = ConsoleConfig::from_env().context("loading configuration")?;
    counterdesk_observability::init(&config.log);

    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let api = ApiClient::new(config.api_url.clone());
    let mut console = Console::restore(store, api);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["status"] => print_status(&mut console)?,
        ["login", username, password] => {
            let credentials = Credentials::new(*username, *password);
            let outcome = match console.login(&credentials).await {
                Ok(outcome) => outcome,
                Err(ConsoleError::Invalid(err)) => bail!("{}", err.message()),
                Err(err) => return Err(err).context("login failed"),
            };
            println!("signed in as {username}, now at {}", outcome.landed);
        }
        ["logout"] => {
            let outcome = console.logout()?;
            println!("signed out, now at {}", outcome.landed);
        }
        ["dashboard"] => {
            let dashboard = console.dashboard().await.context("loading dashboard")?;
            println!("products: {}", dashboard.total_products);
            println!("users:    {}", dashboard.total_users);
            println!("sales:    {}", dashboard.total_sales);
            println!("revenue:  {}", dashboard.total_revenue);
            println!("profit:   {}", dashboard.total_profit);
        }
        ["cart"] => print_cart(&console),
        ["cart", "clear"] => {
            if console.cart_mut().clear_cart() {
                println!("cart cleared");
            } else {
                println!("cart already empty");
            }
        }
        ["open", path] => {
            let outcome = console.navigate_path(path)?;
            if outcome.was_redirected() {
                println!("{} -> {}", outcome.requested, outcome.landed);
            } else {
                println!("{}", outcome.landed);
            }
        }
        _ => bail!("{USAGE}"),
    }

    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn print_status(console: &mut Console<FileStore, ApiClient>) -> Result<()> {
    let landed = console.start()?.landed;
    println!("api:      {}", console.api().base_url());
    match console.identity() {
        Some(identity) => println!("user:     {} ({})", identity.username, identity.role),
        None => println!("user:     not signed in"),
    }
    println!("location: {landed}");

    let sidebar: Vec<&str> = console.sidebar().iter().map(|r| r.name.label()).collect();
    if !sidebar.is_empty() {
        println!("menu:     {}", sidebar.join(", "));
    }
    println!("cart:     {} item(s)", console.cart().total_items());
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn print_cart(console: &Console<FileStore, ApiClient>) {
    let cart = console.cart();
    if cart.cart().is_empty() {
        println!("cart is empty");
        return;
    }
    for line in cart.lines() {
        let product = line.product();
        let note = if !product.can_be_sold() {
            "  (unavailable)"
        } else if product.exceeds_stock(line.quantity()) {
            "  (over stock)"
        } else {
            ""
        };
        println!(
            "{:>4} x {:<30} {:>10}{note}",
            line.quantity(),
            product.product_name,
            line.subtotal()
        );
    }
    println!(
        "total: {} ({} items, profit {})",
        cart.total(),
        cart.total_items(),
        cart.cart().total_profit()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {}
