//! SafeWallet CLI
//!
//!   safewallet generate                  → new 12-word seed phrase
//!   safewallet create -m "<words>"       → derive the next account, save it
//!   safewallet list                      → stored accounts
//!   safewallet show <id>                 → one full record
//!   safewallet balance [index]           → one eth_getBalance call
//!   safewallet watch [index]             → poll the balance until Ctrl+C
//!   safewallet serve                     → HTTP workbench + poller
//!
//! Output is JSON on stdout (pretty on a tty); errors are `{"error": ...}` on stderr.

use safewallet::core::paths::{env as vars, PRODUCT_NAME};
use safewallet::identity::{generate_seed_phrase_from_entropy, word_count};
use safewallet::logging::init_logging;
use safewallet::session::{self, load_dotenv, parse_poll_ms, parse_timeout_ms};
use safewallet::{generate_seed_phrase, install_signal_handlers, refresh_now, Config, Poller, Session};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::info;

fn main() {
    load_dotenv(".env");
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("safewallet {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("generate") | Some("gen") => cmd_generate(&opts),
        Some("create") | Some("add") => cmd_create(&opts),
        Some("list") | Some("ls") => cmd_list(&opts),
        Some("show") => cmd_show(&opts),
        Some("balance") => cmd_balance(&opts),
        Some("watch") => cmd_watch(&opts),
        Some("serve") => cmd_serve(&opts),
        Some(cmd) => Err(format!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": e}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    target: Option<String>,
    app: Option<String>,
    data_dir: Option<String>,
    mnemonic: Option<String>,
    entropy: Option<String>,
    rpc_url: Option<String>,
    poll_ms: Option<String>,
    rpc_timeout_ms: Option<String>,
    port: Option<u16>,
    no_balance: bool,
    full: bool,
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let value = args.get(i + 1).cloned();
            let mut take = |slot: &mut Option<String>| {
                if value.is_some() {
                    *slot = value.clone();
                    i += 1;
                }
            };
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--full" => opts.full = true,
                "--no-balance" => opts.no_balance = true,
                "--app" | "-a" => take(&mut opts.app),
                "--data-dir" | "-d" => take(&mut opts.data_dir),
                "--mnemonic" | "-m" => take(&mut opts.mnemonic),
                "--entropy" => take(&mut opts.entropy),
                "--rpc-url" | "-r" => take(&mut opts.rpc_url),
                "--poll-ms" => take(&mut opts.poll_ms),
                "--rpc-timeout-ms" => take(&mut opts.rpc_timeout_ms),
                "--port" | "-p" => {
                    let mut raw = None;
                    take(&mut raw);
                    opts.port = raw.and_then(|p| p.parse().ok());
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        let mut positional = positional.into_iter();
        opts.command = positional.next();
        opts.target = positional.next();
        opts
    }

    /// Env (and `.env`) first, flags override.
    fn config(&self) -> Result<Config, String> {
        let mut config = Config::from_env().map_err(|e| e.to_string())?;
        if let Some(app) = &self.app {
            config.app = app.clone();
        }
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(url) = &self.rpc_url {
            config = config.with_rpc_url(url);
        }
        if let Some(m) = &self.mnemonic {
            config = config.with_mnemonic(m);
        }
        if let Some(ms) = &self.poll_ms {
            config = config.with_poll_interval(parse_poll_ms(ms).map_err(|e| e.to_string())?);
        }
        if let Some(ms) = &self.rpc_timeout_ms {
            config = config.with_rpc_timeout(parse_timeout_ms(ms).map_err(|e| e.to_string())?);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        Ok(config)
    }

    fn index(&self) -> Result<usize, String> {
        match self.target.as_deref() {
            None => Ok(0),
            Some(raw) => raw.parse().map_err(|_| format!("Invalid wallet index: {}", raw)),
        }
    }
}

fn print_usage() {
    println!(
        r#"{PRODUCT_NAME} - experiment with wallet creation in a hands-on learning environment

USAGE:
    safewallet <command> [target] [options]

COMMANDS:
    generate                Print a new 12-word seed phrase
    create                  Derive the next account from --mnemonic and save it
    list                    List saved accounts
    show <id>               Print one saved account (keys included)
    balance [index]         Fetch the balance of the account at index (default 0)
    watch [index]           Poll that balance until Ctrl+C
    serve                   Start the HTTP workbench with the balance poller

OPTIONS:
    --app, -a <name>        Application name (env: {app})
    --data-dir, -d <path>   Wallet storage directory (env root: {root})
    --mnemonic, -m <words>  BIP39 phrase to derive from (env: {mnemonic})
    --entropy <hex>         generate: use this entropy instead of OS randomness
    --rpc-url, -r <url>     Ethereum JSON-RPC endpoint (env: {rpc})
    --poll-ms <ms>          Polling interval (default 5000, env: {poll})
    --rpc-timeout-ms <ms>   Per-request RPC timeout (default 10000, env: {timeout})
    --port, -p <port>       Server port (default 8080, env: {port})
    --no-balance            create: skip the initial balance fetch
    --full                  list: include keys and phrase
    --json | --pretty       Output format
    --version, -V           Print version

WARNING:
    Keys and phrases are stored in plaintext. Never use them for real funds.
"#,
        app = vars::APP,
        root = vars::ROOT,
        mnemonic = vars::MNEMONIC,
        rpc = vars::RPC_URL,
        poll = vars::POLL_MS,
        timeout = vars::RPC_TIMEOUT_MS,
        port = vars::PORT,
    );
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("Failed to create runtime: {}", e))
}

fn cmd_generate(opts: &ParsedArgs) -> Result<Value, String> {
    let phrase = match opts.entropy.as_deref() {
        Some(raw) => {
            let bytes = hex::decode(raw.trim_start_matches("0x")).map_err(|e| format!("Invalid entropy hex: {}", e))?;
            generate_seed_phrase_from_entropy(&bytes)
        }
        None => generate_seed_phrase(),
    }
    .map_err(|e| e.to_string())?;
    Ok(json!({"phrase": phrase, "words": word_count(&phrase)}))
}

fn cmd_create(opts: &ParsedArgs) -> Result<Value, String> {
    let config = opts.config()?;
    if config.mnemonic.is_none() {
        return Err(format!("--mnemonic <words> or {} is required", vars::MNEMONIC));
    }
    let shared = Session::from_config(&config).map_err(|e| e.to_string())?.shared();

    let wallet = session::write(&shared)
        .map_err(|e| e.to_string())?
        .create_wallet_from_seed()
        .map_err(|e| e.to_string())?
        .ok_or("No seed phrase")?;

    let balance = if opts.no_balance || config.rpc_url.is_none() {
        None
    } else {
        let client = config.rpc_client().map_err(|e| e.to_string())?;
        runtime()?
            .block_on(refresh_now(&shared, &client))
            .map_err(|e| format!("Error fetching balance: {}", e))?
    };

    let store = config.store();
    Ok(json!({"wallet": wallet, "balance": balance, "store": store.dir()}))
}

fn cmd_list(opts: &ParsedArgs) -> Result<Value, String> {
    let config = opts.config()?;
    let session = Session::load(config.store()).map_err(|e| e.to_string())?;
    let wallets: Vec<Value> = session
        .wallets()
        .iter()
        .map(|w| {
            if opts.full {
                json!(w)
            } else {
                json!({"id": w.id, "address": w.address, "path": w.path, "label": w.label()})
            }
        })
        .collect();
    Ok(json!({"count": wallets.len(), "wallets": wallets}))
}

fn cmd_show(opts: &ParsedArgs) -> Result<Value, String> {
    let raw = opts.target.as_deref().ok_or("Wallet id required: safewallet show <id>")?;
    let id: u32 = raw.parse().map_err(|_| format!("Invalid wallet id: {}", raw))?;
    let config = opts.config()?;
    let session = Session::load(config.store()).map_err(|e| e.to_string())?;
    let (_, wallet) = safewallet::wallet::record::find_by_id(session.wallets(), id)
        .ok_or_else(|| format!("No wallet with id {}", id))?;
    Ok(json!(wallet))
}

fn cmd_balance(opts: &ParsedArgs) -> Result<Value, String> {
    let config = opts.config()?;
    let client = config.rpc_client().map_err(|e| e.to_string())?;
    let shared = select(&config, opts.index()?)?;

    let balance = runtime()?
        .block_on(refresh_now(&shared, &client))
        .map_err(|e| format!("Error fetching balance: {}", e))?;
    balance
        .map(|b| json!({"balance": b, "rpc": client.url()}))
        .ok_or_else(|| "No wallets saved yet".to_string())
}

fn cmd_watch(opts: &ParsedArgs) -> Result<Value, String> {
    let config = opts.config()?;
    let client = Arc::new(config.rpc_client().map_err(|e| e.to_string())?);
    let shared = select(&config, opts.index()?)?;
    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());

    runtime()?.block_on(async {
        let shutdown = install_signal_handlers();
        let poller = Poller::new(shared, client, config.poll_interval).with_immediate_first_tick();
        let mut updates = poller.updates();
        let handle = poller.spawn(shutdown.clone());

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let latest = updates.borrow_and_update().clone();
                    if let Some(balance) = latest {
                        println!("{}", render(&json!(balance), pretty));
                    }
                }
                _ = shutdown.wait() => break,
            }
        }
        let _ = handle.await;
    });

    Ok(json!({"status": "stopped"}))
}

#[cfg(feature = "server")]
fn cmd_serve(opts: &ParsedArgs) -> Result<Value, String> {
    use safewallet::server::{self, AppState};

    let config = opts.config()?;
    let shared = Session::from_config(&config).map_err(|e| e.to_string())?.shared();
    let source = match config.rpc_url {
        Some(_) => Some(Arc::new(config.rpc_client().map_err(|e| e.to_string())?)),
        None => {
            tracing::warn!("{} not set; balances will not be fetched", vars::RPC_URL);
            None
        }
    };

    runtime()?.block_on(async {
        let shutdown = install_signal_handlers();

        let mut state = AppState::new(shared.clone(), &config.app);
        let mut poller = None;
        if let Some(client) = source {
            info!(rpc = client.url(), interval_ms = config.poll_interval.as_millis() as u64, "balance polling enabled");
            state = state.with_source(client.clone());
            poller = Some(Poller::new(shared.clone(), client, config.poll_interval).spawn(shutdown.clone()));
        }

        let addr = format!("0.0.0.0:{}", config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;

        server::serve(listener, server::create_router(state), shutdown.clone())
            .await
            .map_err(|e| format!("Server error: {}", e))?;

        shutdown.trigger();
        if let Some(handle) = poller {
            let _ = handle.await;
        }
        info!("Server stopped");
        Ok::<(), String>(())
    })?;

    Ok(json!({"status": "stopped"}))
}

#[cfg(not(feature = "server"))]
fn cmd_serve(_opts: &ParsedArgs) -> Result<Value, String> {
    Err("Built without the `server` feature".into())
}

/// Stored accounts with `index` selected.
fn select(config: &Config, index: usize) -> Result<safewallet::SharedSession, String> {
    let mut session = Session::load(config.store()).map_err(|e| e.to_string())?;
    if !session.wallets().is_empty() {
        session.select_wallet(index).map_err(|e| e.to_string())?;
    }
    Ok(session.shared())
}
