use asp2ts::config::{Config, ImportOrder, WrapMode};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "asp2ts", about = "ASP to TypeScript converter — rewrite Classic ASP pages as TypeScript modules")]
struct Cli {
    /// Source .asp file
    source: PathBuf,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output wrapping: bare, function (default: from config or bare)
    #[arg(long)]
    wrap: Option<String>,

    /// Import order: discovery, reverse (default: from config or discovery)
    #[arg(long)]
    import_order: Option<String>,

    /// Print the result instead of writing the sibling file
    #[arg(long)]
    stdout: bool,
}

fn die(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("asp2ts=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(path: &PathBuf) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| die(&format!("cannot read config: {}", e)));
    serde_json::from_str(&text).unwrap_or_else(|e| die(&format!("invalid config JSON: {}", e)))
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    // Load config
    let mut config = if let Some(ref config_path) = cli.config {
        load_config(config_path)
    } else {
        let defaults = ["asp2ts.config.json", "config/asp2ts.config.json"];
        let mut loaded = None;
        for p in &defaults {
            let path = PathBuf::from(p);
            if path.is_file() {
                loaded = Some(load_config(&path));
                break;
            }
        }
        loaded.unwrap_or_default()
    };

    // CLI overrides
    if let Some(ref mode) = cli.wrap {
        config.wrap = match mode.as_str() {
            "bare" => WrapMode::Bare,
            "function" => WrapMode::Function,
            _ => die(&format!("invalid wrap mode: {}", mode)),
        };
    }
    if let Some(ref order) = cli.import_order {
        config.import_order = match order.as_str() {
            "discovery" => ImportOrder::Discovery,
            "reverse" => ImportOrder::Reverse,
            _ => die(&format!("invalid import order: {}", order)),
        };
    }

    if cli.stdout {
        let conversion =
            asp2ts::convert_source(&cli.source, &config).unwrap_or_else(|e| die(&e.to_string()));
        print!("{}", conversion.code);
        return;
    }

    asp2ts::convert_file(&cli.source, &config).unwrap_or_else(|e| die(&e.to_string()));
}
