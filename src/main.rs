use dbaccess::config::{default_config_path, load_config};
use dbaccess::{DbError, Params, Result, Value};
use std::path::PathBuf;
use tracing::info;

const USAGE: &str = "usage: dbaccess [config.toml] <sql> [name=value ...]";

fn main() {
    // Log to stderr so stdout carries only query output
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let (config_path, rest) = match args.first() {
        Some(first) if first.ends_with(".toml") => (PathBuf::from(first), &args[1..]),
        _ => (
            default_config_path()
                .ok_or_else(|| DbError::Config("no configuration directory found".to_string()))?,
            args,
        ),
    };

    let Some((sql, bindings)) = rest.split_first() else {
        return Err(DbError::Config(USAGE.to_string()));
    };

    info!("loading configuration from {}", config_path.display());
    let config = load_config(&config_path)?;
    let params = parse_bindings(bindings)?;

    let mut db = config.open()?;
    let result = db.execute(sql, &params)?;
    if result.columns.is_empty() {
        println!("{} rows affected", result.rows_affected);
    } else {
        for row in result.fetch_all() {
            println!("{}", serde_json::to_string(&row)?);
        }
    }
    Ok(())
}

/// Turns `name=value` arguments into named parameters.
fn parse_bindings(bindings: &[String]) -> Result<Params> {
    bindings.iter().try_fold(Params::new(), |params, binding| {
        let (name, raw) = binding
            .split_once('=')
            .ok_or_else(|| DbError::Params(format!("expected name=value, got {}", binding)))?;
        Ok(params.with_value(name, parse_value(raw)))
    })
}

fn parse_value(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("null") {
        Value::Null
    } else if let Ok(i) = raw.parse::<i64>() {
        Value::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::Real(f)
    } else {
        Value::Text(raw.to_string())
    }
}
