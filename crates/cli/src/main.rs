//! Command-line front end for the storefront catalog query engine.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use storefront_catalog::{CatalogConfig, ProductCatalog};
use storefront_engine::CatalogApi;
use storefront_types::FilterBag;
use tracing::Level;

#[derive(Parser)]
#[command(name = "storefront", about = "Query a storefront product catalog", version)]
struct Cli {
    /// Path to the catalog manifest; overrides the saved configuration.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List products matching the given filters.
    Items {
        /// Generic field filter: `field=value` or `field=op:value[,value..]`
        /// with op one of in, nin, eq, neq, gt, lt, gteq, lteq.
        #[arg(long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,
        /// Cap the number of returned records.
        #[arg(long)]
        count: Option<u64>,
        /// Restrict results to one category id.
        #[arg(long)]
        category: Option<u64>,
        /// Restrict results to an explicit comma-separated id set.
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
        /// Store id or code; defaults to the catalog's default store.
        #[arg(long)]
        store: Option<String>,
    },
    /// Show detailed attribute data for one product.
    Info {
        /// Product id, or SKU depending on --identifier-type.
        product_id: String,
        /// Store id or code.
        #[arg(long)]
        store: Option<String>,
        /// Allow-list of editable attributes to include (comma-separated).
        #[arg(long, value_delimiter = ',')]
        attributes: Vec<String>,
        /// Force identifier interpretation: `id` or `sku`.
        #[arg(long)]
        identifier_type: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let manifest_path = resolve_manifest_path(cli.catalog)?;
    let catalog = ProductCatalog::from_file(&manifest_path)
        .with_context(|| format!("failed to load catalog from {}", manifest_path.display()))?;
    let api = CatalogApi::new(catalog);

    match cli.command {
        Command::Items {
            filters,
            count,
            category,
            ids,
            store,
        } => {
            let bag = build_filter_bag(&filters, count, category, &ids)?;
            let filter_arg = (!bag.is_empty()).then_some(&bag);
            let records = api.items(filter_arg, store.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Info {
            product_id,
            store,
            attributes,
            identifier_type,
        } => {
            let attribute_arg = (!attributes.is_empty()).then_some(attributes.as_slice());
            let record = api.info(&product_id, store.as_deref(), attribute_arg, identifier_type.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .try_init();
}

fn resolve_manifest_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }
    if let Some(path) = CatalogConfig::load().manifest_path {
        return Ok(path);
    }
    bail!("no catalog manifest configured; pass --catalog <path> or save one in the config file");
}

fn build_filter_bag(filters: &[String], count: Option<u64>, category: Option<u64>, ids: &[u64]) -> Result<FilterBag> {
    let mut bag = FilterBag::new();
    if let Some(count) = count {
        bag.insert("count".to_string(), Value::from(count));
    }
    if let Some(category) = category {
        bag.insert("category".to_string(), Value::from(category));
    }
    if !ids.is_empty() {
        bag.insert("ids".to_string(), Value::from(ids.to_vec()));
    }
    for argument in filters {
        let (field, constraint) = parse_filter_argument(argument)?;
        bag.insert(field, constraint);
    }
    Ok(bag)
}

/// Parses one `--filter` argument into a filter-bag entry.
///
/// `status=1` becomes an equality constraint; `price=gt:100` and
/// `sku=in:A,B` become the tagged operator forms.
fn parse_filter_argument(argument: &str) -> Result<(String, Value)> {
    let Some((field, raw_value)) = argument.split_once('=') else {
        bail!("filter '{argument}' is not of the form field=value");
    };
    if field.is_empty() {
        bail!("filter '{argument}' has an empty field name");
    }

    let constraint = match raw_value.split_once(':') {
        Some((operator @ ("in" | "nin"), operands)) => {
            let entries: Vec<Value> = operands.split(',').map(scalar_value).collect();
            tagged_constraint(operator, Value::Array(entries))
        }
        Some((operator @ ("eq" | "neq" | "gt" | "lt" | "gteq" | "lteq"), operand)) => {
            tagged_constraint(operator, scalar_value(operand))
        }
        _ => scalar_value(raw_value),
    };
    Ok((field.to_string(), constraint))
}

fn tagged_constraint(operator: &str, operand: Value) -> Value {
    let mut object = serde_json::Map::new();
    object.insert(operator.to_string(), operand);
    Value::Object(object)
}

/// Numeric-looking values become JSON numbers so they compare numerically.
fn scalar_value(raw: &str) -> Value {
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::from(integer);
    }
    if let Ok(float) = raw.parse::<f64>() {
        return Value::from(float);
    }
    Value::from(raw)
}
