use azure_egress_assessment::output::{export_csv, export_json, print_assessment};
use azure_egress_assessment::run_assessment;
use clap::Parser;
use std::error::Error;

/// Assess Azure network topologies for dependence on default internet
/// egress.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Comma-separated list of subscription IDs to scan
    #[arg(long, value_delimiter = ',')]
    subscription_id: Vec<String>,

    /// Read the topology from an existing cache file instead of Azure
    #[arg(long)]
    cache_file: Option<String>,

    /// Export the assessment to a JSON file
    #[arg(long)]
    export_json: Option<String>,

    /// Export the assessment to a CSV file
    #[arg(long)]
    export_csv: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();

    log::info!("#Start main()");

    let args = Args::parse();
    let subscription_filter = if args.subscription_id.is_empty() {
        None
    } else {
        Some(args.subscription_id.as_slice())
    };

    let result = run_assessment(args.cache_file.as_deref(), subscription_filter)?;

    print_assessment(&result);

    if let Some(path) = &args.export_json {
        export_json(&result, path)?;
    }
    if let Some(path) = &args.export_csv {
        export_csv(&result, path)?;
    }

    Ok(())
}
