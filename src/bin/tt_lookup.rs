use lib::tt_lookup::{
    catalog_store::CatalogStore, helpers::get_config, kv_store::FileStore, models::Args,
    run_tool::run, schedule_getter::TimetableApi,
};

use std::error::Error;

use chrono::Utc;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    /* Get all the required resources */
    let args = Args::parse();
    let config = get_config(&args.config_json_path)?;
    let http_client = reqwest::Client::new();
    let schedule_getter = TimetableApi::new(http_client, &config);

    /* Restore what was stored on previous launches */
    let store = FileStore::open(&args.store_dir_path)?;
    let mut catalog = CatalogStore::new(store);
    catalog.load();

    let output = run(&schedule_getter, &mut catalog, &args.command, &config, Utc::now()).await?;
    println!("{}", output);
    Ok(())
}
