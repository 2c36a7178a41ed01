use data_loader::{ParseOptions, TransactionTable};
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/transactions.csv"));
    let date_format = std::env::args()
        .nth(2)
        .unwrap_or_else(|| data_loader::ISO_DATE_FORMAT.to_string());

    println!("Loading transactions from {}...\n", path.display());

    let start = Instant::now();
    let table = TransactionTable::load_from_file(&path, &ParseOptions::default().with_date_format(date_format))
        .expect("Failed to load transactions");
    let loaded = start.elapsed();
    let customers = table.summarize().expect("Failed to aggregate customers");
    let aggregated = start.elapsed() - loaded;

    println!("=== Load Complete ===");
    println!("Load time: {:?}", loaded);
    println!("Aggregation time: {:?}", aggregated);
    println!("Transactions: {}", table.len());
    println!("Customers: {}", customers.len());
    println!("\nPerformance: {:.0} rows/second",
             table.len() as f64 / loaded.as_secs_f64());
}
