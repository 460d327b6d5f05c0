use carsales::export::read_parquet_summary;
use std::{env, path::Path, process::exit};

fn main() {
    // Expect exactly one CLI argument: path to a cleaned-listings Parquet file.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <CLEANED_PARQUET>", args[0]);
        exit(1);
    }
    let path = Path::new(&args[1]);

    let summary = match read_parquet_summary(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit(1);
        }
    };

    println!("=== Cleaned listings: {} ===", path.display());
    println!("Total rows:           {}", summary.rows);
    println!("Number of row groups: {}", summary.row_groups);
    println!();
    println!("=== Columns ===");
    for col in &summary.columns {
        println!(
            "- {:<14} | Physical: {:<10} | Logical: {}",
            col.name,
            col.physical_type,
            col.logical_type.as_deref().unwrap_or("<none>")
        );
    }
}
