//! Status command handler

use anyhow::Result;

use super::CliStore;
use crate::output::{Output, OutputFormat};

/// Show collection counts and storage location
pub fn show(store: &CliStore, output: &Output) -> Result<()> {
    let counts = store.counts();
    let persistence = store.persistence();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": persistence.data_dir(),
                    "export_dir": store.ui().export_dir(),
                    "storage": {
                        "total_size": persistence.total_size(),
                        "degraded": store.is_degraded()
                    },
                    "counts": {
                        "texts": counts.texts,
                        "favorites": counts.favorites,
                        "important": counts.important
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{} {} {}", counts.texts, counts.favorites, counts.important);
        }
        OutputFormat::Human => {
            println!("Jotter Status");
            println!("=============");
            println!();
            println!("Storage:");
            println!("  Location: {}", persistence.data_dir().display());
            println!("  Size:     {}", human_size(persistence.total_size()));
            println!("  Exports:  {}", store.ui().export_dir().display());
            println!();
            println!("Contents:");
            println!("  Texts:     {}", counts.texts);
            println!("  Favorites: {}", counts.favorites);
            println!("  Important: {}", counts.important);
        }
    }

    Ok(())
}

fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
