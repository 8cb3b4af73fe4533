//! Board inspection entry point.
//!
//! # Responsibility
//! - Verify `minefield_core` wiring against a real database file.
//! - Print the active game and opened cells in deterministic scan order.

use log::error;
use minefield_core::{core_version, init_logging, Store, StoreConfig};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    println!("minefield_core version={}", core_version());

    let config = StoreConfig::load();
    if let Some(log_dir) = config.log_dir.as_deref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let store = match Store::open(&config) {
        Ok(store) => store,
        Err(err) => {
            error!("event=cli_open module=cli status=error error={err}");
            eprintln!(
                "failed to open {}: {err}",
                config.database_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    match store.games.find().await {
        Some(game) => {
            let (rows, cols) = game.dimensions();
            println!(
                "game id={} size={rows}x{cols} bombs={}",
                game.id,
                game.bomb_count()
            );
        }
        None => println!("game none"),
    }

    let cells = store.cells.find_all().await;
    println!("cells count={}", cells.len());
    for cell in cells {
        let openers = cell
            .who_opened
            .map(|ids| {
                ids.iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_else(|| "-".to_string());
        println!(
            "cell x={} y={} value={} bomb={} user_input={} opened_by={} at={}",
            cell.x,
            cell.y,
            cell.cell_value,
            cell.is_bomb,
            cell.is_user_input,
            openers,
            cell.when_opened
        );
    }

    ExitCode::SUCCESS
}
