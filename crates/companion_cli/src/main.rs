//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `companion_core` linkage.
//! - Print the persisted menu order from the configured database.

use companion_core::db::open_db;
use companion_core::{AppConfig, MenuService, SqliteKeyValueStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("companion_core ping={}", companion_core::ping());
    println!("companion_core version={}", companion_core::core_version());

    match menu_labels() {
        Ok(labels) => {
            println!("menu_order={}", labels.join(","));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("menu_order error={err}");
            ExitCode::FAILURE
        }
    }
}

fn menu_labels() -> Result<Vec<&'static str>, Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let conn = open_db(&config.db_path)?;
    let menu = MenuService::open(SqliteKeyValueStore::try_new(&conn)?);
    if let Some(issue) = menu.load_issue() {
        eprintln!("menu_order warning={issue}");
    }
    Ok(menu.labels())
}
