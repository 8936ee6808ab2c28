use anyhow::{anyhow, Result};
use cinema_catalog_bot::config::database_url_from_env;
use cinema_catalog_bot::database::connection::DatabaseManager;
use cinema_catalog_bot::database::models::{Cinema, Film};
use cinema_catalog_bot::database::store::CatalogStore;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::io;
use std::path::Path;

/// Seed document: the films and cinemas to upsert.
///
/// Entries stay raw JSON here so one malformed record is skipped on its own
/// instead of rejecting the whole file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    films: Vec<Value>,
    #[serde(default)]
    cinemas: Vec<Value>,
}

/// Decodes each entry separately; undecodable entries come back as
/// `(index, error)` pairs.
fn decode_records<T: DeserializeOwned>(entries: Vec<Value>) -> (Vec<T>, Vec<(usize, String)>) {
    let mut records = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(record) => records.push(record),
            Err(e) => rejected.push((index, e.to_string())),
        }
    }
    (records, rejected)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "seed" => match args.get(2) {
            Some(path) => seed_catalog(Path::new(path)).await,
            None => {
                eprintln!("seed needs a catalog file");
                print_help();
                std::process::exit(1);
            }
        },
        "reset" => reset_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn open_database() -> Result<DatabaseManager> {
    let database_url = database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    // Ensure data directory exists for SQLite
    if let Some(db_path) = database_url.strip_prefix("sqlite:") {
        if let Some(parent) = Path::new(db_path.trim_start_matches("//")).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                println!("📁 Creating directory: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))
}

async fn run_migrations() -> Result<()> {
    println!("🎬 Cinema Catalog - Database Migration Tool");
    println!("===========================================");

    let db_manager = open_database().await?;

    println!("🚀 Running database migrations...");
    match db_manager.run_migrations().await {
        Ok(_) => println!("✅ Migrations completed successfully!"),
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let db_manager = open_database().await?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for (table, rows) in tables {
                println!("  • {table} ({rows} rows)");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'catalog migrate' to create the schema");
        }
    }

    Ok(())
}

async fn seed_catalog(path: &Path) -> Result<()> {
    println!("🌱 Seeding catalog from {}", path.display());

    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
    let catalog: CatalogFile = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("Invalid catalog file {}: {}", path.display(), e))?;

    let (films, bad_films) = decode_records::<Film>(catalog.films);
    let (cinemas, bad_cinemas) = decode_records::<Cinema>(catalog.cinemas);
    for (index, e) in &bad_films {
        eprintln!("⚠️  Skipping film #{index}: {e}");
    }
    for (index, e) in &bad_cinemas {
        eprintln!("⚠️  Skipping cinema #{index}: {e}");
    }
    let mut failed = bad_films.len() + bad_cinemas.len();

    let db_manager = open_database().await?;
    db_manager.run_migrations().await?;

    let mut saved_films = 0usize;
    for film in &films {
        match db_manager.save_film(film).await {
            Ok(_) => saved_films += 1,
            Err(e) => {
                eprintln!("⚠️  Skipping film {}: {e}", film.uuid);
                failed += 1;
            }
        }
    }
    let mut saved_cinemas = 0usize;
    for cinema in &cinemas {
        match db_manager.save_cinema(cinema).await {
            Ok(_) => saved_cinemas += 1,
            Err(e) => {
                eprintln!("⚠️  Skipping cinema {}: {e}", cinema.uuid);
                failed += 1;
            }
        }
    }

    println!("✅ Seeded {saved_films} films and {saved_cinemas} cinemas ({failed} skipped)");
    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL data in the database!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = database_url_from_env();

    // For SQLite, we can just delete the file
    match database_url.strip_prefix("sqlite:") {
        Some(db_path) => {
            let db_path = db_path.trim_start_matches("//");
            if Path::new(db_path).exists() {
                std::fs::remove_file(db_path)?;
                println!("🗑️  Deleted database file: {db_path}");
            }
        }
        None => return Err(anyhow!("Reset is only supported for SQLite databases")),
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");

    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<(String, i64)>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%'",
    )
    .fetch_all(&db_manager.pool)
    .await?;

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let rows = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM \"{name}\""))
            .fetch_one(&db_manager.pool)
            .await?;
        tables.push((name, rows));
    }

    Ok(tables)
}

fn mask_url(url: &str) -> String {
    // Only show the file name of SQLite databases
    if let Some(path) = url.strip_prefix("sqlite:") {
        if let Some(filename) = Path::new(path).file_name() {
            return format!("sqlite:.../{}", filename.to_string_lossy());
        }
    }
    url.to_string()
}

fn print_help() {
    println!("🎬 Cinema Catalog - Database Tool");
    println!();
    println!("USAGE:");
    println!("    catalog [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Run database migrations (default)");
    println!("    check          Check database connection and list tables");
    println!("    seed <FILE>    Upsert films and cinemas from a JSON catalog file");
    println!("    reset          Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/catalog.db)");
    println!();
    println!("CATALOG FILE:");
    println!("    {{ \"films\": [{{ \"uuid\", \"name\", \"type\", ... }}],");
    println!("      \"cinemas\": [{{ \"uuid\", \"name\", \"url\", \"location\": {{ \"latitude\", \"longitude\" }} }}] }}");
    println!();
}
