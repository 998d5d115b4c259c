use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use serde::Deserialize;

use quote_app::cli::{Args, Command};
use quote_app::config::AppConfig;
use quote_app::notice::NoticeLevel;
use quote_app::session::QuoteSession;
use quote_app::{logging, preview, utils};
use quote_core::db::{MemoryStoreFactory, StoreRegistry};
use quote_core::history::HistoryStore;
use quote_core::models::{LineItem, Quote, QuoteSnapshot};
use quote_store_sqlite::SqliteStoreFactory;

/// A quote document supplied by the user on `save`: the header plus the
/// line items, in the same wire shape the store uses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QuoteDocument {
    quote: Quote,
    lines: Vec<LineItem>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::load(&args.config)?;
    logging::init_logging(&config.log.level);

    let mut store_config = config.store_config();
    if let Some(backend) = &args.backend {
        store_config.backend = backend.clone();
    }
    if let Some(database) = &args.database {
        store_config.connection = database.clone();
    }

    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));

    let store = registry
        .create(&store_config)
        .await
        .with_context(|| format!("Failed to open the '{}' store", store_config.backend))?;
    let history = HistoryStore::open(store)
        .await
        .context("Failed to open the quotation history")?;
    let mut session = QuoteSession::new(history);

    let today = Local::now().date_naive();

    match args.command {
        Command::Save { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read '{}'", file.display()))?;
            let document: QuoteDocument = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse quote document '{}'", file.display()))?;
            session.replace_live(document.quote, document.lines);
            if session.save(today).await.is_ok() {
                print_summary(&session);
            }
        }

        Command::Load => {
            if session.load().await.is_ok() {
                print_summary(&session);
            }
        }

        Command::Preview => {
            if session.load().await.is_ok() {
                session.enter_preview();
                let totals = session.totals();
                println!("{}", preview::render(session.quote(), session.lines(), &totals));
            }
        }

        Command::List => {
            print_snapshots(session.history().list().iter());
        }

        Command::Filter { query, from, to } => {
            let matched = session.history().filter(&query, from, to);
            print_snapshots(matched.into_iter());
        }

        Command::Open { id } => {
            if session.open_from_history(&id).is_ok() {
                print_summary(&session);
            }
        }

        Command::Duplicate { id } => {
            let _ = session.duplicate_snapshot(&id, today).await;
        }

        Command::Rename { id, reference } => {
            let _ = session.rename_snapshot(&id, &reference).await;
        }

        Command::Delete { id } => {
            let _ = session.delete_snapshot(&id).await;
        }

        Command::Clear { yes } => {
            if yes {
                let _ = session.clear_history().await;
            } else {
                println!("Clearing the history is not recoverable; pass --yes to confirm.");
            }
        }

        Command::Export { out } => {
            let bundle = session.export_bundle();
            let raw = bundle.to_json().context("Failed to serialize the backup")?;
            fs::write(&out, raw)
                .with_context(|| format!("Failed to write '{}'", out.display()))?;
            println!(
                "Exported {} quotation(s) to {}",
                session.history().list().len(),
                out.display()
            );
        }

        Command::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read '{}'", file.display()))?;
            let _ = session.import_bundle(&raw).await;
        }
    }

    if let Some(notice) = session.notices_mut().active(Instant::now()) {
        match notice.level {
            NoticeLevel::Error => eprintln!("{}", notice.message),
            _ => println!("{}", notice.message),
        }
    }

    Ok(())
}

fn print_summary(session: &QuoteSession) {
    let quote = session.quote();
    let totals = session.totals();

    let reference = if quote.reference.trim().is_empty() {
        "(draft)"
    } else {
        quote.reference.as_str()
    };
    println!("{} — {}", reference, quote.sponsor);
    println!("  Lines:    {}", session.lines().len());
    println!("  Subtotal: {}", utils::format_money(totals.subtotal));
    println!(
        "  Taxes:    {} ({})",
        utils::format_money(totals.taxes),
        utils::format_rate(totals.tax_rate)
    );
    println!("  Total:    {}", utils::format_money(totals.total));
}

fn print_snapshots<'a, I>(snapshots: I)
where
    I: Iterator<Item = &'a QuoteSnapshot>,
{
    let mut any = false;
    for snapshot in snapshots {
        any = true;
        println!(
            "{}  {:<14}  {:<24}  {:<10}  {:>12}",
            snapshot.id,
            snapshot.quote.reference,
            snapshot.quote.sponsor,
            utils::format_date_opt(&snapshot.quote.issue_date),
            utils::format_money(snapshot.total)
        );
    }
    if !any {
        println!("No saved quotations.");
    }
}
