//! Invoicely command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto core session operations (create, list, show,
//!   delete, export).
//! - Resolve configuration and start logging before touching storage.
//!
//! # Invariants
//! - Storage is opened once per invocation and owned by one session.
//! - Failures print to stderr and exit non-zero; nothing panics.

use clap::{Args, Parser, Subcommand};
use invoicely_core::db::open_db;
use invoicely_core::render::list::list_total_label;
use invoicely_core::{
    coerce_number, export_pdf, init_logging, AppConfig, ConfigOverrides, DraftPatch,
    ExportOptions, FormController, InvoiceDocument, InvoiceId, InvoiceListing, InvoiceSession,
    ItemPatch, SqliteKeyValueStore,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "invoicely", version, about = "Create, list and export invoices")]
struct Cli {
    /// SQLite database file holding saved invoices.
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    /// Directory for rolling log files.
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a draft from flags and save it.
    New(NewArgs),
    /// List saved invoices, most recent first.
    List {
        /// Case-insensitive invoice number filter.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Print the preview of one invoice.
    Show { id: String },
    /// Delete one invoice.
    Delete { id: String },
    /// Export one invoice as `<invoice number>.pdf`.
    Export {
        id: String,
        #[arg(long, default_value = ".", value_name = "DIR")]
        out: PathBuf,
    },
}

#[derive(Debug, Args)]
struct NewArgs {
    /// Sender block; `\n` starts a new line.
    #[arg(long)]
    from: Option<String>,
    /// Receiver block; `\n` starts a new line.
    #[arg(long)]
    to: Option<String>,
    /// Invoice number (a random `INV-NNNN` is suggested otherwise).
    #[arg(long)]
    number: Option<String>,
    /// Due date, `YYYY-MM-DD`.
    #[arg(long)]
    due: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Line item; an explicit PRIZE overrides QTY x PRICE.
    #[arg(long = "item", value_name = "DESC;QTY;PRICE[;PRIZE]")]
    items: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = AppConfig::resolve(ConfigOverrides {
        db_path: cli.db,
        log_dir: cli.log_dir,
        log_level: cli.log_level,
    })?;

    if let Some(log_dir) = config.log_dir.to_str() {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    } else {
        eprintln!("warning: logging disabled: log_dir is not valid UTF-8");
    }

    let conn = open_db(&config.db_path)
        .map_err(|err| format!("cannot open `{}`: {err}", config.db_path.display()))?;
    let mut session = InvoiceSession::open(SqliteKeyValueStore::new(&conn));

    match cli.command {
        Command::New(args) => {
            fill_draft(session.form_mut(), args);
            let saved = session
                .submit()
                .map_err(|err| format!("save failed: {err}"))?;
            println!(
                "saved {} {} total {}",
                saved.id,
                saved.invoice_number,
                list_total_label(saved)
            );
        }
        Command::List { search } => {
            session.set_search(search);
            print!("{}", InvoiceListing::new(session.visible_invoices()));
        }
        Command::Show { id } => {
            let invoice = session
                .select(&InvoiceId::new(id.as_str()))
                .ok_or_else(|| format!("invoice not found: {id}"))?;
            print!("{}", InvoiceDocument::from_invoice(invoice));
        }
        Command::Delete { id } => {
            let removed = session
                .delete(&InvoiceId::new(id.as_str()))
                .map_err(|err| format!("delete failed: {err}"))?
                .ok_or_else(|| format!("invoice not found: {id}"))?;
            println!("deleted {} {}", removed.id, removed.invoice_number);
        }
        Command::Export { id, out } => {
            let invoice = session
                .select(&InvoiceId::new(id.as_str()))
                .ok_or_else(|| format!("invoice not found: {id}"))?;
            let report = export_pdf(invoice, &out, &ExportOptions::default())
                .map_err(|err| err.to_string())?;
            println!("exported {} ({} bytes)", report.path.display(), report.bytes);
        }
    }

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

/// Applies CLI flags to the draft the same way form edits would.
fn fill_draft(form: &mut FormController, args: NewArgs) {
    form.update_field(DraftPatch {
        from: args.from.as_deref().map(unescape_newlines),
        to: args.to.as_deref().map(unescape_newlines),
        invoice_number: args.number,
        due_date: args.due,
        notes: args.notes.as_deref().map(unescape_newlines),
        items: None,
    });

    for (index, entry) in args.items.iter().enumerate() {
        // The first flag fills the draft's initial empty item.
        let existing = if index == 0 {
            form.draft().items.first().map(|item| item.id.clone())
        } else {
            None
        };
        let id = existing.unwrap_or_else(|| form.add_item());

        let mut parts = entry.split(';');
        let description = parts.next().unwrap_or_default();
        let qty = parts.next();
        let price = parts.next();
        let prize = parts.next();

        form.update_item(
            &id,
            ItemPatch {
                description: Some(description),
                ..ItemPatch::default()
            },
        );
        for patch in [
            qty.map(|text| ItemPatch {
                qty: Some(coerce_number(text)),
                ..ItemPatch::default()
            }),
            price.map(|text| ItemPatch {
                price: Some(coerce_number(text)),
                ..ItemPatch::default()
            }),
            prize.map(|text| ItemPatch {
                prize: Some(coerce_number(text)),
                ..ItemPatch::default()
            }),
        ]
        .into_iter()
        .flatten()
        {
            form.update_item(&id, patch);
        }
    }
}

fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}
