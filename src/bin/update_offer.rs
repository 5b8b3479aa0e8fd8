//! CLI binary running one interactive offer update session.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use offer_editor::config::Config;
use offer_editor::models::{Amount, CountryOverrides, PayoutTerms};
use offer_editor::prompt::TerminalPrompt;
use offer_editor::storage::FileStorage;
use offer_editor::update::{UpdateOutcome, UpdatedOffer, update_offer};
use owo_colors::OwoColorize;

/// Edit an offer and its payout in the local JSON data files.
#[derive(Debug, Parser)]
#[command(name = "update-offer", version, about)]
struct Cli {
    /// Directory holding offers.json and offerPayouts.json
    /// (default: $OFFER_EDITOR_DATA_DIR or ./data).
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Offer to edit; asked interactively when omitted.
    #[arg(long, value_name = "ID")]
    offer_id: Option<String>,
}

/// Builds the configuration from the environment and CLI flags.
fn resolve_config(data_dir: Option<PathBuf>) -> Config {
    let config = Config::from_env();
    match data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    }
}

/// Runs the CLI. Only terminal I/O failures are returned as errors.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = resolve_config(cli.data_dir);
    let storage = FileStorage::from_config(&config);
    tracing::debug!(
        offers = %storage.offers_path().display(),
        payouts = %storage.payouts_path().display(),
        "resolved data files"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut prompt = TerminalPrompt::new();
    let offer_id = cli.offer_id.map(Into::into);

    let result = runtime.block_on(update_offer(&storage, &mut prompt, offer_id));
    report_outcome(result)?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the session result.
///
/// A failed session is reported on stderr but still ends the process
/// normally; only I/O failures on the terminal itself are returned.
fn report_outcome(result: offer_editor::error::Result<UpdateOutcome>) -> io::Result<()> {
    match result {
        Ok(UpdateOutcome::Updated(updated)) => print_update_summary(&updated),
        Ok(UpdateOutcome::NotFound(_)) => Ok(()),
        Err(err) => {
            tracing::error!(error = %err, "update session failed");
            writeln!(io::stderr().lock(), "{} {err}", "Error:".red().bold())
        }
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints the saved offer and payout in a table.
fn print_update_summary(updated: &UpdatedOffer) -> io::Result<()> {
    let mut out = io::stdout().lock();

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Field").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);

    let offer = &updated.offer;
    let terms = &updated.payout.terms;
    let rows = [
        ("Offer ID", offer.id.to_string()),
        ("Title", offer.title.clone()),
        ("Description", offer.description.clone()),
        ("Categories", offer.categories.join(", ")),
        ("Payout type", payout_type_label(terms)),
        ("CPA amount", amount_label(terms.cpa_amount)),
        (
            "CPA overrides",
            overrides_label(terms.cpa_country_overrides.as_ref()),
        ),
        ("Fixed amount", amount_label(terms.fixed_amount)),
    ];
    for (name, value) in rows {
        _ = table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }

    writeln!(out)?;
    if updated.payout_appended {
        writeln!(out, "{}", "No payout existed; a new one was added.".yellow())?;
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Formats the payout type, or a dash if absent.
fn payout_type_label(terms: &PayoutTerms) -> String {
    terms
        .kind
        .as_ref()
        .map_or_else(|| "\u{2014}".to_owned(), ToString::to_string)
}

/// Formats an optional amount, or a dash if absent.
fn amount_label(amount: Option<Amount>) -> String {
    amount.map_or_else(|| "\u{2014}".to_owned(), |value| value.to_string())
}

/// Formats overrides as `CODE=amount` pairs.
fn overrides_label(overrides: Option<&CountryOverrides>) -> String {
    match overrides {
        Some(map) if !map.is_empty() => map
            .iter()
            .map(|(code, amount)| format!("{code}={amount}"))
            .collect::<Vec<_>>()
            .join(", "),
        Some(_) => "(none)".to_owned(),
        None => "\u{2014}".to_owned(),
    }
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output; if stderr itself failed there is
            // nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
