//! Tariff Billing - command line front end
//!
//! Thin caller surface over the billing engine:
//!
//! ```sh
//! # Itemized bill for a meter reading
//! tariff-billing bill 350
//!
//! # Largest consumption a budget covers
//! tariff-billing estimate 50000
//!
//! # Alternative rate table, machine-readable output
//! tariff-billing --schedule rates.json --json bill 350
//! ```
//!
//! Errors (bad input, malformed schedule file) land on stderr with a
//! non-zero exit code.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use tariff_billing_core::{BillCalculator, BillResult, TariffSchedule};

/// Progressive electricity tariff calculator.
#[derive(Parser, Debug)]
#[command(
    name = "tariff-billing",
    version,
    about = "Progressive electricity tariff calculator",
    long_about = "Computes itemized electricity bills under a progressive tariff \
                  and estimates how much consumption a target amount pays for.\n\n\
                  Default rate table: residential low voltage."
)]
struct Cli {
    /// Path to an alternative tariff schedule (JSON).
    #[arg(short, long)]
    schedule: Option<PathBuf>,

    /// Print the result as pretty JSON instead of a receipt.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the itemized bill for a consumption reading
    Bill {
        /// Consumption in kWh; fractional readings are accepted
        kwh: f64,
    },

    /// Find the consumption a target amount pays for
    Estimate {
        /// Budget in whole currency units
        amount: i64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let schedule = match &cli.schedule {
        Some(path) => load_schedule(path)?,
        None => TariffSchedule::residential_low_voltage(),
    };
    let calculator = BillCalculator::new(schedule)?;

    let bill = match cli.command {
        Command::Bill { kwh } => calculator.compute_bill(kwh)?,
        Command::Estimate { amount } => calculator.estimate_consumption(amount)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&bill)?);
    } else {
        print_receipt(&bill, &calculator);
    }

    Ok(())
}

/// Read and validate a schedule file, naming the file in any read failure
fn load_schedule(path: &Path) -> Result<TariffSchedule, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("cannot read schedule file {}: {}", path.display(), e))?;
    Ok(TariffSchedule::from_json(&json)?)
}

/// Render the itemized receipt
fn print_receipt(bill: &BillResult, calculator: &BillCalculator) {
    let schedule = calculator.schedule();

    println!("Consumption          {:>14} kWh", bill.consumption);
    if !bill.line_items.is_empty() {
        println!("Tier breakdown");
        for item in &bill.line_items {
            println!(
                "  tier {}  {:>9} kWh x {:>6}  {:>12}",
                item.tier,
                item.quantity,
                format_rate(item.unit_rate_tenths),
                format_amount(item.charge)
            );
        }
    }
    println!(
        "Base charge (tier {}) {:>18}",
        bill.applied_tier,
        format_amount(bill.base_charge)
    );
    println!("Usage charge         {:>18}", format_amount(bill.usage_charge));
    println!(
        "Climate surcharge    {:>18}",
        format_amount(bill.climate_surcharge)
    );
    println!(
        "Fuel adjustment      {:>18}",
        format_amount(bill.fuel_surcharge)
    );
    println!("Subtotal             {:>18}", format_amount(bill.subtotal));
    println!(
        "VAT ({})            {:>18}",
        format_percent(schedule.vat_bps),
        format_amount(bill.vat)
    );
    println!(
        "Fund levy ({})      {:>18}",
        format_percent(schedule.fund_levy_bps),
        format_amount(bill.fund_levy)
    );
    println!("Total                {:>18}", format_amount(bill.total));
}

/// Render a tenths-scaled unit rate (2146 -> "214.6")
fn format_rate(rate_tenths: i64) -> String {
    format!("{}.{}", rate_tenths / 10, rate_tenths % 10)
}

/// Render a basis-point rate as a percentage (370 -> "3.7%")
fn format_percent(bps: i64) -> String {
    format!("{}%", bps as f64 / 100.0)
}

/// Group an amount with thousands separators (1771210 -> "1,771,210")
fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
