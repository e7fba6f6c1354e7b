use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::application::{AppError, VoucherApplication, VoucherService};
use crate::domain::{MIN_APPLY_AMOUNT, Voucher, format_amount, parse_amount};

/// Vouchers - discount code management
#[derive(Parser)]
#[command(name = "vouchers")]
#[command(about = "Create discount vouchers and apply them to purchases")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "vouchers.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Create a new voucher
    Create {
        /// Voucher code (case-sensitive, must be unique)
        code: String,

        /// Discount percentage (0-100)
        #[arg(short = 'p', long, value_parser = clap::value_parser!(i64).range(0..=100))]
        discount: i64,
    },

    /// Apply a voucher to a purchase amount
    Apply {
        /// Voucher code
        code: String,

        /// Purchase amount before discount (e.g., "200" or "149.90"); must not be negative
        amount: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single voucher
    Show {
        /// Voucher code
        code: String,

        /// Print the voucher as JSON
        #[arg(long)]
        json: bool,
    },

    /// List vouchers
    List {
        /// Include vouchers that have already been used
        #[arg(short, long)]
        all: bool,
    },

    /// Export vouchers to CSV or JSON
    Export {
        /// What to export: vouchers (CSV), full (JSON snapshot)
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                VoucherService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Create { code, discount } => {
                let service = VoucherService::connect(&self.database).await?;
                let voucher = service.create_voucher(&code, discount).await?;
                println!("Created voucher: {} ({}% off)", voucher.code, voucher.discount);
            }

            Commands::Apply { code, amount, json } => {
                let service = VoucherService::connect(&self.database).await?;
                let amount = parse_amount(&amount)
                    .context("Invalid amount. Use a non-negative number like '200' or '149.90'")?;

                let result = match service.apply_voucher(&code, amount).await {
                    Ok(result) => result,
                    Err(err) => return Err(report_error(err, json)),
                };

                if json {
                    print_json(&result)?;
                } else {
                    println!("{}", describe_application(&code, &result));
                }
            }

            Commands::Show { code, json } => {
                let service = VoucherService::connect(&self.database).await?;
                let voucher = match service.get_voucher(&code).await {
                    Ok(voucher) => voucher,
                    Err(err) => return Err(report_error(err, json)),
                };

                if json {
                    print_json(&voucher)?;
                } else {
                    print_voucher(&voucher);
                }
            }

            Commands::List { all } => {
                let service = VoucherService::connect(&self.database).await?;
                run_list_command(&service, all).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = VoucherService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

/// In JSON mode, echo the structured `{ type, message }` body on stdout
/// before handing the error back to the caller.
fn report_error(err: AppError, json: bool) -> anyhow::Error {
    if json {
        match error_body_json(&err) {
            Ok(body) => println!("{}", body),
            Err(serialize_err) => {
                tracing::warn!("failed to render error body: {}", serialize_err)
            }
        }
    }
    err.into()
}

fn error_body_json(err: &AppError) -> Result<String> {
    serde_json::to_string(&err.to_body()).context("Failed to serialize error")
}

fn describe_application(code: &str, result: &VoucherApplication) -> String {
    if result.applied {
        format!(
            "Applied {} ({}% off): {} -> {}",
            code,
            result.discount,
            format_amount(result.amount),
            format_amount(result.final_amount)
        )
    } else {
        format!(
            "Not applied: {} is below the minimum of {}. Total: {}",
            format_amount(result.amount),
            format_amount(MIN_APPLY_AMOUNT),
            format_amount(result.final_amount)
        )
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_voucher(voucher: &Voucher) {
    println!("Voucher: {}", voucher.code);
    println!("  Discount: {}%", voucher.discount);
    println!("  Status:   {}", voucher.status());
    println!(
        "  Created:  {}",
        voucher.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(used_at) = voucher.used_at {
        println!("  Used:     {}", used_at.format("%Y-%m-%d %H:%M:%S"));
    }
}

async fn run_list_command(service: &VoucherService, all: bool) -> Result<()> {
    let vouchers = service.list_vouchers(all).await?;
    if vouchers.is_empty() {
        println!("No vouchers found.");
        return Ok(());
    }

    println!("{:<16} {:>8} {:<10} {:<19}", "CODE", "DISCOUNT", "STATUS", "CREATED");
    println!("{}", "-".repeat(56));
    for voucher in vouchers {
        println!(
            "{:<16} {:>7}% {:<10} {:<19}",
            voucher.code,
            voucher.discount,
            voucher.status(),
            voucher.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

async fn run_export_command(
    service: &VoucherService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "vouchers" => {
            let count = exporter.export_vouchers_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} vouchers", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!("Exported full database: {} vouchers", snapshot.vouchers.len());
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: vouchers, full",
                export_type
            );
        }
    }

    Ok(())
}
