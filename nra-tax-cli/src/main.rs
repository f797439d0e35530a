use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, info};

use nra_tax_cli::render::{
    CountryList, DISCLAIMER, LineItemTable, ProvisionList, line_items, write_results_csv,
};
use nra_tax_cli::utils::{parse_amount, parse_capital_gains};
use nra_tax_cli::{config, csv_loader, logging};
use nra_tax_core::calculations::TaxEngine;
use nra_tax_core::{IncomeCategory, IncomeTypeCode, TaxYearConfig, TaxpayerInput, TreatyCatalog};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// U.S. federal tax estimator for non-resident alien students (Form 1040-NR).
#[derive(Debug, Parser)]
#[command(name = "nra-tax", version, about, long_about = None)]
struct Cli {
    /// TOML file with the tax-year parameters. Defaults to the 2024 schedule.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute tax for a single taxpayer.
    Compute(ComputeArgs),

    /// Compute tax for every scenario in a CSV file.
    Batch {
        /// Scenario CSV file.
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List the treaty provisions available to residents of a country.
    Provisions {
        #[arg(long)]
        country: String,
    },

    /// List countries with treaty relief.
    Countries,
}

#[derive(Debug, clap::Args)]
struct ComputeArgs {
    /// Country of tax residence, e.g. `china`, `southKorea`, `india`, `other`.
    #[arg(long)]
    country: String,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    wages: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    scholarships: Decimal,

    /// Net capital gains; a net loss counts as zero.
    #[arg(long, value_parser = parse_capital_gains, default_value = "0", allow_hyphen_values = true)]
    capital_gains: Decimal,

    #[arg(long, value_parser = parse_amount, default_value = "0")]
    charitable: Decimal,

    /// State and local income taxes paid.
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    state_local: Decimal,

    /// Income code of a treaty exemption to claim (16, 19 or 20). Repeatable.
    #[arg(long, value_parser = parse_income_code)]
    elect: Vec<IncomeTypeCode>,

    /// Tax capital gains at the treaty rate where one exists.
    #[arg(long)]
    treaty_rate_capital_gains: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
}

fn parse_income_code(s: &str) -> Result<IncomeTypeCode, String> {
    IncomeTypeCode::parse(s.trim()).ok_or_else(|| format!("unknown income code '{s}'"))
}

impl ComputeArgs {
    fn into_input(
        self,
        catalog: &TreatyCatalog,
    ) -> TaxpayerInput {
        let mut input = TaxpayerInput::new(self.country)
            .with_wages(self.wages, catalog)
            .with_scholarships(self.scholarships, catalog)
            .with_capital_gains(self.capital_gains, catalog)
            .with_charitable_distributions(self.charitable, catalog)
            .with_state_local_taxes(self.state_local, catalog);

        for code in self.elect {
            input = input.elect_exemption(code, catalog);
        }
        if self.treaty_rate_capital_gains {
            input = input.set_rate_election(IncomeCategory::CapitalGains, true);
        }
        input
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn compute(
    args: ComputeArgs,
    engine: &TaxEngine<'_>,
    catalog: &TreatyCatalog,
) -> Result<()> {
    let input = args.into_input(catalog);
    debug!(?input, "taxpayer input");

    let result = engine
        .compute(&input)
        .context("Failed to compute tax")?;

    print!(
        "{}",
        LineItemTable(&line_items(&result, &input.foreign_country))
    );
    eprintln!("\n{DISCLAIMER}");
    Ok(())
}

fn batch(
    file: &Path,
    format: OutputFormat,
    engine: &TaxEngine<'_>,
    catalog: &TreatyCatalog,
) -> Result<()> {
    let scenarios = csv_loader::load_from_file(file, catalog)
        .with_context(|| format!("Failed to load scenarios: {}", file.display()))?;
    info!("Loaded {} scenarios from {}", scenarios.len(), file.display());

    let results = scenarios
        .iter()
        .map(|s| {
            engine
                .compute(&s.input)
                .map(|result| (s, result))
                .with_context(|| format!("Failed to compute row {}", s.row))
        })
        .collect::<Result<Vec<_>>>()?;

    match format {
        OutputFormat::Table => {
            for (scenario, result) in &results {
                println!("Row {} ({})", scenario.row, scenario.input.foreign_country);
                print!(
                    "{}",
                    LineItemTable(&line_items(result, &scenario.input.foreign_country))
                );
                println!();
            }
        }
        OutputFormat::Csv => {
            write_results_csv(
                io::stdout().lock(),
                results
                    .iter()
                    .map(|(s, r)| (s.row, s.input.foreign_country.as_str(), r)),
            )
            .context("Failed to write CSV output")?;
        }
    }
    eprintln!("{DISCLAIMER}");
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_file.as_deref())?;

    let tax_year = match &cli.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => TaxYearConfig::default(),
    };
    debug!(tax_year = tax_year.tax_year, "using tax-year parameters");

    let catalog = TreatyCatalog::builtin();
    let engine = TaxEngine::new(catalog, &tax_year);

    match cli.command {
        Command::Compute(args) => compute(args, &engine, catalog),
        Command::Batch { file, format } => batch(&file, format, &engine, catalog),
        Command::Provisions { country } => {
            print!(
                "{}",
                ProvisionList {
                    catalog,
                    country: &country,
                }
            );
            Ok(())
        }
        Command::Countries => {
            print!("{}", CountryList(catalog));
            Ok(())
        }
    }
}
