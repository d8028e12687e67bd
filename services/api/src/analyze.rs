use chrono::{Local, NaiveDate};
use clap::Args;
use rental_eval::analysis::{
    render_report, AnalysisRequest, CalculationMode, CapRateAnalyzer, ExpenseOverrides,
    PropertyAttributes,
};
use rental_eval::comparables::{import, ComparableProvider, StaticComparables};
use rental_eval::config::AppConfig;
use rental_eval::error::AppError;
use rental_eval::properties::PropertyLoadError;
use rental_eval::service::AnalysisOutcome;
use rental_eval::Lookup;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Property record as a JSON object (or an array whose first entry is used)
    #[arg(long)]
    pub(crate) property: PathBuf,
    /// Optional CSV export of rental comparables
    #[arg(long)]
    pub(crate) comparables: Option<PathBuf>,
    /// Known monthly rent; skips rent estimation
    #[arg(long)]
    pub(crate) monthly_rent: Option<f64>,
    /// NOI calculation mode: gross or net
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<CalculationMode>,
    /// Target cap rate percentage (defaults to the configured threshold)
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
    /// Reference date for sale recency (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Annual property tax override
    #[arg(long)]
    pub(crate) taxes_annual: Option<f64>,
    /// Monthly HOA fee override
    #[arg(long)]
    pub(crate) hoa_monthly: Option<f64>,
    /// Print the full analysis as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let property = load_property(&args.property)?;

    let mut request = AnalysisRequest::new(args.as_of.unwrap_or_else(|| Local::now().date_naive()))
        .with_mode(args.mode.unwrap_or_default());
    if let Some(rent) = args.monthly_rent {
        request = request.with_monthly_rent(rent);
    }
    if let Some(threshold) = args.threshold {
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(AppError::InvalidInput(
                "--threshold must be a positive percentage".to_string(),
            ));
        }
        request = request.with_threshold(threshold);
    }
    if args.taxes_annual.is_some() || args.hoa_monthly.is_some() {
        request = request.with_overrides(ExpenseOverrides {
            taxes_annual: args.taxes_annual,
            hoa_monthly: args.hoa_monthly,
            ..ExpenseOverrides::default()
        });
    }
    if let Some(path) = args.comparables.as_deref() {
        let provider = StaticComparables::new(import::from_path(path)?);
        match provider.comparables(&property) {
            Lookup::Found(found) => request = request.with_comparables(found),
            Lookup::Unavailable { reason } => {
                eprintln!("comparables ignored: {reason}");
            }
        }
    }

    let result = CapRateAnalyzer::new(config.analysis).analyze(&property, &request);
    let report = render_report(&property, &result);

    if args.json {
        let outcome = AnalysisOutcome {
            property,
            result,
            report,
        };
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{report}");
    }

    Ok(())
}

fn parse_mode(raw: &str) -> Result<CalculationMode, String> {
    raw.parse()
}

/// Accepts a bare record or a property export array.
fn load_property(path: &Path) -> Result<PropertyAttributes, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw).map_err(PropertyLoadError::from)?;
    let record = match value {
        Value::Array(items) => items.into_iter().next().ok_or_else(|| {
            AppError::InvalidInput(format!("{} contains no property records", path.display()))
        })?,
        other => other,
    };
    Ok(serde_json::from_value(record).map_err(PropertyLoadError::from)?)
}
