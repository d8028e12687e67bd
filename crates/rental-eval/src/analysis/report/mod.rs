mod format;
mod insights;
mod narrative;

pub use format::{count, currency, percent};
pub use insights::{generate_insights, ExpenseBand, RentToValueBand, ReportInsights};
pub use narrative::render_report;
