//! Text rendering of an analysis report.

use psl_core::{AdviceItem, Band, Metric, Report, BANDS};
use std::fmt;

const BAR_WIDTH: usize = 20;

fn bar(value: f64) -> String {
    let filled = ((value / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Human-readable report with the given (already filtered) advice.
pub struct ReportText<'a> {
    pub report: &'a Report,
    pub advice: &'a [&'a AdviceItem],
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.report.scores;
        let band = self.report.band;
        writeln!(f, "Score      {:.1} / 10  {} ({})", s.overall, band.label, band.top_percent)?;
        writeln!(f, "Potential  {:.1} / 10", s.potential)?;
        writeln!(f)?;

        for metric in Metric::ALL {
            let v = s.get(metric);
            writeln!(f, "  {:<18} {:>5.1}  {}", metric.label(), v, bar(v))?;
        }

        if self.advice.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "Advice")?;
        for (i, item) in self.advice.iter().enumerate() {
            writeln!(
                f,
                "  {}. [P{}] {} ({}, {}) {} in {}",
                i + 1,
                item.priority,
                item.title,
                item.category,
                item.difficulty,
                item.expected_gain,
                item.timeline
            )?;
            writeln!(f, "     {}", item.description)?;
        }
        Ok(())
    }
}

/// The band table, one band per line.
pub struct BandTable;

impl fmt::Display for BandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for Band {
            min,
            max,
            label,
            color,
            top_percent,
        } in BANDS.iter()
        {
            writeln!(f, "{min:>4.1} - {max:>4.1}  {label:<16} {top_percent:<10} {color}")?;
        }
        Ok(())
    }
}
