//! Downloadable text artifact.

use calm_core::analysis::CompositeAnalysis;
use chrono::NaiveDate;

/// `mental-health-analysis-YYYY-MM-DD.txt`
#[must_use]
pub fn report_file_name(date: NaiveDate) -> String {
    format!("mental-health-analysis-{}.txt", date.format("%Y-%m-%d"))
}

/// Narrative followed by numbered recommendations, dated for the download.
#[must_use]
pub fn render_download(analysis: &CompositeAnalysis, date: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str(&format!("Assessment Date: {}\n\n", date.format("%Y-%m-%d")));
    out.push_str(&analysis.narrative_report);
    out.push_str("\n\n=== RECOMMENDATIONS ===\n");
    for (i, rec) in analysis.recommendations.iter().enumerate() {
        out.push_str(&format!("{}. {rec}\n", i + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use calm_core::enums::{OverallSeverity, RiskLevel};

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(report_file_name(date), "mental-health-analysis-2026-03-07.txt");
    }

    #[test]
    fn download_numbers_recommendations() {
        let analysis = CompositeAnalysis {
            overall_severity: OverallSeverity::Mild,
            risk_level: RiskLevel::Low,
            risk_flags: vec![],
            correlations: vec![],
            narrative_report: "BODY".into(),
            recommendations: vec!["First".into(), "Second".into()],
        };
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let text = render_download(&analysis, date);
        assert!(text.starts_with("Assessment Date: 2026-10-19\n\nBODY"));
        assert!(text.ends_with("1. First\n2. Second\n"));
    }
}
