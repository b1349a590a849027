//! Statistics report rendering.

use madnet_domain::BatchStats;

/// Render the batch statistics as the text report
pub fn render(stats: &BatchStats) -> String {
    let mut out = String::new();

    out.push_str("madnet statistics\n");
    out.push_str("=================\n\n");

    out.push_str(&format!(
        "Communities: {}\n",
        stats.community_scores.len()
    ));
    out.push_str(&format!(
        "Questions answered: {} ({} skipped)\n\n",
        stats.total, stats.skipped
    ));

    out.push_str(&format!("Agents score: {}\n", stats.agents_score));
    out.push_str("Community scores:\n");
    for (i, score) in stats.community_scores.iter().enumerate() {
        out.push_str(&format!("    Community {}: {}\n", i + 1, score));
    }
    out.push_str(&format!("\n[Final Result] Judge score: {}\n", stats.judge_score));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_layout() {
        let stats = BatchStats {
            total: 10,
            skipped: 2,
            judge_score: 0.8,
            community_scores: vec![0.6, 0.5],
            agents_score: 0.533,
        };

        let report = render(&stats);
        assert!(report.starts_with("madnet statistics"));
        assert!(report.contains("Communities: 2"));
        assert!(report.contains("Questions answered: 10 (2 skipped)"));
        assert!(report.contains("Community 1: 0.6"));
        assert!(report.contains("Community 2: 0.5"));
        assert!(report.contains("Judge score: 0.8"));
    }
}
