// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dataset-level statistics for meta-questions.
//!
//! Computed once from the loaded papers and read-only thereafter.
//! Frequency tables keep descending-count order with ties broken by
//! first-seen corpus order, so rendering is deterministic.

use std::collections::HashMap;

use crate::records::{Paper, non_empty};

/// Derived snapshot of corpus-wide counts.
#[derive(Debug, Clone, Default)]
pub struct DatasetStats {
    pub total_papers: usize,
    pub papers_with_code: usize,
    pub papers_with_abstracts: usize,
    /// Species frequency table, most studied first.
    pub by_species: Vec<(String, usize)>,
    /// Topic frequency table, most common first.
    pub by_topic: Vec<(String, usize)>,
    /// Year frequency table, most recent first.
    pub by_year: Vec<(u16, usize)>,
    pub most_studied_species: Vec<(String, usize)>,
    pub least_studied_species: Vec<(String, usize)>,
    pub most_common_topics: Vec<(String, usize)>,
}

impl DatasetStats {
    pub fn compute(papers: &[Paper]) -> Self {
        if papers.is_empty() {
            return Self::default();
        }

        // Papers with no species field at all land under "Unknown";
        // an explicitly empty field contributes nothing.
        let by_species = count_tags(papers, |p| p.animal.as_deref(), Some("Unknown"));
        let by_topic = count_tags(papers, |p| p.topics.as_deref(), None);

        let mut year_counts: HashMap<u16, usize> = HashMap::new();
        for paper in papers {
            if let Some(year) = paper.year {
                *year_counts.entry(year).or_insert(0) += 1;
            }
        }
        let mut by_year: Vec<(u16, usize)> = year_counts.into_iter().collect();
        by_year.sort_by(|a, b| b.0.cmp(&a.0));

        let most_studied_species = by_species.iter().take(5).cloned().collect();
        let least_studied_species =
            by_species[by_species.len().saturating_sub(5)..].to_vec();
        let most_common_topics = by_topic.iter().take(5).cloned().collect();

        Self {
            total_papers: papers.len(),
            papers_with_code: papers.iter().filter(|p| p.has_code()).count(),
            papers_with_abstracts: papers.iter().filter(|p| p.has_abstract()).count(),
            by_species,
            by_topic,
            by_year,
            most_studied_species,
            least_studied_species,
            most_common_topics,
        }
    }

    /// Render the statistics as the context block for meta-questions.
    ///
    /// Empty when no papers are loaded. The year table is truncated to
    /// the ten most recent years.
    pub fn render(&self) -> String {
        if self.total_papers == 0 {
            return String::new();
        }

        let mut lines = vec![
            "=== DATASET STATISTICS ===".to_string(),
            format!("Total papers in database: {}", self.total_papers),
            format!(
                "Papers with source code available: {}",
                self.papers_with_code
            ),
            format!("Papers with abstracts: {}", self.papers_with_abstracts),
            String::new(),
            "Papers by species (most to least studied):".to_string(),
        ];

        for (species, count) in &self.by_species {
            lines.push(format!("  - {species}: {count} papers"));
        }

        lines.push(String::new());
        lines.push("Papers by topic:".to_string());
        for (topic, count) in &self.by_topic {
            lines.push(format!("  - {topic}: {count} papers"));
        }

        lines.push(String::new());
        lines.push("Papers by year:".to_string());
        for (year, count) in self.by_year.iter().take(10) {
            lines.push(format!("  - {year}: {count} papers"));
        }

        lines.join("\n")
    }
}

/// Count comma-joined tags across papers, preserving first-seen order for
/// ties after the stable descending sort.
fn count_tags(
    papers: &[Paper],
    field: impl Fn(&Paper) -> Option<&str>,
    missing_default: Option<&str>,
) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for paper in papers {
        let raw = match field(paper) {
            Some(value) => value,
            None => match missing_default {
                Some(default) => default,
                None => continue,
            },
        };
        for tag in raw.split(',') {
            let Some(tag) = non_empty(Some(tag)) else {
                continue;
            };
            match counts.get_mut(tag) {
                Some(count) => *count += 1,
                None => {
                    order.push(tag.to_string());
                    counts.insert(tag.to_string(), 1);
                }
            }
        }
    }

    let mut table: Vec<(String, usize)> = order
        .into_iter()
        .map(|tag| {
            let count = counts[&tag];
            (tag, count)
        })
        .collect();
    // Stable sort keeps first-seen order within equal counts.
    table.sort_by(|a, b| b.1.cmp(&a.1));
    table
}
