// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders ranked retrieval results into the context block handed to
//! the generation collaborator.
//!
//! Chunk results are grouped by owning paper in order of first
//! appearance; paper results become one block per paper. Absent
//! metadata lines are omitted, not blanked.

use std::collections::HashMap;

use simia_corpus::records::non_empty;

use crate::engine::{RankedChunk, RankedPaper};

const GROUP_SEPARATOR: &str = "\n\n---\n\n";

/// Render paper-level results, one block per paper.
pub fn format_paper_context(papers: &[RankedPaper]) -> String {
    let mut blocks = Vec::new();
    for (i, ranked) in papers.iter().enumerate() {
        let paper = &ranked.paper;
        let title = paper.display_title().unwrap_or(&paper.id);
        let year = paper
            .year
            .map(|y| y.to_string())
            .unwrap_or_default();
        let mut lines = vec![format!("Paper {}: {title} ({year})", i + 1)];

        if let Some(authors) = non_empty(paper.authors.as_deref()) {
            lines.push(format!("Authors: {authors}"));
        }
        if let Some(topics) = non_empty(paper.topics.as_deref()) {
            lines.push(format!("Topics: {topics}"));
        }
        if let Some(species) = non_empty(paper.animal.as_deref()) {
            lines.push(format!("Species: {species}"));
        }
        if let Some(abstract_text) = non_empty(paper.abstract_text.as_deref()) {
            lines.push(format!("Abstract: {abstract_text}"));
        }
        if let Some(url) = non_empty(paper.url.as_deref()) {
            lines.push(format!("URL: {url}"));
        }

        blocks.push(lines.join("\n"));
    }
    blocks.join(GROUP_SEPARATOR)
}

/// Render chunk-level results grouped by owning paper.
///
/// Each group leads with the metadata snapshot of its first chunk, then
/// every accepted chunk as an upper-cased section label and its text.
pub fn format_chunk_context(chunks: &[RankedChunk]) -> String {
    let mut group_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&RankedChunk>> = HashMap::new();
    for ranked in chunks {
        let paper_id = ranked.chunk.paper_id.as_str();
        groups
            .entry(paper_id)
            .or_insert_with(|| {
                group_order.push(paper_id);
                Vec::new()
            })
            .push(ranked);
    }

    let mut blocks = Vec::new();
    for paper_id in group_order {
        let group = &groups[paper_id];
        let meta = &group[0].chunk.metadata;

        let title = meta.title.as_deref().unwrap_or("Unknown");
        let year = meta.year.map(|y| y.to_string()).unwrap_or_default();
        let authors = meta.authors.as_deref().unwrap_or("Unknown");
        let mut lines = vec![
            format!("Paper: {title} ({year})"),
            format!("Authors: {authors}"),
        ];
        if let Some(species) = non_empty(meta.animal.as_deref()) {
            lines.push(format!("Species: {species}"));
        }
        if let Some(topics) = non_empty(meta.topics.as_deref()) {
            lines.push(format!("Topics: {topics}"));
        }

        for ranked in group {
            let section = ranked
                .chunk
                .section
                .as_deref()
                .unwrap_or("body")
                .to_uppercase();
            lines.push(format!("\n[{section}]\n{}", ranked.chunk.text));
        }

        blocks.push(lines.join("\n"));
    }
    blocks.join(GROUP_SEPARATOR)
}
