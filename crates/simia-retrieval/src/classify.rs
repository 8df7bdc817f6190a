// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical classifier for dataset-level questions.
//!
//! Questions about the corpus as a whole ("how many papers use
//! macaques?") are answered from aggregate statistics instead of
//! semantic retrieval. Classification is plain substring matching on a
//! fixed keyword list; false positives are tolerated, and a keyword hit
//! always wins even when the question also names a single paper.

/// Phrases that mark a question as being about the dataset itself.
pub const META_KEYWORDS: [&str; 20] = [
    "how many",
    "statistics",
    "underrepresented",
    "gaps",
    "trends",
    "most common",
    "least common",
    "overview",
    "summary",
    "distribution",
    "breakdown",
    "total",
    "count",
    "popular",
    "rare",
    "missing",
    "what species",
    "which species",
    "all papers",
    "dataset",
];

/// True when the lower-cased question contains any meta keyword.
pub fn is_meta_question(question: &str) -> bool {
    let lowered = question.to_lowercase();
    META_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
