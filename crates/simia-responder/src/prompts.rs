// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompts and generation request assembly.
//!
//! Two system prompts exist: one for paper-grounded questions answered
//! from retrieved excerpts, one for dataset-level questions answered
//! from the statistics block. The classifier decides which applies.

use simia_core::types::{ChatTurn, GenerationRequest};

/// System prompt for paper-grounded questions.
pub const SYSTEM_PROMPT: &str = r#"You are an expert assistant for computational primatology research.
You help researchers find and understand papers about machine learning applied to non-human primate studies.

You receive EXCERPTS from papers with section labels (METHODS, RESULTS, INTRODUCTION, etc.).

IMPORTANT RULES:
1. ONLY answer based on the provided paper excerpts below
2. If you don't have relevant papers in the context, say "I don't have papers about that in my database"
3. ALWAYS cite papers by name and year: (Author et al., 2024)
4. Reference specific sections when relevant: "In the Methods section of Mueller et al. (2025)..."
5. Be specific about methods, datasets, and metrics when available
6. For implementation questions, mention if code is available
7. Be precise about species names and technical terminology

The database contains papers on:
- Topics: Face Detection (FD), Face Recognition (FR), Pose Estimation (BPE),
  Behavior Recognition (BR), Audio/Vocalization (AV), Avatar/Mesh (AM), Species ID (SI), etc.
- Species: Macaques, Chimpanzees, Gorillas, Marmosets, Baboons, Lemurs, Gibbons, and more
- Years: 2011-2025

When answering:
- Use bullet points for clarity
- Include relevant paper citations with section context
- Quote specific findings from RESULTS sections when relevant
- Describe technical approaches from METHODS sections
- Mention if code/data is available
- Note any limitations in the available information
- For comparisons, be specific about metrics and datasets used

If the user asks something unrelated to computational primatology or the papers in your database,
politely redirect them to ask about the papers instead."#;

/// System prompt for dataset-level questions answered from statistics.
pub const META_SYSTEM_PROMPT: &str = r#"You are an expert assistant for computational primatology research.
You help researchers understand the landscape of machine learning research applied to non-human primate studies.

You have access to DATASET STATISTICS that show the complete breakdown of papers in your database.
Use these statistics to answer questions about:
- Which species are most/least studied
- Research trends and gaps
- Topic distribution
- Code availability
- Year-over-year trends

IMPORTANT RULES:
1. Use the provided statistics to give accurate counts and percentages
2. When discussing underrepresented areas, cite the actual numbers
3. You can also reference the sample papers provided for specific examples
4. Be specific about what the numbers mean for the field

When answering meta-questions:
- Lead with the key statistics
- Provide specific numbers (e.g., "Only 3 papers focus on lemurs compared to 28 on macaques")
- Suggest potential research opportunities in underrepresented areas
- Mention trends across years if relevant"#;

/// Conversation turns carried into the prompt; older turns are dropped.
pub const HISTORY_WINDOW: usize = 6;

/// Assembles the generation request for one question.
///
/// The request carries at most the final [`HISTORY_WINDOW`] history
/// turns, followed by a user turn embedding the retrieved context and
/// the question.
pub fn build_request(
    context: &str,
    question: &str,
    history: &[ChatTurn],
    is_meta: bool,
    max_output_tokens: u32,
) -> GenerationRequest {
    let system_prompt = if is_meta {
        META_SYSTEM_PROMPT
    } else {
        SYSTEM_PROMPT
    };

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut messages: Vec<ChatTurn> = history[start..].to_vec();

    messages.push(ChatTurn::user(format!(
        "Based on the following papers from my database:\n\n{context}\n\n---\n\nUser question: {question}\n\nPlease answer based on the papers above. If the papers don't contain relevant information, say so."
    )));

    GenerationRequest {
        system_prompt: system_prompt.to_string(),
        messages,
        max_output_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use simia_core::types::ChatRole;

    #[test]
    fn request_embeds_context_and_question() {
        let request = build_request("Paper 1: Some Title (2024)", "what methods?", &[], false, 1024);

        assert_eq!(request.system_prompt, SYSTEM_PROMPT);
        assert_eq!(request.max_output_tokens, 1024);
        assert_eq!(request.messages.len(), 1);

        let turn = &request.messages[0];
        assert_eq!(turn.role, ChatRole::User);
        assert!(turn.content.starts_with("Based on the following papers"));
        assert!(turn.content.contains("Paper 1: Some Title (2024)"));
        assert!(turn.content.contains("User question: what methods?"));
        assert!(turn.content.contains("\n\n---\n\n"));
    }

    #[test]
    fn meta_flag_selects_statistics_prompt() {
        let request = build_request("=== DATASET STATISTICS ===", "how many papers?", &[], true, 1024);
        assert_eq!(request.system_prompt, META_SYSTEM_PROMPT);
    }

    #[test]
    fn history_clamped_to_final_six_turns() {
        let history: Vec<ChatTurn> = (0..8)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("question {i}"))
                } else {
                    ChatTurn::assistant(format!("answer {i}"))
                }
            })
            .collect();

        let request = build_request("ctx", "next question", &history, false, 512);

        // 6 history turns plus the new user turn.
        assert_eq!(request.messages.len(), 7);
        assert_eq!(request.messages[0].content, "question 2");
        assert_eq!(request.messages[5].content, "answer 7");
        assert!(request.messages[6].content.contains("next question"));
    }

    #[test]
    fn short_history_kept_whole() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let request = build_request("ctx", "q", &history, false, 512);

        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].content, "hi");
    }
}
