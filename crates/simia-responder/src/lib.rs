// SPDX-FileCopyrightText: 2026 Simia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Answer generation for the Simia paper-chat backend.
//!
//! [`Responder`] turns retrieved context and a question into an answer,
//! either through the configured generation collaborator or through a
//! deterministic local fallback when none is available. Generation
//! failures on the non-streaming path degrade to the fallback as well;
//! they are logged, never surfaced as request errors.

pub mod prompts;

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, warn};

use simia_core::traits::GenerationProvider;
use simia_core::types::{ChatTurn, GenerationChunk};
use simia_core::SimiaError;

/// Characters of context shown in the non-streaming fallback answer.
const FALLBACK_CONTEXT_CHARS: usize = 2000;

const NO_CONTEXT_ANSWER: &str = "I don't have papers about that in my database. Try asking about topics like face recognition, pose estimation, or behavior analysis in primates.";

const STREAM_FALLBACK_TEXT: &str =
    "This is a local preview. In production, this would stream from Gemini.";

const STREAM_WORD_DELAY: Duration = Duration::from_millis(50);

/// One event of an answer stream.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerEvent {
    /// A fragment of generated text.
    Text(String),
    /// Normal end of the answer.
    Done,
    /// Collaborator failure; the stream ends after this event.
    Error(String),
}

/// Event stream returned by [`Responder::answer_stream`].
pub type AnswerStream = Pin<Box<dyn Stream<Item = AnswerEvent> + Send>>;

type ChunkStream = Pin<Box<dyn Stream<Item = Result<GenerationChunk, SimiaError>> + Send>>;

/// Turns retrieved context and a question into an answer.
pub struct Responder {
    provider: Option<Arc<dyn GenerationProvider>>,
    max_output_tokens: u32,
}

impl Responder {
    pub fn new(provider: Option<Arc<dyn GenerationProvider>>, max_output_tokens: u32) -> Self {
        Self {
            provider,
            max_output_tokens,
        }
    }

    /// True when a generation collaborator is configured.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Produces a complete answer for one question.
    pub async fn answer(
        &self,
        question: &str,
        context: &str,
        history: &[ChatTurn],
        is_meta: bool,
    ) -> String {
        if let Some(provider) = &self.provider {
            let request =
                prompts::build_request(context, question, history, is_meta, self.max_output_tokens);
            match provider.complete(request).await {
                Ok(response) => {
                    if let Some(usage) = response.usage {
                        debug!(
                            model = response.model,
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "generation complete"
                        );
                    }
                    return response.text;
                }
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        error = %err,
                        "generation failed, answering with local fallback"
                    );
                }
            }
        }

        fallback_answer(context)
    }

    /// Produces a lazy event stream for one question.
    ///
    /// Events arrive as zero or more [`AnswerEvent::Text`] fragments
    /// followed by [`AnswerEvent::Done`]; a collaborator failure emits
    /// [`AnswerEvent::Error`] instead and ends the stream.
    pub async fn answer_stream(
        &self,
        question: &str,
        context: &str,
        history: &[ChatTurn],
        is_meta: bool,
    ) -> AnswerStream {
        let Some(provider) = &self.provider else {
            return fallback_stream();
        };

        let request =
            prompts::build_request(context, question, history, is_meta, self.max_output_tokens);
        match provider.stream(request).await {
            Ok(chunks) => adapt_chunks(chunks),
            Err(err) => {
                warn!(
                    provider = provider.name(),
                    error = %err,
                    "generation stream failed to start"
                );
                Box::pin(stream::iter([AnswerEvent::Error(err.to_string())]))
            }
        }
    }
}

enum StreamState {
    Streaming(ChunkStream),
    Finished,
}

/// Adapts collaborator chunks into answer events.
///
/// Chunks without text (finish markers, usage reports) produce no
/// event. An error item becomes the final event; no `Done` follows it.
fn adapt_chunks(chunks: ChunkStream) -> AnswerStream {
    let events = stream::unfold(StreamState::Streaming(chunks), |state| async move {
        match state {
            StreamState::Streaming(mut chunks) => loop {
                match chunks.next().await {
                    Some(Ok(chunk)) => {
                        if let Some(text) = chunk.text
                            && !text.is_empty()
                        {
                            return Some((
                                AnswerEvent::Text(text),
                                StreamState::Streaming(chunks),
                            ));
                        }
                    }
                    Some(Err(err)) => {
                        warn!(error = %err, "generation stream failed mid-answer");
                        return Some((
                            AnswerEvent::Error(err.to_string()),
                            StreamState::Finished,
                        ));
                    }
                    None => return Some((AnswerEvent::Done, StreamState::Finished)),
                }
            },
            StreamState::Finished => None,
        }
    });

    Box::pin(events)
}

/// Simulated word-by-word stream used when no collaborator is configured.
fn fallback_stream() -> AnswerStream {
    let words: Vec<String> = STREAM_FALLBACK_TEXT
        .split_whitespace()
        .map(|word| format!("{word} "))
        .collect();

    let events = stream::unfold(
        (words.into_iter(), false),
        |(mut words, finished)| async move {
            if finished {
                return None;
            }
            match words.next() {
                Some(word) => {
                    tokio::time::sleep(STREAM_WORD_DELAY).await;
                    Some((AnswerEvent::Text(word), (words, false)))
                }
                None => Some((AnswerEvent::Done, (words, true))),
            }
        },
    );

    Box::pin(events)
}

/// Deterministic answer used when no collaborator is available.
fn fallback_answer(context: &str) -> String {
    if context.trim().is_empty() {
        return NO_CONTEXT_ANSWER.to_string();
    }

    let excerpt: String = context.chars().take(FALLBACK_CONTEXT_CHARS).collect();
    format!(
        "Based on the papers in my database, here's what I found relevant to your question:\n\n{excerpt}...\n\nNote: This is a local preview. In production, this would use Gemini for a more natural response."
    )
}
