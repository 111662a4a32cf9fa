//! Retrieval agent: builds a knowledge-base context block and fills a prompt
//! template before delegating to a language model.
//!
//! [`RagAgent`] is a thin composition layer over
//! [`DocumentStore`](crate::store::DocumentStore). It never touches the
//! vector index directly.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::document::{MetadataFilter, SearchResult};
use crate::error::{RagError, Result};
use crate::store::DocumentStore;

/// The fixed response when a search produced no results.
pub const NO_RESULTS_MESSAGE: &str = "No relevant documents found in the knowledge base.";

/// Instructional suffix appended to every generated prompt.
const PROMPT_SUFFIX: &str = "Use the provided context and knowledge base information to give a \
     comprehensive and accurate response. If the knowledge base contains relevant information, \
     incorporate it into your response. If the knowledge base doesn't contain relevant \
     information, rely on your general knowledge but mention this limitation.";

/// A text-generation capability invoked once per retrieval-augmented call.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// An agent that grounds language-model output in retrieved passages.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use ragkit::RagAgent;
///
/// let mut agent = RagAgent::new("materials science", "Summarize recent findings.", store)
///     .with_model(Arc::new(model));
/// let answer = agent.get_output_with_rag(Some("grain boundary diffusion"), None).await?;
/// ```
pub struct RagAgent {
    role: String,
    base_prompt: String,
    enhanced_prompt: Option<String>,
    context: String,
    store: Arc<DocumentStore>,
    model: Option<Arc<dyn LanguageModel>>,
    retrieved: Vec<SearchResult>,
}

impl RagAgent {
    /// Create an agent with the given role and base prompt over a document
    /// store. No language model is configured yet; search and context
    /// building work without one.
    pub fn new(
        role: impl Into<String>,
        base_prompt: impl Into<String>,
        store: Arc<DocumentStore>,
    ) -> Self {
        Self {
            role: role.into(),
            base_prompt: base_prompt.into(),
            enhanced_prompt: None,
            context: String::new(),
            store,
            model: None,
            retrieved: Vec::new(),
        }
    }

    /// Attach a language model.
    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set an enhanced prompt that replaces the base prompt as the task.
    pub fn set_enhanced_prompt(&mut self, prompt: impl Into<String>) {
        self.enhanced_prompt = Some(prompt.into());
    }

    /// Set the pre-existing conversational/task context.
    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    /// The result set of the most recent knowledge-base search.
    pub fn last_retrieved(&self) -> &[SearchResult] {
        &self.retrieved
    }

    /// Search the knowledge base and cache the results on the agent.
    pub async fn search_knowledge_base(
        &mut self,
        query: &str,
        n_results: Option<usize>,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        self.retrieved = self.store.search_documents(query, n_results, filter).await?;
        Ok(self.retrieved.clone())
    }

    /// Run a search and render the results as a human-readable context block.
    ///
    /// Returns [`NO_RESULTS_MESSAGE`] when the search comes back empty, never
    /// an empty string.
    pub async fn build_context_from_search(
        &mut self,
        query: &str,
        n_results: Option<usize>,
    ) -> Result<String> {
        self.build_context(query, n_results, None).await
    }

    async fn build_context(
        &mut self,
        query: &str,
        n_results: Option<usize>,
        filter: Option<&MetadataFilter>,
    ) -> Result<String> {
        let results = self.search_knowledge_base(query, n_results, filter).await?;

        if results.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let mut parts = vec!["Retrieved Knowledge Base Information:".to_string()];
        for (i, result) in results.iter().enumerate() {
            let source = match result.metadata.source.as_str() {
                "" => "Unknown",
                source => source,
            };
            parts.push(format!("\n--- Document {} (Score: {:.3}) ---", i + 1, result.score));
            parts.push(format!("Source: {source}"));
            parts.push(format!("Content: {}", result.content));
        }
        Ok(parts.join("\n"))
    }

    /// Generate a retrieval-augmented answer.
    ///
    /// Uses `user_query` as the search query when given, otherwise the base
    /// prompt. The retrieved-knowledge block is appended after any
    /// pre-existing context, the enhanced prompt replaces the base prompt
    /// when set, and the filled template goes to the configured model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MissingModel`] if no language model is configured;
    /// in that case no search or embedding call is made.
    pub async fn get_output_with_rag(
        &mut self,
        user_query: Option<&str>,
        filter: Option<&MetadataFilter>,
    ) -> Result<String> {
        let model = self.model.clone().ok_or(RagError::MissingModel)?;

        let search_query = user_query.unwrap_or(&self.base_prompt).to_string();
        let rag_context = self.build_context(&search_query, None, filter).await?;

        let combined_context = if self.context.is_empty() {
            rag_context
        } else {
            format!("{}\n\n{rag_context}", self.context)
        };

        let task = self.enhanced_prompt.as_deref().unwrap_or(&self.base_prompt);
        let prompt = format!(
            "You are an expert in {role}.\n\n\
             CONTEXT AND KNOWLEDGE BASE:\n{combined_context}\n\n\
             TASK:\n{task}\n\n\
             {PROMPT_SUFFIX}",
            role = self.role,
        );

        let output = model.generate(&prompt).await?;
        info!(role = %self.role, retrieved = self.retrieved.len(), "generated grounded output");
        Ok(output)
    }
}
