//! LLM-driven SPARQL question-answering chain.
//!
//! One question flows through four steps: draft a SPARQL query from the
//! graph schema and the question, strip any markdown code fences the model
//! left anyway, execute the query against the store, then either hand the
//! rendered rows back directly or run a second model call that phrases them
//! as a natural-language answer.

use std::collections::HashMap;

use thiserror::Error;

use crate::graph::{GraphError, RdfGraph};
use crate::llm::{ChatModel, ModelError};
use crate::prompt::{answer_synthesis_prompt, sparql_generation_prompt, PromptError};

/// Errors from running the chain.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Construction-time output controls. All off by default.
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    /// Attach the generated SPARQL query to the response.
    pub return_sparql_query: bool,
    /// Attach the generated query and the raw rows to the response.
    pub return_intermediate_steps: bool,
    /// Skip answer synthesis and return the rendered rows as the result.
    pub return_direct: bool,
    /// Print the generated query and the raw rows to stdout while running.
    pub verbose: bool,
}

/// Answer to one question, with optional diagnostics per [`ChainConfig`].
#[derive(Debug, Clone)]
pub struct ChainResponse {
    pub result: String,
    pub sparql_query: Option<String>,
    pub intermediate_steps: Option<IntermediateSteps>,
}

/// What the chain did on the way to the answer.
#[derive(Debug, Clone)]
pub struct IntermediateSteps {
    pub sparql_query: String,
    pub raw_rows: String,
}

/// Question-answering chain over a loaded graph and a chat model.
pub struct SparqlQaChain<M: ChatModel> {
    graph: RdfGraph,
    model: M,
    config: ChainConfig,
}

impl<M: ChatModel> SparqlQaChain<M> {
    pub fn new(graph: RdfGraph, model: M) -> Self {
        Self {
            graph,
            model,
            config: ChainConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn graph(&self) -> &RdfGraph {
        &self.graph
    }

    /// Answer a question.
    ///
    /// The question string may carry instructions ahead of the question
    /// proper; the whole string goes into the drafting prompt unchanged.
    /// The drafted query is executed as-is, with no validation and no
    /// retry, so a query the store rejects fails the call.
    pub async fn ask(&self, question: &str) -> Result<ChainResponse, ChainError> {
        let generation_prompt = sparql_generation_prompt().format(&HashMap::from([
            ("schema", self.graph.schema()),
            ("question", question),
        ]))?;
        let draft = self.model.generate(&generation_prompt).await?;
        let sparql = strip_code_fences(&draft);
        if self.config.verbose {
            println!("Generated SPARQL:\n{sparql}");
        }

        let rows = self.graph.query_select(&sparql)?;
        let raw_rows = render_rows(&rows);
        if self.config.verbose {
            println!("Query rows:\n{raw_rows}");
        }

        let result = if self.config.return_direct {
            raw_rows.clone()
        } else {
            let synthesis_prompt = answer_synthesis_prompt().format(&HashMap::from([
                ("context", raw_rows.as_str()),
                ("question", question),
            ]))?;
            self.model.generate(&synthesis_prompt).await?
        };

        Ok(ChainResponse {
            result,
            sparql_query: self.config.return_sparql_query.then(|| sparql.clone()),
            intermediate_steps: self.config.return_intermediate_steps.then(|| {
                IntermediateSteps {
                    sparql_query: sparql,
                    raw_rows,
                }
            }),
        })
    }
}

/// Remove markdown code fences from a model draft, tolerating a language tag
/// after the opening fence and prose around the fenced block. Text without
/// fences passes through trimmed.
pub(crate) fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed.to_string();
    };
    let after = &trimmed[start + 3..];
    let inner = match after.rfind("```") {
        Some(end) => &after[..end],
        None => after,
    };
    let inner = inner.trim_start();
    let inner = inner
        .strip_prefix("sparql")
        .or_else(|| inner.strip_prefix("SPARQL"))
        .unwrap_or(inner);
    inner.trim().to_string()
}

/// Render SELECT rows as a JSON array, one object per row mapping variable
/// names to values. An empty result renders as `[]`.
fn render_rows(rows: &[Vec<(String, String)>]) -> String {
    let array: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            let mut object = serde_json::Map::new();
            for (variable, value) in row {
                object.insert(variable.clone(), serde_json::Value::String(value.clone()));
            }
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::Value::Array(array).to_string()
}
