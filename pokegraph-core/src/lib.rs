//! Pokémon RDF knowledge base with an LLM-driven SPARQL QA chain.
//!
//! This crate provides:
//! - A hand-authored fact catalog serialized to Turtle
//! - A queryable in-memory graph with a derived schema summary
//! - A chain that drafts, cleans, and executes SPARQL from a question
//! - A tool wrapper and agent loop for tool-calling models
//!
//! # Quick Start
//!
//! ```ignore
//! use pokegraph_core::{sample_catalog, OpenAi, RdfGraph, SparqlQaChain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     sample_catalog()?.save("pokemon.rdf")?;
//!     let graph = RdfGraph::load("pokemon.rdf")?;
//!
//!     let chain = SparqlQaChain::new(graph, OpenAi::from_env()?);
//!     let response = chain.ask("皮卡丘的type是什麼?").await?;
//!     println!("{}", response.result);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod catalog;
pub mod chain;
pub mod graph;
pub mod llm;
pub mod prompt;
pub mod testing;
pub mod tool;

// Re-export for convenience
pub use openai::OpenAi;

// Primary public API
pub use agent::{AgentError, KbAgent};
pub use catalog::{sample_catalog, CatalogError, KnowledgeBase};
pub use chain::{ChainConfig, ChainError, ChainResponse, IntermediateSteps, SparqlQaChain};
pub use graph::{GraphError, RdfGraph};
pub use llm::{ChatModel, ModelError};
pub use prompt::{PromptError, PromptTemplate};
pub use testing::ScriptedModel;
pub use tool::SparqlTool;
