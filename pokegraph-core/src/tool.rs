//! Agent-facing tool wrapper over the QA chain.

use std::collections::HashMap;

use serde_json::json;

use crate::chain::{ChainError, SparqlQaChain};
use crate::llm::ChatModel;
use crate::prompt::qa_instruction_prompt;

/// Wire-visible tool name.
pub const TOOL_NAME: &str = "sparql_qa";

const TOOL_DESCRIPTION: &str = "A tool for querying the RDF knowledge base about \
Pokemon. Input is a natural language query. Output is the result from the RDF \
database. 不需要提供RDF語法，只需要提供自然語言問題即可，例如：'夢幻的type是什麼?' \
寶可夢的名字只提供使用中文來詢問，不要用英文的名字來詢問。";

/// Exposes the chain as a single callable tool: question string in, answer
/// string out. One invocation is one question; nothing is kept between
/// calls.
pub struct SparqlTool<M: ChatModel> {
    chain: SparqlQaChain<M>,
}

impl<M: ChatModel> SparqlTool<M> {
    pub fn new(chain: SparqlQaChain<M>) -> Self {
        Self { chain }
    }

    pub fn name(&self) -> &str {
        TOOL_NAME
    }

    pub fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    /// Definition handed to the model, from which it decides when the tool
    /// applies.
    pub fn definition(&self) -> openai::Tool {
        openai::Tool {
            name: TOOL_NAME.to_string(),
            description: TOOL_DESCRIPTION.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "Natural-language question about the Pokémon knowledge base"
                    }
                },
                "required": ["question"]
            }),
        }
    }

    /// Answer one question: wrap it in the instruction template together
    /// with the graph schema, then run it through the chain.
    pub async fn run(&self, question: &str) -> Result<String, ChainError> {
        let prompt = qa_instruction_prompt().format(&HashMap::from([
            ("rdf_schema", self.chain.graph().schema()),
            ("user_question", question),
        ]))?;
        let response = self.chain.ask(&prompt).await?;
        Ok(response.result)
    }
}
