//! Prompt templates for the QA chain and the agent.
//!
//! Templates are plain strings with named `{placeholder}` variables. The
//! instruction template is bilingual on purpose: the operating rules are
//! stated in both English and Traditional Chinese so the model honors them
//! regardless of which language it leans toward for the question.

use std::collections::HashMap;

use thiserror::Error;

/// Instruction block wrapped around every question before it reaches the
/// chain. It forbids code fences around the generated query, fixes the reply
/// for an empty result, and restricts answers to what the database returns.
pub const QA_INSTRUCTION_TEMPLATE: &str = r#"<instruction>
When you make the final query, remove these ``` quotes and only have the query.
若結果為空，就回答 '查無資料'
Ensure that the information is strictly based on the data retrieved from the database. Do not mention any information that does not exist in the database.
不要留下 ``` 引號，只留下查詢。
不要提及資料庫中不存在的資訊，直接將資料庫中的資訊回答即可。
</instruction>
<schema>
    the pokemon_rdf_graph schema is {rdf_schema}
</schema>
<user_question>
{user_question}
</user_question>"#;

/// Prompt for drafting a SPARQL SELECT query from the schema and a question.
pub const SPARQL_GENERATION_TEMPLATE: &str = r#"Task: Generate a SPARQL SELECT statement for querying a graph database.
Instructions:
Use only the node types and properties provided in the schema.
Do not use any node types or properties that are not explicitly provided.
Include all necessary prefixes.
Do not include any text except the SPARQL query generated.
Do not wrap the query in backticks.

Schema:
{schema}

The question is:
{question}"#;

/// Prompt for turning raw query rows into a natural-language answer.
pub const ANSWER_SYNTHESIS_TEMPLATE: &str = r#"Task: Generate a natural language response from the results of a SPARQL query.
You are an assistant that creates well-written and human understandable answers.
The information part contains the results of the query, which you can use to construct an answer.
The information is authoritative; never doubt it or try to correct it with internal knowledge.
If the information is empty, say that you don't know the answer.

Information:
{context}

Question:
{question}"#;

/// System prompt for the tool-calling agent.
pub const AGENT_SYSTEM_PROMPT: &str = "Answer the user's question as best you can. \
You have access to a tool that queries a Pokémon RDF knowledge base. Use it \
whenever the question concerns Pokémon facts, and answer from its output \
rather than from memory.";

/// Errors from rendering a template.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("missing template variable: {0}")]
    MissingVariable(String),
}

/// A prompt template with declared `{placeholder}` variables.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>, input_variables: &[&str]) -> Self {
        Self {
            template: template.into(),
            input_variables: input_variables.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Substitute every declared variable. Values are inserted verbatim; a
    /// declared variable without a value is an error.
    pub fn format(&self, values: &HashMap<&str, &str>) -> Result<String, PromptError> {
        let mut rendered = self.template.clone();
        for variable in &self.input_variables {
            let value = values
                .get(variable.as_str())
                .ok_or_else(|| PromptError::MissingVariable(variable.clone()))?;
            rendered = rendered.replace(&format!("{{{variable}}}"), value);
        }
        Ok(rendered)
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }
}

/// The instruction wrapper, expecting `rdf_schema` and `user_question`.
pub fn qa_instruction_prompt() -> PromptTemplate {
    PromptTemplate::new(QA_INSTRUCTION_TEMPLATE, &["rdf_schema", "user_question"])
}

/// The query-drafting prompt, expecting `schema` and `question`.
pub fn sparql_generation_prompt() -> PromptTemplate {
    PromptTemplate::new(SPARQL_GENERATION_TEMPLATE, &["schema", "question"])
}

/// The answer-synthesis prompt, expecting `context` and `question`.
pub fn answer_synthesis_prompt() -> PromptTemplate {
    PromptTemplate::new(ANSWER_SYNTHESIS_TEMPLATE, &["context", "question"])
}
