//! Tool-calling agent over the knowledge-base tool.
//!
//! The loop: send the question with the tool definition, execute every tool
//! call the model requests, feed the outputs back as tool messages, and
//! repeat until the model answers in plain text.

use openai::{Message, OpenAi, Request, ToolCall};
use thiserror::Error;

use crate::llm::ChatModel;
use crate::prompt::AGENT_SYSTEM_PROMPT;
use crate::tool::SparqlTool;

/// Errors from running the agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Client(#[from] openai::Error),
}

/// One-shot question-answering agent wired to the SPARQL tool.
pub struct KbAgent<M: ChatModel> {
    client: OpenAi,
    tool: SparqlTool<M>,
    verbose: bool,
}

impl<M: ChatModel> KbAgent<M> {
    pub fn new(client: OpenAi, tool: SparqlTool<M>) -> Self {
        Self {
            client,
            tool,
            verbose: false,
        }
    }

    /// Print each tool invocation and its output while running.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Answer one question. Nothing is kept between invocations; each run
    /// starts from a fresh transcript.
    pub async fn run(&self, question: &str) -> Result<String, AgentError> {
        let mut messages = vec![
            Message::system(AGENT_SYSTEM_PROMPT),
            Message::user(question),
        ];

        loop {
            let request = Request::new(messages.clone())
                .with_temperature(0.0)
                .with_tools(vec![self.tool.definition()]);
            let response = self.client.complete(&request).await?;

            if response.tool_calls.is_empty() {
                return Ok(response.text().to_string());
            }

            messages.push(Message::assistant_tool_calls(
                response.content.clone(),
                response.tool_calls.clone(),
            ));
            for call in &response.tool_calls {
                let output = self.execute(call).await;
                if self.verbose {
                    println!("[{}] {} -> {}", call.name, call.arguments, output);
                }
                messages.push(Message::tool(call.id.clone(), output));
            }
        }
    }

    /// Execute one tool call. Failures become the tool output so the model
    /// can react to them instead of the run aborting.
    async fn execute(&self, call: &ToolCall) -> String {
        if call.name != self.tool.name() {
            return format!("error: unknown tool '{}'", call.name);
        }
        let Some(question) = call.arguments.get("question").and_then(|v| v.as_str()) else {
            return "error: missing 'question' argument".to_string();
        };
        match self.tool.run(question).await {
            Ok(answer) => answer,
            Err(e) => format!("error: {e}"),
        }
    }
}
