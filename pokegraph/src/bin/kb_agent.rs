//! Tool-calling agent demo.
//!
//! Instead of sending the question straight into the chain, this hands it to
//! a tool-calling model that decides when to consult the knowledge base,
//! queries it through the SPARQL tool, and phrases the final answer from the
//! tool output.

use pokegraph_core::agent::KbAgent;
use pokegraph_core::catalog::sample_catalog;
use pokegraph_core::chain::{ChainConfig, SparqlQaChain};
use pokegraph_core::graph::RdfGraph;
use pokegraph_core::tool::SparqlTool;
use pokegraph_core::OpenAi;

const GRAPH_FILE: &str = "pokemon.rdf";

/// The question to ask. Other questions worth trying through the agent:
/// - 皮卡丘的type是什麼？
/// - 資料庫中有多少種寶可夢？
/// - 我的火恐龍被水屬性招式攻擊會怎麼樣？
/// - 我的皮卡丘被冰屬性招式攻擊可能會怎麼樣？
const QUESTION: &str = "我的皮卡丘被冰屬性招式攻擊可能會導致什麼異常狀態？";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Check for API key
    if std::env::var("OPENAI_API_KEY").is_err() {
        eprintln!("Error: OPENAI_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export OPENAI_API_KEY=your_key_here");
        std::process::exit(1);
    }

    sample_catalog()?.save(GRAPH_FILE)?;
    let graph = RdfGraph::load(GRAPH_FILE)?;

    let chain = SparqlQaChain::new(graph, OpenAi::from_env()?).with_config(ChainConfig {
        return_direct: true,
        verbose: true,
        ..ChainConfig::default()
    });
    let agent = KbAgent::new(OpenAi::from_env()?, SparqlTool::new(chain)).with_verbose(true);

    println!("User question: {QUESTION}");
    let answer = agent.run(QUESTION).await?;
    println!("Final Answer: {answer}");

    Ok(())
}
