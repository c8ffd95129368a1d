//! Pokémon knowledge-base QA demo.
//!
//! Rebuilds the fact catalog, writes it to `pokemon.rdf`, reloads it as a
//! queryable graph, and answers one natural-language question through the
//! SPARQL QA chain. The question is chosen by editing [`QUESTION`]; there
//! are no command-line flags.

use std::collections::HashMap;

use pokegraph_core::catalog::sample_catalog;
use pokegraph_core::chain::{ChainConfig, SparqlQaChain};
use pokegraph_core::graph::RdfGraph;
use pokegraph_core::prompt::qa_instruction_prompt;
use pokegraph_core::OpenAi;

const GRAPH_FILE: &str = "pokemon.rdf";

/// The question to ask. Other questions this data set can answer:
/// - 皮卡丘的type是什麼?
/// - 資料庫中有多少種寶可夢?
/// - 有多少種名字是五個字的寶可夢?
/// - 有什麼寶可夢不能進化?
/// - 妙蛙花是妙蛙種子的進化形態嗎?
/// - 妙蛙花是什麼type?
/// - 妙蛙花的number是多少?
const QUESTION: &str = "妙蛙種子的number是多少？";

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

    // Rebuild the catalog and replace the triple file from scratch
    let catalog = sample_catalog()?;
    catalog.save(GRAPH_FILE)?;
    println!("Wrote {} facts to {GRAPH_FILE}", catalog.len());

    let graph = RdfGraph::load(GRAPH_FILE)?;
    println!("{}", graph.schema());

    // The question goes in wrapped in the standing instructions
    let composed = qa_instruction_prompt().format(&HashMap::from([
        ("rdf_schema", graph.schema()),
        ("user_question", QUESTION),
    ]))?;

    let chain = SparqlQaChain::new(graph, OpenAi::from_env()?).with_config(ChainConfig {
        return_sparql_query: true,
        return_intermediate_steps: true,
        return_direct: true,
        verbose: true,
    });

    println!("QUESTION: {QUESTION}");
    let response = chain.ask(&composed).await?;

    println!("RESULT: {}", response.result);
    if let Some(sparql) = &response.sparql_query {
        println!("SPARQL:\n{sparql}");
    }
    if let Some(steps) = &response.intermediate_steps {
        println!("ROWS: {}", steps.raw_rows);
    }

    Ok(())
}
