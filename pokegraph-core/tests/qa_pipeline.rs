//! End-to-end pipeline tests with a scripted model.
//!
//! The catalog is built, serialized, and reloaded for real, and the drafted
//! SPARQL really executes against the store; only the model calls are
//! scripted.

use std::collections::HashMap;

use pokegraph_core::catalog::sample_catalog;
use pokegraph_core::chain::{ChainConfig, SparqlQaChain};
use pokegraph_core::graph::RdfGraph;
use pokegraph_core::prompt::qa_instruction_prompt;
use pokegraph_core::testing::ScriptedModel;
use pokegraph_core::tool::SparqlTool;
use tempfile::TempDir;

fn loaded_graph(dir: &TempDir) -> RdfGraph {
    let path = dir.path().join("pokemon.rdf");
    sample_catalog().unwrap().save(&path).unwrap();
    RdfGraph::load(&path).unwrap()
}

fn all_flags() -> ChainConfig {
    ChainConfig {
        return_sparql_query: true,
        return_intermediate_steps: true,
        return_direct: true,
        verbose: false,
    }
}

#[tokio::test]
async fn test_question_flows_from_instruction_prompt_to_rows() {
    let dir = TempDir::new().unwrap();
    let graph = loaded_graph(&dir);

    let question = "妙蛙種子的number是多少？";
    let composed = qa_instruction_prompt()
        .format(&HashMap::from([
            ("rdf_schema", graph.schema()),
            ("user_question", question),
        ]))
        .unwrap();

    let model = ScriptedModel::new([r#"```sparql
PREFIX info: <http://pokemon.org/pokemon_info#>
SELECT ?number WHERE { ?s info:name "妙蛙種子" ; info:number ?number . }
```"#]);
    let probe = model.clone();
    let chain = SparqlQaChain::new(graph, model).with_config(all_flags());

    let response = chain.ask(&composed).await.unwrap();

    assert_eq!(response.result, r#"[{"number":"002"}]"#);
    let sparql = response.sparql_query.unwrap();
    assert!(sparql.starts_with("PREFIX"));
    assert!(!sparql.contains("```"));
    let steps = response.intermediate_steps.unwrap();
    assert_eq!(steps.raw_rows, response.result);

    // The drafting prompt carried the instruction block, the derived
    // schema, and the user question.
    let prompts = probe.prompts();
    assert!(prompts[0].contains("<instruction>"));
    assert!(prompts[0].contains("pokemon_info#name"));
    assert!(prompts[0].contains(question));
}

#[tokio::test]
async fn test_duplicated_remedies_both_reach_the_answer() {
    let dir = TempDir::new().unwrap();
    let graph = loaded_graph(&dir);

    let model = ScriptedModel::new([r#"PREFIX status: <http://pokemon.org/pokemon_status#>
SELECT ?solution WHERE { status:凍結 status:recommendedSolution ?solution . } ORDER BY ?solution"#]);
    let chain = SparqlQaChain::new(graph, model).with_config(all_flags());

    let response = chain.ask("凍結了怎麼辦？").await.unwrap();
    assert!(response.result.contains("可以使用解凍藥"));
    assert!(response.result.contains("可以送到寶可夢中心"));
}

#[tokio::test]
async fn test_empty_result_renders_as_an_empty_array() {
    let dir = TempDir::new().unwrap();
    let graph = loaded_graph(&dir);

    let model = ScriptedModel::new([r#"PREFIX info: <http://pokemon.org/pokemon_info#>
SELECT ?number WHERE { ?s info:name "夢幻" ; info:number ?number . }"#]);
    let chain = SparqlQaChain::new(graph, model).with_config(all_flags());

    let response = chain.ask("夢幻的number是多少？").await.unwrap();
    assert_eq!(response.result, "[]");
}

#[tokio::test]
async fn test_tool_run_returns_the_chain_result() {
    let dir = TempDir::new().unwrap();
    let graph = loaded_graph(&dir);

    let model = ScriptedModel::new([r#"PREFIX info: <http://pokemon.org/pokemon_info#>
SELECT ?type WHERE { ?s info:name "皮卡丘" ; info:type ?type . }"#]);
    let chain = SparqlQaChain::new(graph, model).with_config(all_flags());
    let tool = SparqlTool::new(chain);

    let answer = tool.run("皮卡丘的type是什麼？").await.unwrap();
    assert_eq!(answer, r#"[{"type":"雷系"}]"#);
}

#[tokio::test]
async fn test_misspelled_evolution_link_dangles_at_query_time() {
    let dir = TempDir::new().unwrap();
    let graph = loaded_graph(&dir);

    // 妙蛙花's evolve_from text does not match any recorded creature name,
    // so joining through it finds nothing.
    let model = ScriptedModel::new([r#"PREFIX info: <http://pokemon.org/pokemon_info#>
SELECT ?number
WHERE {
  ?v info:name "妙蛙花" ; info:evolve_from ?from .
  ?p info:name ?from ; info:number ?number .
}"#]);
    let chain = SparqlQaChain::new(graph, model).with_config(all_flags());

    let response = chain.ask("妙蛙花是從幾號寶可夢進化來的？").await.unwrap();
    assert_eq!(response.result, "[]");
}
