//! Queryable graph loaded from the serialized catalog.
//!
//! Parses the Turtle file into an in-memory SPARQL store and derives a
//! textual schema summary enumerating every class and predicate present.
//! The summary is what the language model sees of the data, so it is
//! computed once at load time and cached.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use oxigraph::sparql::{EvaluationError, QueryResults};
use oxigraph::store::{StorageError, Store};
use oxrdf::{GraphName, Quad, Term};
use oxttl::TurtleParser;
use thiserror::Error;

const CLASS_QUERY: &str = "SELECT DISTINCT ?cls WHERE { ?s a ?cls . } ORDER BY ?cls";
const PREDICATE_QUERY: &str = "SELECT DISTINCT ?rel WHERE { ?s ?rel ?o . } ORDER BY ?rel";

/// Errors from loading or querying the graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse triple file: {0}")]
    Parse(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("query failed: {0}")]
    Query(#[from] EvaluationError),

    #[error("query did not produce SELECT solutions")]
    NotASelectQuery,
}

/// An immutable, queryable view over a triple file.
pub struct RdfGraph {
    store: Store,
    schema: String,
}

impl std::fmt::Debug for RdfGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdfGraph")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl RdfGraph {
    /// Load a Turtle file into an in-memory store and derive the schema
    /// summary. A missing or malformed file is an error; there is no
    /// fallback data source.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let file = File::open(path)?;
        let store = Store::new()?;
        for result in TurtleParser::new().for_reader(BufReader::new(file)) {
            let triple = result.map_err(|e| GraphError::Parse(e.to_string()))?;
            let quad = Quad::new(
                triple.subject,
                triple.predicate,
                triple.object,
                GraphName::DefaultGraph,
            );
            store.insert(&quad)?;
        }

        let mut graph = Self {
            store,
            schema: String::new(),
        };
        graph.schema = graph.derive_schema()?;
        Ok(graph)
    }

    /// The schema summary derived at load time.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Number of facts in the store.
    pub fn len(&self) -> Result<usize, GraphError> {
        Ok(self.store.len()?)
    }

    /// Execute a SPARQL SELECT query. Each row comes back as (variable,
    /// value) pairs; IRIs render bare and literals render their lexical
    /// value, so `ORDER BY` in the query fully determines row order.
    pub fn query_select(&self, sparql: &str) -> Result<Vec<Vec<(String, String)>>, GraphError> {
        match self.store.query(sparql)? {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution?;
                    rows.push(
                        solution
                            .iter()
                            .map(|(variable, term)| {
                                (variable.as_str().to_string(), term_text(term))
                            })
                            .collect(),
                    );
                }
                Ok(rows)
            }
            _ => Err(GraphError::NotASelectQuery),
        }
    }

    fn derive_schema(&self) -> Result<String, GraphError> {
        let mut schema = String::from(
            "In the following, each IRI is followed by the local name in parentheses.\n",
        );
        schema.push_str("The RDF graph supports the following node types:\n");
        for row in self.query_select(CLASS_QUERY)? {
            for (_, iri) in row {
                schema.push_str(&format!("<{iri}> ({})\n", local_name(&iri)));
            }
        }
        schema.push_str("The RDF graph supports the following relationships:\n");
        for row in self.query_select(PREDICATE_QUERY)? {
            for (_, iri) in row {
                schema.push_str(&format!("<{iri}> ({})\n", local_name(&iri)));
            }
        }
        Ok(schema)
    }
}

/// Local part of an IRI: everything after the last `#`, or failing that the
/// last `/`.
pub fn local_name(iri: &str) -> &str {
    iri.rsplit_once('#')
        .or_else(|| iri.rsplit_once('/'))
        .map(|(_, local)| local)
        .unwrap_or(iri)
}

fn term_text(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_string(),
        Term::Literal(literal) => literal.value().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_catalog;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("pokemon.rdf");
        sample_catalog().unwrap().save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_keeps_every_fact() {
        let dir = TempDir::new().unwrap();
        let graph = RdfGraph::load(write_sample(&dir)).unwrap();
        assert_eq!(graph.len().unwrap(), 124);
    }

    #[test]
    fn test_schema_lists_every_predicate_in_the_file() {
        let dir = TempDir::new().unwrap();
        let graph = RdfGraph::load(write_sample(&dir)).unwrap();

        let kb = sample_catalog().unwrap();
        for triple in kb.graph().iter() {
            let predicate = triple.predicate.as_str();
            assert!(
                graph.schema().contains(&format!("<{predicate}>")),
                "schema is missing {predicate}"
            );
        }
    }

    #[test]
    fn test_schema_lists_classes_with_local_names() {
        let dir = TempDir::new().unwrap();
        let graph = RdfGraph::load(write_sample(&dir)).unwrap();

        assert!(graph
            .schema()
            .contains("<http://pokemon.org/pokemon_info#Pokemon> (Pokemon)"));
        assert!(graph
            .schema()
            .contains("<http://pokemon.org/pokemon_status#recommendedSolution> (recommendedSolution)"));
        assert!(graph.schema().contains("node types"));
        assert!(graph.schema().contains("relationships"));
    }

    #[test]
    fn test_select_returns_literal_values() {
        let dir = TempDir::new().unwrap();
        let graph = RdfGraph::load(write_sample(&dir)).unwrap();

        let rows = graph
            .query_select(
                r#"
                PREFIX info: <http://pokemon.org/pokemon_info#>
                SELECT ?number WHERE { ?s info:name "妙蛙種子" ; info:number ?number . }
                "#,
            )
            .unwrap();
        assert_eq!(rows, vec![vec![("number".to_string(), "002".to_string())]]);
    }

    #[test]
    fn test_duplicated_ailment_yields_two_solution_rows() {
        let dir = TempDir::new().unwrap();
        let graph = RdfGraph::load(write_sample(&dir)).unwrap();

        let rows = graph
            .query_select(
                r#"
                PREFIX status: <http://pokemon.org/pokemon_status#>
                SELECT ?solution
                WHERE { status:凍結 status:recommendedSolution ?solution . }
                ORDER BY ?solution
                "#,
            )
            .unwrap();
        let values: Vec<&str> = rows.iter().map(|row| row[0].1.as_str()).collect();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&"可以使用解凍藥"));
        assert!(values.contains(&"可以送到寶可夢中心"));
    }

    #[test]
    fn test_iris_render_bare() {
        let dir = TempDir::new().unwrap();
        let graph = RdfGraph::load(write_sample(&dir)).unwrap();

        let rows = graph
            .query_select("SELECT DISTINCT ?cls WHERE { ?s a ?cls . } ORDER BY ?cls")
            .unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert!(row[0].1.starts_with("http://pokemon.org/"));
            assert!(!row[0].1.starts_with('<'));
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = RdfGraph::load(dir.path().join("absent.rdf")).unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.rdf");
        std::fs::write(&path, "this is not turtle").unwrap();
        assert!(matches!(RdfGraph::load(&path).unwrap_err(), GraphError::Parse(_)));
    }

    #[test]
    fn test_non_select_query_is_rejected() {
        let dir = TempDir::new().unwrap();
        let graph = RdfGraph::load(write_sample(&dir)).unwrap();
        let err = graph.query_select("ASK { ?s ?p ?o }").unwrap_err();
        assert!(matches!(err, GraphError::NotASelectQuery));
    }

    #[test]
    fn test_local_name_splits_on_hash_then_slash() {
        assert_eq!(local_name("http://pokemon.org/pokemon_info#name"), "name");
        assert_eq!(local_name("http://example.org/creature"), "creature");
        assert_eq!(local_name("name"), "name");
    }
}
