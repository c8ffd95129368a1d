//! Hand-authored Pokémon fact catalog.
//!
//! Builds the fixed demo fact set in memory from literal records across three
//! families (creature info, status ailments, causal rules) and serializes it
//! to Turtle. Every run reconstructs the whole set from scratch; nothing is
//! read from an external data source.

use std::fs;
use std::path::Path;

use oxrdf::vocab::{rdf, xsd};
use oxrdf::{Graph, IriParseError, Literal, NamedNode, NamedNodeRef, TripleRef};
use oxttl::TurtleSerializer;
use thiserror::Error;

/// Namespace for creature records, keyed by creature name.
pub const INFO_NS: &str = "http://pokemon.org/pokemon_info#";
/// Namespace for status ailment records, keyed by ailment name.
pub const STATUS_NS: &str = "http://pokemon.org/pokemon_status#";
/// Namespace for cause/effect records, keyed by the triggering reason.
pub const CAUSES_NS: &str = "http://pokemon.org/pokemon_causes#";

/// Class and predicate IRIs used by the catalog. Each record family has its
/// own `Pokemon` class under its own namespace.
pub mod vocab {
    use oxrdf::NamedNodeRef;

    pub const INFO_POKEMON: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_info#Pokemon");
    pub const INFO_NAME: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_info#name");
    pub const INFO_NUMBER: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_info#number");
    pub const INFO_TYPE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_info#type");
    pub const INFO_EVOLVE_FROM: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_info#evolve_from");
    pub const INFO_EVOLVE_TO: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_info#evolve_to");

    pub const STATUS_POKEMON: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_status#Pokemon");
    pub const STATUS_NAME: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_status#name");
    pub const STATUS_CATEGORY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_status#category");
    pub const STATUS_RECOMMENDED_SOLUTION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_status#recommendedSolution");
    pub const STATUS_DESCRIPTION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_status#description");

    pub const CAUSES_POKEMON: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_causes#Pokemon");
    pub const CAUSES_REASON: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_causes#reason");
    pub const CAUSES_REACTION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_causes#reaction");
    pub const CAUSES_RESULT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_causes#result");
    pub const CAUSES_RECOMMENDED_SOLUTION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://pokemon.org/pokemon_causes#recommendedSolution");
}

/// Errors from building or serializing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid IRI: {0}")]
    InvalidIri(#[from] IriParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Accumulates facts with set semantics: re-adding an identical fact is a
/// no-op, so a repeated record only contributes the fields that actually
/// differ from the earlier one.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    graph: Graph,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a creature record under [`INFO_NS`], keyed by name.
    ///
    /// Evolution fields are free-text names; an empty string means the stage
    /// does not exist and produces no fact. The text is stored as given and
    /// never cross-checked against other records.
    pub fn add_creature(
        &mut self,
        name: &str,
        number: &str,
        elemental_type: &str,
        evolve_from: &str,
        evolve_to: &str,
    ) -> Result<(), CatalogError> {
        let subject = NamedNode::new(format!("{INFO_NS}{name}"))?;
        self.graph
            .insert(TripleRef::new(&subject, rdf::TYPE, vocab::INFO_POKEMON));
        self.insert_text(&subject, vocab::INFO_NAME, name);

        // The dex number stays an explicitly typed xsd:string so leading
        // zeros survive ("001" is not 1).
        let number = Literal::new_typed_literal(number, xsd::STRING);
        self.graph
            .insert(TripleRef::new(&subject, vocab::INFO_NUMBER, &number));

        self.insert_text(&subject, vocab::INFO_TYPE, elemental_type);
        if !evolve_from.is_empty() {
            self.insert_text(&subject, vocab::INFO_EVOLVE_FROM, evolve_from);
        }
        if !evolve_to.is_empty() {
            self.insert_text(&subject, vocab::INFO_EVOLVE_TO, evolve_to);
        }
        Ok(())
    }

    /// Add a status ailment record under [`STATUS_NS`], keyed by name.
    pub fn add_ailment(
        &mut self,
        name: &str,
        category: &str,
        recommended_solution: &str,
        description: &str,
    ) -> Result<(), CatalogError> {
        let subject = NamedNode::new(format!("{STATUS_NS}{name}"))?;
        self.graph
            .insert(TripleRef::new(&subject, rdf::TYPE, vocab::STATUS_POKEMON));
        self.insert_text(&subject, vocab::STATUS_NAME, name);
        self.insert_text(&subject, vocab::STATUS_CATEGORY, category);
        self.insert_text(
            &subject,
            vocab::STATUS_RECOMMENDED_SOLUTION,
            recommended_solution,
        );
        self.insert_text(&subject, vocab::STATUS_DESCRIPTION, description);
        Ok(())
    }

    /// Add a cause/effect record under [`CAUSES_NS`], keyed by the reason.
    pub fn add_causal_rule(
        &mut self,
        reason: &str,
        reaction: &str,
        result: &str,
        recommended_solution: &str,
    ) -> Result<(), CatalogError> {
        let subject = NamedNode::new(format!("{CAUSES_NS}{reason}"))?;
        self.graph
            .insert(TripleRef::new(&subject, rdf::TYPE, vocab::CAUSES_POKEMON));
        self.insert_text(&subject, vocab::CAUSES_REASON, reason);
        self.insert_text(&subject, vocab::CAUSES_REACTION, reaction);
        self.insert_text(&subject, vocab::CAUSES_RESULT, result);
        self.insert_text(
            &subject,
            vocab::CAUSES_RECOMMENDED_SOLUTION,
            recommended_solution,
        );
        Ok(())
    }

    fn insert_text(&mut self, subject: &NamedNode, predicate: NamedNodeRef<'_>, value: &str) {
        let object = Literal::new_simple_literal(value);
        self.graph.insert(TripleRef::new(subject, predicate, &object));
    }

    /// Number of distinct facts accumulated so far.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// The underlying triple set.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Render the accumulated facts as Turtle with the three catalog
    /// prefixes bound. Output is deterministic for an identical insertion
    /// sequence.
    pub fn to_turtle(&self) -> Result<Vec<u8>, CatalogError> {
        let mut serializer = TurtleSerializer::new()
            .with_prefix("pokemon_info", INFO_NS)?
            .with_prefix("pokemon_status", STATUS_NS)?
            .with_prefix("pokemon_causes", CAUSES_NS)?
            .for_writer(Vec::new());
        for triple in self.graph.iter() {
            serializer.serialize_triple(triple)?;
        }
        Ok(serializer.finish()?)
    }

    /// Write the serialized catalog to `path`, replacing any earlier file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        fs::write(path, self.to_turtle()?)?;
        Ok(())
    }
}

/// The full demo data set: eleven creatures, five ailments, eight causal
/// rules.
///
/// Two quirks of the source records are kept as-is. 妙蛙花's `evolve_from`
/// spells 妙蛙種子 as 妙花種子, so that reference matches no creature record.
/// Each ailment is recorded twice with a different remedy (a specific
/// medicine and the Pokémon Center), which leaves both solution facts on the
/// same subject.
pub fn sample_catalog() -> Result<KnowledgeBase, CatalogError> {
    let mut kb = KnowledgeBase::new();

    kb.add_creature("皮卡丘", "001", "雷系", "", "雷丘")?;
    kb.add_creature("妙蛙種子", "002", "草系", "", "妙蛙花")?;
    kb.add_creature("小火龍", "003", "火系", "", "火恐龍")?;
    kb.add_creature("傑尼龜", "004", "水系", "", "卡咪龜")?;
    kb.add_creature("綠毛蟲", "005", "蟲系", "", "鐵甲蛹")?;
    kb.add_creature("雷丘", "006", "雷系", "皮卡丘", "")?;
    kb.add_creature("火恐龍", "007", "火系", "小火龍", "")?;
    kb.add_creature("卡咪龜", "008", "水系", "傑尼龜", "")?;
    kb.add_creature("鐵甲蛹", "009", "蟲系", "綠毛蟲", "")?;
    kb.add_creature("妙蛙花", "010", "草系", "妙花種子", "")?;
    kb.add_creature("超夢", "011", "超能力系", "", "")?;

    kb.add_ailment("麻痺", "異常狀態", "可以使用解麻痺藥", "有機率無法行動")?;
    kb.add_ailment("中毒", "異常狀態", "可以使用解毒藥", "每回合會扣血")?;
    kb.add_ailment("睡眠", "異常狀態", "可以使用解眠藥", "無法行動")?;
    kb.add_ailment("燒傷", "異常狀態", "可以使用燒傷藥", "每回合會扣血")?;
    kb.add_ailment("凍結", "異常狀態", "可以使用解凍藥", "無法行動")?;

    kb.add_ailment("凍結", "異常狀態", "可以送到寶可夢中心", "無法行動")?;
    kb.add_ailment("中毒", "異常狀態", "可以送到寶可夢中心", "每回合會扣血")?;
    kb.add_ailment("燒傷", "異常狀態", "可以送到寶可夢中心", "每回合會扣血")?;
    kb.add_ailment("麻痺", "異常狀態", "可以送到寶可夢中心", "有機率無法行動")?;
    kb.add_ailment("睡眠", "異常狀態", "可以送到寶可夢中心", "無法行動")?;

    kb.add_causal_rule("被火屬性招式攻擊", "燒傷", "每回合會扣血", "可以使用燒傷藥")?;
    kb.add_causal_rule("被冰屬性招式攻擊", "凍結", "無法行動", "可以使用解凍藥")?;
    kb.add_causal_rule("被電屬性招式攻擊", "麻痺", "有機率無法行動", "可以使用解麻痺藥")?;
    kb.add_causal_rule("寶可夢受傷", "導致", "異常狀態", "可以送到寶可夢中心")?;
    kb.add_causal_rule("寶可夢生級至指定等級", "進化", "進化後的寶可夢", "無")?;
    kb.add_causal_rule("火系的寶可夢", "害怕水系", "受到的傷害會增加", "無")?;
    kb.add_causal_rule("水系的寶可夢", "害怕草系", "受到的傷害會增加", "無")?;
    kb.add_causal_rule("草系的寶可夢", "害怕火系", "受到的傷害會增加", "無")?;

    Ok(kb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn subject(ns: &str, key: &str) -> NamedNode {
        NamedNode::new(format!("{ns}{key}")).unwrap()
    }

    #[test]
    fn test_creature_without_evolutions_has_four_facts() {
        let mut kb = KnowledgeBase::new();
        assert!(kb.is_empty());
        kb.add_creature("X", "001", "Fire", "", "").unwrap();

        let node = subject(INFO_NS, "X");
        assert_eq!(kb.len(), 4);
        assert_eq!(kb.graph().triples_for_subject(&node).count(), 4);
        assert!(!kb.graph().iter().any(|t| {
            t.predicate == vocab::INFO_EVOLVE_FROM || t.predicate == vocab::INFO_EVOLVE_TO
        }));
    }

    #[test]
    fn test_evolution_fields_add_one_fact_each() {
        let mut kb = KnowledgeBase::new();
        kb.add_creature("A", "001", "Fire", "", "B").unwrap();
        kb.add_creature("B", "002", "Fire", "A", "").unwrap();

        assert_eq!(kb.graph().triples_for_subject(&subject(INFO_NS, "A")).count(), 5);
        assert_eq!(kb.graph().triples_for_subject(&subject(INFO_NS, "B")).count(), 5);
    }

    #[test]
    fn test_each_family_types_its_own_class() {
        let mut kb = KnowledgeBase::new();
        kb.add_creature("A", "001", "Fire", "", "").unwrap();
        kb.add_ailment("B", "cat", "fix", "desc").unwrap();
        kb.add_causal_rule("C", "react", "result", "fix").unwrap();

        let g = kb.graph();
        assert!(g.contains(TripleRef::new(&subject(INFO_NS, "A"), rdf::TYPE, vocab::INFO_POKEMON)));
        assert!(g.contains(TripleRef::new(
            &subject(STATUS_NS, "B"),
            rdf::TYPE,
            vocab::STATUS_POKEMON
        )));
        assert!(g.contains(TripleRef::new(
            &subject(CAUSES_NS, "C"),
            rdf::TYPE,
            vocab::CAUSES_POKEMON
        )));
    }

    #[test]
    fn test_number_is_a_typed_string_literal() {
        let mut kb = KnowledgeBase::new();
        kb.add_creature("X", "001", "Fire", "", "").unwrap();

        let number = Literal::new_typed_literal("001", xsd::STRING);
        assert!(kb.graph().contains(TripleRef::new(
            &subject(INFO_NS, "X"),
            vocab::INFO_NUMBER,
            &number
        )));
    }

    #[test]
    fn test_repeated_ailment_keeps_both_solutions() {
        let mut kb = KnowledgeBase::new();
        kb.add_ailment("凍結", "異常狀態", "可以使用解凍藥", "無法行動").unwrap();
        kb.add_ailment("凍結", "異常狀態", "可以送到寶可夢中心", "無法行動").unwrap();

        let node = subject(STATUS_NS, "凍結");
        let solutions = kb
            .graph()
            .triples_for_subject(&node)
            .filter(|t| t.predicate == vocab::STATUS_RECOMMENDED_SOLUTION)
            .count();
        assert_eq!(solutions, 2);
        // Type, name, category and description deduplicate; only the
        // remedies differ.
        assert_eq!(kb.graph().triples_for_subject(&node).count(), 6);
    }

    #[test]
    fn test_sample_catalog_counts() {
        let kb = sample_catalog().unwrap();
        let g = kb.graph();

        let creatures = g
            .subjects_for_predicate_object(rdf::TYPE, vocab::INFO_POKEMON)
            .count();
        let ailments = g
            .subjects_for_predicate_object(rdf::TYPE, vocab::STATUS_POKEMON)
            .count();
        let rules = g
            .subjects_for_predicate_object(rdf::TYPE, vocab::CAUSES_POKEMON)
            .count();
        assert_eq!(creatures, 11);
        assert_eq!(ailments, 5);
        assert_eq!(rules, 8);
        assert_eq!(kb.len(), 124);
    }

    #[test]
    fn test_venusaur_evolve_from_matches_no_creature_name() {
        let kb = sample_catalog().unwrap();
        let g = kb.graph();

        let reference = Literal::new_simple_literal("妙花種子");
        assert!(g.contains(TripleRef::new(
            &subject(INFO_NS, "妙蛙花"),
            vocab::INFO_EVOLVE_FROM,
            &reference
        )));
        // The text dangles: no creature record carries that exact name.
        assert_eq!(
            g.subjects_for_predicate_object(vocab::INFO_NAME, &reference).count(),
            0
        );
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let first = sample_catalog().unwrap().to_turtle().unwrap();
        let second = sample_catalog().unwrap().to_turtle().unwrap();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_save_writes_turtle_with_bound_prefixes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pokemon.rdf");
        sample_catalog().unwrap().save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("@prefix pokemon_info:"));
        assert!(text.contains("@prefix pokemon_status:"));
        assert!(text.contains("@prefix pokemon_causes:"));
        assert!(text.contains("皮卡丘"));
    }

    #[test]
    fn test_save_replaces_an_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pokemon.rdf");
        std::fs::write(&path, "stale contents").unwrap();

        sample_catalog().unwrap().save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale contents"));
        assert!(text.contains("@prefix"));
    }
}
