//! Tests for the condition model and schema catalogue.

use dff_model::{CompareOp, Condition, Operand, Predicate, Relation, TermSet};

#[test]
fn relation_keywords_render_in_display() {
    assert_eq!(Relation::Contains.keyword(), "contains");
    assert_eq!(Relation::NotContains.to_string(), "not_contains");
}

#[test]
fn condition_display_matches_condition_language() {
    let condition = Condition::contains("Gene.refGene", TermSet::new("PRH1|GRIN2B|FAKE3"));
    assert_eq!(condition.to_string(), "Gene.refGene contains PRH1|GRIN2B|FAKE3");

    let negated = Condition::with_relation(
        Relation::NotContains,
        "Func.refGene",
        TermSet::new("intronic"),
    );
    assert_eq!(negated.to_string(), "Func.refGene not_contains intronic");
    assert_eq!(negated.relation(), Some(Relation::NotContains));
}

#[test]
fn predicate_lists_column_operands() {
    let predicate = Predicate::and(
        Predicate::compare(
            Operand::Column("CG46".to_string()),
            CompareOp::Ne,
            Operand::Column("CG46".to_string()),
        ),
        Predicate::negate(Predicate::compare(
            Operand::Column("Ref".to_string()),
            CompareOp::Eq,
            Operand::Text("G".to_string()),
        )),
    );
    assert_eq!(predicate.columns(), vec!["CG46", "CG46", "Ref"]);
    assert_eq!(predicate.to_string(), "CG46 != CG46 & ~(Ref == \"G\")");
}
