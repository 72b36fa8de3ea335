//! Tests for formula evaluation and recalculation through a Sheet

use calxy::prelude::*;
use calxy::{evaluate, parse_formula, BinaryOperator, EvaluationContext};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn addr(a1: &str) -> CellAddress {
    CellAddress::parse(a1).unwrap()
}

fn value(sheet: &Sheet, a1: &str) -> CellValue {
    sheet.value(addr(a1))
}

fn sheet_with(cells: &[(&str, &str)]) -> Sheet {
    let mut sheet = Sheet::new();
    for (a1, raw) in cells {
        sheet.set_cell(a1, *raw).unwrap();
    }
    sheet
}

/// Test basic formula evaluation without cell references
#[test]
fn test_evaluate_simple_formulas() {
    let ctx = EvaluationContext::simple();

    let ast = parse_formula("=2+3*4").unwrap().unwrap();
    assert_eq!(evaluate(&ast, &ctx), CellValue::Number(14.0));

    let ast = parse_formula("=10-2-3").unwrap().unwrap();
    assert_eq!(evaluate(&ast, &ctx), CellValue::Number(5.0));

    let ast = parse_formula("=5>3").unwrap().unwrap();
    assert_eq!(evaluate(&ast, &ctx), CellValue::Boolean(true));
}

/// Test the AST shape of simple formulas
#[test]
fn test_parse_shapes() {
    assert_eq!(
        parse_formula("=5+C3").unwrap(),
        Some(FormulaExpr::binary(
            FormulaExpr::Number(5.0),
            BinaryOperator::Add,
            FormulaExpr::cell(2, 2),
        ))
    );
    assert_eq!(parse_formula("=BC23").unwrap(), Some(FormulaExpr::cell(54, 22)));

    match parse_formula("=A1+B1>C1").unwrap() {
        Some(FormulaExpr::BinaryOp { op, .. }) => assert_eq!(op, BinaryOperator::GreaterThan),
        other => panic!("expected a comparison, got {:?}", other),
    }
}

/// Test the sheet from the demo: numbers, text, a formula and an error
#[test]
fn test_basic_sheet() {
    let sheet = sheet_with(&[
        ("A1", "10"),
        ("B1", "20"),
        ("C1", "=A1+B1"),
        ("A2", "Hello"),
        ("B2", "=(2+3)*A1"),
        ("C2", "=A1/0"),
    ]);

    assert_eq!(value(&sheet, "C1"), CellValue::Number(30.0));
    assert_eq!(value(&sheet, "A2"), CellValue::text("Hello"));
    assert_eq!(value(&sheet, "B2"), CellValue::Number(50.0));
    assert_eq!(value(&sheet, "C2"), CellValue::Error(CellError::Div0));
}

#[test]
fn test_operator_precedence_in_sheet() {
    let sheet = sheet_with(&[("A1", "=10-2*3+8/4")]);
    assert_eq!(value(&sheet, "A1"), CellValue::Number(6.0));
}

#[test]
fn test_parse_error_and_unknown_function() {
    let sheet = sheet_with(&[("A1", "=1++2"), ("B1", "=UNKNOWNFUNC(C1)")]);

    let a1 = sheet.cell(addr("A1")).unwrap();
    assert_eq!(a1.value(), &CellValue::Error(CellError::Parse));
    assert_eq!(a1.expression(), None);

    assert_eq!(value(&sheet, "B1"), CellValue::Error(CellError::Name));
}

#[test]
fn test_self_reference_in_function() {
    let sheet = sheet_with(&[("A1", "=SUM(A1)")]);
    assert_eq!(value(&sheet, "A1"), CellValue::Error(CellError::Ref));
}

#[test]
fn test_cycle_leaves_prior_edges() {
    let mut sheet = sheet_with(&[("A1", "=B1")]);
    let stats = sheet.set_cell("B1", "=A1").unwrap();

    assert_eq!(stats.outcome, UpdateOutcome::CircularReference);
    assert_eq!(value(&sheet, "B1"), CellValue::Error(CellError::Ref));
    assert_eq!(
        sheet.precedents(addr("A1")),
        Some(&[addr("B1")].into_iter().collect::<HashSet<_>>())
    );
    assert_eq!(sheet.precedents(addr("B1")), None);
}

#[test]
fn test_longer_cycle_rejected() {
    let mut sheet = sheet_with(&[("A1", "=B1"), ("B1", "=C1")]);
    let stats = sheet.set_cell("C1", "=IF(TRUE, A1, 0)").unwrap();
    assert_eq!(stats.outcome, UpdateOutcome::CircularReference);
    assert_eq!(sheet.dependents(addr("A1")), None);
}

#[test]
fn test_recalculation_single_hop() {
    let mut sheet = sheet_with(&[("A1", "10"), ("B1", "20"), ("C1", "=A1+B1")]);
    assert_eq!(value(&sheet, "C1"), CellValue::Number(30.0));

    let stats = sheet.set_cell("A1", "15").unwrap();
    assert_eq!(stats.outcome, UpdateOutcome::Committed);
    assert_eq!(stats.recalculated, vec![addr("C1")]);
    assert_eq!(value(&sheet, "C1"), CellValue::Number(35.0));
}

#[test]
fn test_recalculation_chain() {
    let mut sheet = sheet_with(&[("A1", "10"), ("B1", "=A1*2"), ("C1", "=B1+5")]);
    assert_eq!(value(&sheet, "C1"), CellValue::Number(25.0));

    let stats = sheet.set_cell("A1", "20").unwrap();
    assert_eq!(stats.recalculated, vec![addr("B1"), addr("C1")]);
    assert_eq!(stats.cells_changed, 2);
    assert_eq!(value(&sheet, "B1"), CellValue::Number(40.0));
    assert_eq!(value(&sheet, "C1"), CellValue::Number(45.0));
}

#[test]
fn test_diamond_recalculated_once() {
    let mut sheet = sheet_with(&[
        ("A1", "1"),
        ("B1", "=A1+1"),
        ("C1", "=A1*2"),
        ("D1", "=B1+C1"),
    ]);
    assert_eq!(value(&sheet, "D1"), CellValue::Number(4.0));

    let stats = sheet.set_cell("A1", "10").unwrap();
    let d1_visits = stats
        .recalculated
        .iter()
        .filter(|&&a| a == addr("D1"))
        .count();
    assert_eq!(d1_visits, 1);
    assert_eq!(stats.cells_recalculated, 3);
    assert_eq!(value(&sheet, "D1"), CellValue::Number(31.0));
}

#[test]
fn test_replacing_formula_moves_edges() {
    let mut sheet = sheet_with(&[("A1", "1"), ("B1", "2"), ("C1", "=A1")]);
    sheet.set_cell("C1", "=B1").unwrap();

    // A1 no longer feeds C1
    let stats = sheet.set_cell("A1", "100").unwrap();
    assert_eq!(stats.cells_recalculated, 0);
    assert_eq!(value(&sheet, "C1"), CellValue::Number(2.0));

    sheet.set_cell("B1", "3").unwrap();
    assert_eq!(value(&sheet, "C1"), CellValue::Number(3.0));
}

#[test]
fn test_error_flows_to_dependents() {
    let mut sheet = sheet_with(&[("A1", "1"), ("B1", "=SUM(A1, 1)")]);
    sheet.set_cell("A1", "=1/0").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Error(CellError::Div0));

    sheet.set_cell("A1", "5").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(6.0));
}

#[test]
fn test_vlookup_exact() {
    let sheet = sheet_with(&[
        ("A1", "100"),
        ("B1", "Apple"),
        ("C1", "1.2"),
        ("A2", "101"),
        ("B2", "Banana"),
        ("C2", "0.5"),
        ("A3", "102"),
        ("B3", "Cherry"),
        ("C3", "3"),
        ("E1", "=VLOOKUP(101, A1:C3, 3, FALSE)"),
        ("E2", "=VLOOKUP(999, A1:B2, 2, FALSE)"),
        ("E3", "=VLOOKUP(100, A1:B1, 4, FALSE)"),
    ]);

    assert_eq!(value(&sheet, "E1"), CellValue::Number(0.5));
    assert_eq!(value(&sheet, "E2"), CellValue::Error(CellError::Na));
    assert_eq!(value(&sheet, "E3"), CellValue::Error(CellError::Ref));
}

#[test]
fn test_vlookup_approximate() {
    let sheet = sheet_with(&[
        ("A1", "100"),
        ("B1", "Grade C"),
        ("A2", "200"),
        ("B2", "Grade B"),
        ("A3", "300"),
        ("B3", "Grade A"),
        ("D1", "=VLOOKUP(250, A1:B3, 2, TRUE)"),
        ("E1", "=VLOOKUP(300, A1:B3, 2)"),
    ]);

    assert_eq!(value(&sheet, "D1"), CellValue::text("Grade B"));
    assert_eq!(value(&sheet, "E1"), CellValue::text("Grade A"));
}

#[test]
fn test_hlookup_exact() {
    let sheet = sheet_with(&[
        ("A1", "ID"),
        ("B1", "Item"),
        ("C1", "Price"),
        ("A2", "101"),
        ("B2", "Banana"),
        ("C2", "0.5"),
        ("A4", "=HLOOKUP(\"Item\", A1:C2, 2, FALSE)"),
    ]);

    assert_eq!(value(&sheet, "A4"), CellValue::text("Banana"));
}

#[test]
fn test_count_skips_text() {
    let sheet = sheet_with(&[("A1", "100"), ("B1", "Hello"), ("C1", ""), ("D1", "=COUNT(A1:C1)")]);
    assert_eq!(value(&sheet, "D1"), CellValue::Number(1.0));
}

#[test]
fn test_named_range_sum() {
    let mut sheet = sheet_with(&[("A1", "10"), ("A2", "20"), ("A3", "30"), ("A4", "40")]);
    sheet.define_name("MyRange", "A1:A4").unwrap();

    sheet.set_cell("B1", "=SUM(MyRange)").unwrap();
    sheet.set_cell("B2", "=SUM(A1:A4)").unwrap();
    sheet.set_cell("B3", "=SUM(myrange)").unwrap();

    assert_eq!(value(&sheet, "B1"), CellValue::Number(100.0));
    assert_eq!(value(&sheet, "B1"), value(&sheet, "B2"));
    assert_eq!(value(&sheet, "B3"), CellValue::Number(100.0));
}

#[test]
fn test_unregistered_name_in_function() {
    let sheet = sheet_with(&[
        ("A1", "=SUM(Nothing)"),
        ("A2", "=CONCATENATE(\"x\", Nothing)"),
        ("A3", "=Nothing"),
    ]);

    assert_eq!(value(&sheet, "A1"), CellValue::Error(CellError::Name));
    assert_eq!(value(&sheet, "A2"), CellValue::Error(CellError::Name));
    assert_eq!(value(&sheet, "A3"), CellValue::Error(CellError::Name));
}

/// Named ranges contribute no precedents, so editing a cell inside one
/// leaves formulas that use the name stale. This is a known limitation.
#[test]
fn test_named_range_edit_does_not_recalculate() {
    let mut sheet = sheet_with(&[("A1", "10"), ("A2", "20")]);
    sheet.define_name("Data", "A1:A2").unwrap();
    sheet.set_cell("B1", "=SUM(Data)").unwrap();
    assert_eq!(sheet.precedents(addr("B1")), None);

    let stats = sheet.set_cell("A1", "15").unwrap();
    assert_eq!(stats.cells_recalculated, 0);
    assert_eq!(value(&sheet, "B1"), CellValue::Number(30.0));

    // Re-entering the formula picks up the new value
    sheet.set_cell("B1", "=SUM(Data)").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(35.0));
}

/// Only the corners of a range are tracked as precedents
#[test]
fn test_range_tracks_corner_cells() {
    let mut sheet = sheet_with(&[("A1", "1"), ("A2", "2"), ("A3", "3"), ("B1", "=SUM(A1:A3)")]);
    assert_eq!(
        sheet.precedents(addr("B1")),
        Some(&[addr("A1"), addr("A3")].into_iter().collect::<HashSet<_>>())
    );

    sheet.set_cell("A3", "30").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(33.0));

    // An interior edit is not propagated
    sheet.set_cell("A2", "20").unwrap();
    assert_eq!(value(&sheet, "B1"), CellValue::Number(33.0));
}

#[test]
fn test_logical_short_circuit_in_sheet() {
    let sheet = sheet_with(&[
        ("A1", "0"),
        ("B1", "=IF(A1=0, \"zero\", 1/A1)"),
        ("C1", "=AND(A1<>0, 10/A1>1)"),
        ("D1", "=OR(A1=0, \"never\")"),
        ("E1", "=NOT(A1)"),
    ]);

    assert_eq!(value(&sheet, "B1"), CellValue::text("zero"));
    assert_eq!(value(&sheet, "C1"), CellValue::Boolean(false));
    assert_eq!(value(&sheet, "D1"), CellValue::Boolean(true));
    assert_eq!(value(&sheet, "E1"), CellValue::Boolean(true));
}

#[test]
fn test_text_functions_in_sheet() {
    let sheet = sheet_with(&[
        ("A1", "Hello"),
        ("A2", "42"),
        ("B1", "=CONCATENATE(A1, \" \", A2, \"!\")"),
        ("B2", "=LEFT(A1, 2)"),
        ("B3", "=RIGHT(A1, 3)"),
        ("B4", "=LEN(B1)"),
    ]);

    assert_eq!(value(&sheet, "B1"), CellValue::text("Hello 42!"));
    assert_eq!(value(&sheet, "B2"), CellValue::text("He"));
    assert_eq!(value(&sheet, "B3"), CellValue::text("llo"));
    assert_eq!(value(&sheet, "B4"), CellValue::Number(9.0));
}

#[test]
fn test_absent_cells_read_as_zero_in_formulas() {
    let sheet = sheet_with(&[
        ("A1", "10"),
        ("A3", "30"),
        ("B1", "=A1+A2"),
        ("B2", "=AVERAGE(A1:A3)"),
    ]);

    assert_eq!(value(&sheet, "B1"), CellValue::Number(10.0));
    assert_eq!(value(&sheet, "B2"), CellValue::Number(40.0 / 3.0));
    // The read API still reports absence as Empty
    assert_eq!(value(&sheet, "A2"), CellValue::Empty);
}
