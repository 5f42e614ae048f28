//! End-to-end scenarios against the public `Sheet` surface.

use gridcore_core::{Sheet, SheetError};
use gridcore_engine::{FormulaError, Position, Value};

fn pos(a1: &str) -> Position {
    Position::parse(a1).unwrap()
}

#[test]
fn formula_canonicalization_is_a_fixpoint() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1   +2*(3)").unwrap();
    let canonical = sheet.get_cell(pos("A1")).unwrap().unwrap().text();
    assert_eq!(canonical, "=1 + 2 * 3");

    sheet.set_cell(pos("A1"), &canonical).unwrap();
    assert_eq!(sheet.get_cell(pos("A1")).unwrap().unwrap().text(), canonical);
}

#[test]
fn round_trip_text_is_preserved_for_non_formula_cells() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "just some text").unwrap();
    assert_eq!(sheet.get_cell(pos("A1")).unwrap().unwrap().text(), "just some text");
}

#[test]
fn rollback_atomicity_restores_observable_state_on_cycle_rejection() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1").unwrap();
    sheet.set_cell(pos("B1"), "=A1").unwrap();

    let before = sheet.get_cell(pos("B1")).unwrap().unwrap().text();
    let err = sheet.set_cell(pos("B1"), "=B1").unwrap_err();
    assert_eq!(err, SheetError::CircularDependency);
    assert_eq!(sheet.get_cell(pos("B1")).unwrap().unwrap().text(), before);
}

#[test]
fn error_propagation_prefers_the_higher_precedence_category() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "not a number").unwrap();
    sheet.set_cell(pos("B1"), "=A1").unwrap();
    assert_eq!(sheet.get_cached_value(pos("B1")).unwrap(), Value::Error(FormulaError::Value));

    sheet.set_cell(pos("C1"), "=B1+1").unwrap();
    assert_eq!(sheet.get_cached_value(pos("C1")).unwrap(), Value::Error(FormulaError::Value));
}

#[test]
fn scenario_chained_arithmetic() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "2").unwrap();
    sheet.set_cell(pos("B1"), "=A1+3").unwrap();
    assert_eq!(sheet.get_value(pos("B1")).unwrap(), Value::Number(5.0));
}

#[test]
fn scenario_two_cell_cycle_leaves_the_second_cell_empty() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1").unwrap();
    let err = sheet.set_cell(pos("B1"), "=A1").unwrap_err();
    assert_eq!(err, SheetError::CircularDependency);
    assert!(sheet.get_cell(pos("B1")).unwrap().is_none());
}

#[test]
fn scenario_escaped_text_feeds_into_a_formula() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "'7").unwrap();
    let cell = sheet.get_cell(pos("A1")).unwrap().unwrap();
    assert_eq!(cell.text(), "'7");
    assert_eq!(cell.value(&sheet), Value::Text("7".to_string()));

    sheet.set_cell(pos("B1"), "=A1+1").unwrap();
    assert_eq!(sheet.get_value(pos("B1")).unwrap(), Value::Number(8.0));
}

#[test]
fn scenario_division_by_zero_prints_arithmetic_error() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=1/0").unwrap();
    assert_eq!(sheet.get_value(pos("A1")).unwrap(), Value::Error(FormulaError::Arithmetic));

    let mut out = Vec::new();
    sheet.print_values(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "#ARITHM!\n");
}

#[test]
fn scenario_text_reference_is_a_value_error() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "hello").unwrap();
    sheet.set_cell(pos("B1"), "=A1").unwrap();
    assert_eq!(sheet.get_value(pos("B1")).unwrap(), Value::Error(FormulaError::Value));
}

#[test]
fn scenario_clearing_the_only_cell_resets_extents() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("C3"), "x").unwrap();
    sheet.clear_cell(pos("C3")).unwrap();
    assert_eq!(sheet.get_printable_size(), (0, 0));
    assert!(sheet.get_cell(pos("C3")).unwrap().is_none());
}

#[test]
fn invalid_position_rejects_every_public_operation() {
    let mut sheet = Sheet::new();
    let out_of_range = Position::new(20_000, 20_000);
    assert!(matches!(
        sheet.set_cell(out_of_range, "1"),
        Err(SheetError::InvalidPosition(_))
    ));
    assert!(matches!(sheet.get_cell(out_of_range), Err(SheetError::InvalidPosition(_))));
    assert!(matches!(sheet.clear_cell(out_of_range), Err(SheetError::InvalidPosition(_))));
    assert!(matches!(
        sheet.get_cached_value(out_of_range),
        Err(SheetError::InvalidPosition(_))
    ));
}
