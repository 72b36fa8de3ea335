//! Math functions
//!
//! Non-numeric arguments are ignored by every function here.

use calxy_core::{CellError, CellValue};

fn numbers(args: &[CellValue]) -> impl Iterator<Item = f64> + '_ {
    args.iter().filter_map(CellValue::as_number)
}

/// SUM function
pub fn fn_sum(args: &[CellValue]) -> CellValue {
    CellValue::Number(numbers(args).sum())
}

/// AVERAGE function
pub fn fn_average(args: &[CellValue]) -> CellValue {
    let (sum, count) = numbers(args).fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));

    if count == 0 {
        return CellValue::Error(CellError::Div0);
    }

    CellValue::Number(sum / count as f64)
}

/// COUNT function
pub fn fn_count(args: &[CellValue]) -> CellValue {
    CellValue::Number(numbers(args).count() as f64)
}

/// MAX function
pub fn fn_max(args: &[CellValue]) -> CellValue {
    numbers(args)
        .reduce(f64::max)
        .map_or(CellValue::Error(CellError::Value), CellValue::Number)
}

/// MIN function
pub fn fn_min(args: &[CellValue]) -> CellValue {
    numbers(args)
        .reduce(f64::min)
        .map_or(CellValue::Error(CellError::Value), CellValue::Number)
}

#[cfg(test)]
mod tests {
    use crate::evaluator::tests::{eval, TestSheet};
    use calxy_core::{CellError, CellValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sum() {
        assert_eq!(eval("=SUM(1, 2, 3)"), CellValue::Number(6.0));
        assert_eq!(eval("=SUM()"), CellValue::Number(0.0));
        assert_eq!(eval("=SUM(1, \"x\", TRUE)"), CellValue::Number(1.0));
    }

    #[test]
    fn test_sum_over_range() {
        let mut sheet = TestSheet::new();
        sheet.set("A1", 10.0).set("A2", 20.0).set("A3", "skip");
        assert_eq!(sheet.eval("=SUM(A1:A3)"), CellValue::Number(30.0));
        assert_eq!(sheet.eval("=SUM(A3:A1, 5)"), CellValue::Number(35.0));
    }

    #[test]
    fn test_average() {
        assert_eq!(eval("=AVERAGE(1, 2, 3, 4)"), CellValue::Number(2.5));
        assert_eq!(eval("=AVERAGE(\"a\")"), CellValue::Error(CellError::Div0));
        assert_eq!(eval("=AVERAGE()"), CellValue::Error(CellError::Div0));
    }

    #[test]
    fn test_average_counts_absent_cells_as_zero() {
        let mut sheet = TestSheet::new();
        sheet.set("A1", 6.0);
        assert_eq!(sheet.eval("=AVERAGE(A1:A3)"), CellValue::Number(2.0));
    }

    #[test]
    fn test_count() {
        let mut sheet = TestSheet::new();
        sheet.set("A1", 100.0).set("B1", "Hello").set("C1", "");
        assert_eq!(sheet.eval("=COUNT(A1:C1)"), CellValue::Number(1.0));
        assert_eq!(eval("=COUNT(1, TRUE, \"2\")"), CellValue::Number(1.0));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(eval("=MAX(3, 9, -2)"), CellValue::Number(9.0));
        assert_eq!(eval("=MIN(3, 9, -2)"), CellValue::Number(-2.0));
        assert_eq!(eval("=MAX(\"a\", FALSE)"), CellValue::Error(CellError::Value));
        assert_eq!(eval("=MIN()"), CellValue::Error(CellError::Value));
    }
}
