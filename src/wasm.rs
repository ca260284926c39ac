//! Bindings for calling the solver from JavaScript.

use wasm_bindgen::prelude::*;

use crate::hints::LoadError;
use crate::limits::Limits;
use crate::puzzle::Puzzle;
use crate::solver::deepen;

/// Solve a JSON hint document, deepening the search up to `max_depth`, and describe the outcome as JSON.
///
/// The returned document carries a `status` of `solutions`, `no_solution`, `depth_exhausted` or `cancelled`.
/// Solutions and partial boards are lists of row strings using `#` for filled, `.` for empty and `?` for unknown cells.
#[wasm_bindgen(js_name = solveJson)]
pub fn solve_json(hints: &str, max_depth: usize, find_all: bool) -> Result<String, JsValue> {
    solve_document(hints, max_depth, find_all).map_err(|err| js_sys::Error::new(&err.to_string()).into())
}

pub(crate) fn solve_document(hints: &str, max_depth: usize, find_all: bool) -> Result<String, LoadError> {
    let puzzle = Puzzle::from_json_str(hints)?;
    let report = deepen(&puzzle, Some(max_depth), find_all, &Limits::default());
    Ok(serde_json::to_string(&report.result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell() {
        let json = solve_document(r#"{"row_hints": [[1]], "col_hints": [[1]]}"#, 0, false).unwrap();
        assert_eq!(json, r##"{"status":"solutions","solutions":[["#"]],"exhaustive":false}"##);
    }

    #[test]
    fn proven_unsolvable() {
        let json = solve_document(r#"{"row_hints": [[1], []], "col_hints": [[], []]}"#, 2, false).unwrap();
        assert_eq!(json, r#"{"status":"no_solution"}"#);
    }

    #[test]
    fn invalid_hints() {
        let err = solve_document(r#"{"row_hints": [[3]], "col_hints": [[1], [1]]}"#, 2, false).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(_)));
    }
}
