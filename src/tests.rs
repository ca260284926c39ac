#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;

    use itertools::Itertools;
    use rstest::rstest;

    use crate::propagate::{Propagator, Trail};
    use crate::{
        deepen, deepen_with, solve, solve_with, Board, Cell, Hints, Interruption, Limits, LoadError, Location,
        Puzzle, SolveOptions, SolveResult, Strategy,
    };

    fn puzzle(rows: Vec<Vec<usize>>, columns: Vec<Vec<usize>>) -> Puzzle {
        Hints::new(rows, columns).into_puzzle().unwrap()
    }

    /// Three rows and three columns of one run each: the six permutation matrices.
    fn permutations() -> Puzzle {
        puzzle(vec![vec![1]; 3], vec![vec![1]; 3])
    }

    fn rendered(result: &SolveResult) -> HashSet<String> {
        result.solutions().iter().map(|solution| solution.to_string()).collect()
    }

    /// Every `width` × `height` grid, as rows.
    fn all_grids(width: usize, height: usize) -> impl Iterator<Item = Vec<Vec<Cell>>> {
        (0u32..1 << (width * height)).map(move |bits| {
            (0..height)
                .map(|y| {
                    (0..width)
                        .map(|x| if bits & (1 << (y * width + x)) != 0 { Cell::Filled } else { Cell::Empty })
                        .collect()
                })
                .collect()
        })
    }

    /// Every 3 × 3 grid, grouped by its hints.
    fn three_by_three() -> HashMap<(Vec<Vec<usize>>, Vec<Vec<usize>>), Vec<Vec<Vec<Cell>>>> {
        let mut by_hints: HashMap<_, Vec<Vec<Vec<Cell>>>> = HashMap::new();
        for grid in all_grids(3, 3) {
            let hints = Hints::of_rows(&grid);
            by_hints.entry((hints.row_hints, hints.col_hints)).or_default().push(grid);
        }
        by_hints
    }

    fn render(grid: &[Vec<Cell>]) -> String {
        grid.iter()
            .map(|row| row.iter().map(|cell| cell.symbol()).chain(['\n']).collect::<String>())
            .collect()
    }

    #[test]
    fn single_cell() {
        let result = solve(&puzzle(vec![vec![1]], vec![vec![1]]), 0, false);
        assert_eq!(rendered(&result), HashSet::from(["#\n".to_string()]));
    }

    #[test]
    fn two_diagonals() {
        let puzzle = puzzle(vec![vec![1], vec![1]], vec![vec![1], vec![1]]);
        let diagonals = HashSet::from(["#.\n.#\n".to_string(), ".#\n#.\n".to_string()]);

        let first = solve(&puzzle, 1, false);
        assert_eq!(first.solutions().len(), 1);
        assert!(diagonals.is_superset(&rendered(&first)));

        match solve(&puzzle, 1, true) {
            SolveResult::Solutions(set) => {
                assert!(set.is_exhaustive());
                assert_eq!(set.solutions().iter().map(|s| s.to_string()).collect::<HashSet<_>>(), diagonals);
            }
            other => panic!("expected solutions, got {other:?}"),
        }
    }

    #[test]
    fn needs_two_levels_of_branching() {
        let puzzle = permutations();
        assert!(matches!(solve(&puzzle, 0, false), SolveResult::DepthExhausted { .. }));
        assert!(matches!(solve(&puzzle, 1, false), SolveResult::DepthExhausted { .. }));

        let result = solve(&puzzle, 2, false);
        assert!(result.is_solved());
        assert!(result.solutions()[0].board().satisfies(&puzzle));
    }

    #[test]
    fn solved_by_propagation_alone() {
        let puzzle = puzzle(
            vec![vec![5], vec![1], vec![5], vec![1], vec![5]],
            vec![vec![3, 1], vec![1, 1, 1], vec![1, 1, 1], vec![1, 1, 1], vec![1, 3]],
        );
        let report = solve_with(&puzzle, &SolveOptions::new(0, true));
        assert_eq!(rendered(&report.result), HashSet::from(["#####\n#....\n#####\n....#\n#####\n".to_string()]));
        assert_eq!(report.stats.nodes, 1);
        assert_eq!(report.stats.deepest, 0);
    }

    #[test]
    fn depth_exhausted_carries_propagated_board() {
        let puzzle = puzzle(vec![vec![2], vec![], vec![1], vec![1]], vec![vec![1, 1], vec![1, 1]]);
        match solve(&puzzle, 0, false) {
            SolveResult::DepthExhausted { partial } => assert_eq!(partial.to_string(), "##\n..\n??\n??\n"),
            other => panic!("expected depth exhaustion, got {other:?}"),
        }
        assert_eq!(
            serde_json::to_string(&solve(&puzzle, 0, false)).unwrap(),
            r###"{"status":"depth_exhausted","partial":["##","..","??","??"]}"###
        );

        let all = solve(&puzzle, 1, true);
        assert_eq!(rendered(&all), HashSet::from(["##\n..\n#.\n.#\n".to_string(), "##\n..\n.#\n#.\n".to_string()]));
    }

    #[test]
    fn contradiction_at_root_is_no_solution() {
        let puzzle = puzzle(vec![vec![1], vec![]], vec![vec![], vec![]]);
        for depth in [0, 1, 4] {
            assert_eq!(solve(&puzzle, depth, true), SolveResult::NoSolution);
        }
    }

    #[test]
    fn infeasible_hints_never_reach_search() {
        let err = Puzzle::from_json_str(r#"{"row_hints": [[5]], "col_hints": [[1], [1], [1]]}"#).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(_)));
        assert!(err.to_string().contains("row 0 needs at least 5 cells but is 3 long"));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn node_limit_cancels(#[case] nodes: u64) {
        let options = SolveOptions::new(9, true).with_limits(Limits::default().with_node_limit(nodes));
        let report = solve_with(&permutations(), &options);
        match report.result {
            SolveResult::Cancelled { reason: got, solutions } => {
                assert_eq!(got, Interruption::NodeLimit);
                assert!(solutions.is_empty());
            }
            other => panic!("expected cancellation, got {other:?}"),
        }
        assert_eq!(report.stats.nodes, nodes);
    }

    #[rstest]
    #[case(Limits::default().with_stop_flag(Arc::new(AtomicBool::new(true))), Interruption::Stopped)]
    #[case(Limits::default().with_timeout(Duration::ZERO), Interruption::Deadline)]
    fn raised_limits_cancel_before_the_first_node(#[case] limits: Limits, #[case] reason: Interruption) {
        let report = solve_with(&permutations(), &SolveOptions::new(9, true).with_limits(limits));
        assert_eq!(report.result, SolveResult::Cancelled { reason, solutions: vec![] });
        assert_eq!(report.stats.nodes, 0);
    }

    #[test]
    fn stop_flag_is_seen_by_every_depth() {
        let stop = Arc::new(AtomicBool::new(true));
        let report = deepen(&permutations(), None, false, &Limits::default().with_stop_flag(stop));
        assert!(matches!(report.result, SolveResult::Cancelled { reason: Interruption::Stopped, .. }));
    }

    #[test]
    fn cancelled_search_keeps_solutions_found_so_far() {
        let puzzle = puzzle(vec![vec![1], vec![1]], vec![vec![1], vec![1]]);
        // root, then the filled branch which completes the board
        let options = SolveOptions::new(1, true).with_limits(Limits::default().with_node_limit(2));
        match solve_with(&puzzle, &options).result {
            SolveResult::Cancelled { solutions, .. } => assert_eq!(solutions.len(), 1),
            other => panic!("expected cancellation, got {other:?}"),
        }
    }

    #[test]
    fn four_solutions() {
        let puzzle = puzzle(vec![vec![1, 1], vec![1, 1]], vec![vec![1], vec![1], vec![], vec![1], vec![1]]);
        let report = deepen(&puzzle, None, true, &Limits::default());
        assert_eq!(
            rendered(&report.result),
            HashSet::from([
                "#..#.\n.#..#\n".to_string(),
                "#...#\n.#.#.\n".to_string(),
                ".#..#\n#..#.\n".to_string(),
                ".#.#.\n#...#\n".to_string(),
            ])
        );
    }

    #[test]
    fn deepening_stops_at_first_sufficient_depth() {
        let report = deepen(&permutations(), None, false, &Limits::default());
        assert!(report.result.is_solved());
        assert_eq!(report.stats.deepest, 2);
    }

    #[test]
    fn deepening_with_find_all_continues_until_exhaustive() {
        let report = deepen(&permutations(), None, true, &Limits::default());
        match report.result {
            SolveResult::Solutions(set) => {
                assert!(set.is_exhaustive());
                assert_eq!(set.len(), 6);
            }
            other => panic!("expected solutions, got {other:?}"),
        }
    }

    #[test]
    fn deepening_respects_ceiling() {
        let report = deepen(&permutations(), Some(1), false, &Limits::default());
        assert!(matches!(report.result, SolveResult::DepthExhausted { .. }));
    }

    #[test]
    fn find_all_matches_enumeration_on_every_3x3_grid() {
        for ((rows, columns), grids) in three_by_three() {
            let puzzle = puzzle(rows, columns);
            let result = solve(&puzzle, puzzle.cell_count(), true);
            let SolveResult::Solutions(set) = &result else {
                panic!("{puzzle:?} has solutions, got {result:?}");
            };

            assert!(set.is_exhaustive());
            assert_eq!(set.len(), grids.len(), "{puzzle:?}");
            for solution in set.solutions() {
                assert!(solution.board().satisfies(&puzzle));
            }
            let expected: HashSet<String> = grids.iter().map(|grid| render(grid)).collect();
            assert_eq!(rendered(&result), expected);
        }
    }

    #[test]
    fn larger_depth_never_loses_solutions() {
        for (rows, columns) in three_by_three().into_keys() {
            let puzzle = puzzle(rows, columns);
            let first = (0..=puzzle.cell_count())
                .find(|&depth| solve(&puzzle, depth, false).is_solved())
                .expect("every puzzle built from a grid is solvable");
            for depth in first..=puzzle.cell_count() {
                assert!(solve(&puzzle, depth, false).is_solved(), "{puzzle:?} at depth {depth}");
            }
        }
    }

    #[test]
    fn propagation_agrees_with_every_solution() {
        for ((rows, columns), grids) in three_by_three() {
            let puzzle = puzzle(rows, columns);
            let mut board = puzzle.new_board();
            let mut trail = Trail::default();
            let mut propagator = Propagator::new(&puzzle);
            propagator.propagate_all(&mut board, &mut trail).unwrap();

            for y in 0..3 {
                for x in 0..3 {
                    let cell = board.get(Location(x, y));
                    if cell.is_known() {
                        assert!(grids.iter().all(|grid| grid[y][x] == cell), "{puzzle:?} at ({x}, {y})");
                    }
                }
            }

            let snapshot = board.clone();
            assert_eq!(propagator.propagate_all(&mut board, &mut trail), Ok(0));
            assert_eq!(board, snapshot);
        }
    }

    #[test]
    fn solutions_survive_the_hint_format() {
        let board: Board = "\
            .##.\n\
            ####\n\
            #..#\n\
            .##.\n"
            .parse()
            .unwrap();
        let rows: Vec<Vec<Cell>> = board.rows().map(|row| row.to_vec()).collect();
        let json = serde_json::to_string(&Hints::of_rows(&rows)).unwrap();

        let puzzle = Puzzle::from_json_str(&json).unwrap();
        let report = deepen(&puzzle, None, true, &Limits::default());
        assert!(report.result.solutions().iter().any(|solution| *solution.board() == board));
        for solution in report.result.solutions() {
            assert!(solution.board().satisfies(&puzzle));
        }
    }

    /// Rows `[1, 1]` and `[2]` over two empty rows, one filled cell per column: line propagation
    /// alone decides nothing in the top two rows.
    fn needs_probing() -> Puzzle {
        puzzle(vec![vec![1, 1], vec![2], vec![], vec![]], vec![vec![1]; 4])
    }

    #[test]
    fn probing_decides_what_lines_cannot() {
        let puzzle = needs_probing();
        match solve(&puzzle, 0, false) {
            SolveResult::DepthExhausted { partial } => assert_eq!(partial.to_string(), "????\n????\n....\n....\n"),
            other => panic!("expected depth exhaustion, got {other:?}"),
        }

        let options = SolveOptions::new(0, true).with_strategy(Strategy::Probe);
        let report = solve_with(&puzzle, &options);
        match &report.result {
            SolveResult::Solutions(set) => assert!(set.is_exhaustive()),
            other => panic!("expected solutions, got {other:?}"),
        }
        assert_eq!(rendered(&report.result), HashSet::from(["#..#\n.##.\n....\n....\n".to_string()]));
        assert_eq!(report.stats.nodes, 1);
        assert!(report.stats.probes > 0);
    }

    #[test]
    fn lines_strategy_never_branches() {
        let options = SolveOptions::new(5, false).with_strategy(Strategy::Lines);
        let report = solve_with(&permutations(), &options);
        assert!(matches!(report.result, SolveResult::DepthExhausted { .. }));
        assert_eq!(report.stats.nodes, 1);

        let report = deepen_with(&permutations(), None, &options);
        assert!(matches!(report.result, SolveResult::DepthExhausted { .. }));
        assert_eq!(report.stats.nodes, 1);

        let solved = solve_with(&needs_probing(), &SolveOptions::new(0, false).with_strategy(Strategy::Lines));
        assert!(matches!(solved.result, SolveResult::DepthExhausted { .. }));
    }

    #[test]
    fn probing_finds_the_same_solutions_on_every_3x3_grid() {
        let options = SolveOptions::new(9, true).with_strategy(Strategy::Probe);
        for ((rows, columns), grids) in three_by_three() {
            let puzzle = puzzle(rows, columns);
            let report = solve_with(&puzzle, &options);
            let SolveResult::Solutions(set) = &report.result else {
                panic!("{puzzle:?} has solutions, got {:?}", report.result);
            };
            assert!(set.is_exhaustive());
            let expected: HashSet<String> = grids.iter().map(|grid| render(grid)).collect();
            assert_eq!(rendered(&report.result), expected, "{puzzle:?}");
        }
    }

    #[test]
    fn hints_no_grid_produces_have_no_solution() {
        let fits: Vec<Vec<usize>> = vec![vec![], vec![1], vec![2], vec![3], vec![1, 1]];
        let produced: HashSet<_> = three_by_three().into_keys().collect();

        let lines = || (0..3).map(|_| fits.iter().cloned()).multi_cartesian_product();
        for rows in lines() {
            for columns in lines() {
                if produced.contains(&(rows.clone(), columns.clone())) {
                    continue;
                }
                let puzzle = puzzle(rows.clone(), columns);
                for strategy in [Strategy::Branch, Strategy::Probe] {
                    let options = SolveOptions::new(9, true).with_strategy(strategy);
                    assert_eq!(solve_with(&puzzle, &options).result, SolveResult::NoSolution, "{puzzle:?} {strategy}");
                }
            }
        }
    }
}
