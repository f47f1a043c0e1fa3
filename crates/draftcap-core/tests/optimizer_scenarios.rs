// Scenario and property tests for the roster optimizer and bid sweep.
//
// These run the full BUILD -> CONSTRAIN -> SOLVE pipeline against the
// microlp backend using small hand-built player pools.

use draftcap_core::{
    BidSchedule, CapacityMap, DraftStatus, MarginalValueAnalyzer, MicroLpSolver, Optimizer,
    OptimizerError, PlayerRecord, Position, RosterLedger, SolveOutcome,
};

// ===========================================================================
// Helpers
// ===========================================================================

fn optimizer() -> Optimizer<MicroLpSolver> {
    Optimizer::new(MicroLpSolver::new())
}

fn qb_only() -> CapacityMap {
    CapacityMap::new([(Position::Qb, 1)], 0, []).unwrap()
}

fn p(name: &str, position: Position, points: f64, bid: f64) -> PlayerRecord {
    PlayerRecord::new(name, position, points, bid)
}

/// A small full-league pool for the reference 9-slot lineup.
fn league_pool() -> Vec<PlayerRecord> {
    vec![
        p("QB Elite", Position::Qb, 24.0, 40.0),
        p("QB Solid", Position::Qb, 21.0, 25.0),
        p("QB Value", Position::Qb, 18.0, 10.0),
        p("QB Dart", Position::Qb, 15.0, 2.0),
        p("RB One", Position::Rb, 19.0, 55.0),
        p("RB Two", Position::Rb, 16.0, 35.0),
        p("RB Three", Position::Rb, 13.0, 20.0),
        p("RB Four", Position::Rb, 10.0, 9.0),
        p("RB Five", Position::Rb, 8.0, 4.0),
        p("RB Six", Position::Rb, 6.0, 1.0),
        p("WR One", Position::Wr, 18.0, 50.0),
        p("WR Two", Position::Wr, 15.0, 30.0),
        p("WR Three", Position::Wr, 12.0, 15.0),
        p("WR Four", Position::Wr, 10.0, 8.0),
        p("WR Five", Position::Wr, 8.0, 3.0),
        p("WR Six", Position::Wr, 6.0, 1.0),
        p("TE One", Position::Te, 12.0, 20.0),
        p("TE Two", Position::Te, 9.0, 8.0),
        p("TE Three", Position::Te, 6.0, 1.0),
        p("K One", Position::K, 9.0, 3.0),
        p("K Two", Position::K, 8.0, 1.0),
        p("K Three", Position::K, 7.0, 0.0),
        p("DST One", Position::Dst, 8.0, 3.0),
        p("DST Two", Position::Dst, 7.0, 1.0),
        p("DST Three", Position::Dst, 6.0, 0.0),
    ]
}

fn with_status(mut pool: Vec<PlayerRecord>, name: &str, status: DraftStatus) -> Vec<PlayerRecord> {
    for player in pool.iter_mut().filter(|pl| pl.name == name) {
        player.status = status;
    }
    pool
}

fn count_at(result: &draftcap_core::RosterResult, position: Position) -> usize {
    result.roster.iter().filter(|e| e.position == position).count()
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn scenario_a_drafts_best_affordable_qb() {
    let ledger = RosterLedger::new(
        vec![p("QB-A", Position::Qb, 20.0, 5.0), p("QB-B", Position::Qb, 15.0, 3.0)],
        qb_only(),
    )
    .unwrap();

    let result = optimizer().compute_optimal_roster(10.0, &ledger).unwrap();
    assert!((result.objective_value - 20.0).abs() < 1e-6);
    assert_eq!(result.roster.len(), 1);
    assert!(result.contains("QB-A", Position::Qb));
}

#[test]
fn scenario_b_taken_player_is_skipped() {
    let ledger = RosterLedger::new(
        vec![
            p("QB-A", Position::Qb, 20.0, 5.0).with_status(DraftStatus::Taken),
            p("QB-B", Position::Qb, 15.0, 3.0),
        ],
        qb_only(),
    )
    .unwrap();

    let result = optimizer().compute_optimal_roster(10.0, &ledger).unwrap();
    assert!((result.objective_value - 15.0).abs() < 1e-6);
    assert!(result.contains("QB-B", Position::Qb));
    assert!(!result.contains("QB-A", Position::Qb));
}

#[test]
fn scenario_c_unaffordable_roster_is_infeasible() {
    let ledger = RosterLedger::new(
        vec![p("QB-A", Position::Qb, 20.0, 5.0), p("QB-B", Position::Qb, 15.0, 3.0)],
        qb_only(),
    )
    .unwrap();

    let err = optimizer().compute_optimal_roster(2.0, &ledger).unwrap_err();
    assert!(matches!(err, OptimizerError::Infeasible));
}

#[test]
fn scenario_d_sweep_stops_at_first_unaffordable_bid() {
    let ledger = RosterLedger::new(
        vec![
            p("QB-A", Position::Qb, 20.0, 5.0),
            p("QB-B", Position::Qb, 15.0, 3.0).with_status(DraftStatus::Evaluate),
        ],
        qb_only(),
    )
    .unwrap();
    let optimizer = optimizer();
    let schedule = BidSchedule::explicit([0.0, 5.0, 10.0]).unwrap();

    let value = MarginalValueAnalyzer::new(&optimizer, schedule)
        .compute_marginal_value(9.0, &ledger)
        .unwrap();

    assert!((value.baseline - 20.0).abs() < 1e-6);
    assert_eq!(value.curve.len(), 2);
    assert!(value.curve.iter().all(|pt| (pt.objective_value - 15.0).abs() < 1e-6));
    assert_eq!(value.stopped_at, Some(10.0));
    // Drafting QB-B never beats drafting QB-A.
    assert_eq!(value.threshold, 0.0);
}

// ===========================================================================
// Roster-wide properties
// ===========================================================================

#[test]
fn roster_size_matches_capacities() {
    let ledger = RosterLedger::new(league_pool(), CapacityMap::reference()).unwrap();
    let result = optimizer().compute_optimal_roster(200.0, &ledger).unwrap();

    assert_eq!(result.roster.len(), 9);
    assert_eq!(count_at(&result, Position::Qb), 1);
    assert_eq!(count_at(&result, Position::K), 1);
    assert_eq!(count_at(&result, Position::Dst), 1);
    assert!(count_at(&result, Position::Rb) >= 2);
    assert!(count_at(&result, Position::Wr) >= 2);
    assert!(count_at(&result, Position::Te) >= 1);
    let flex_count = count_at(&result, Position::Rb)
        + count_at(&result, Position::Wr)
        + count_at(&result, Position::Te);
    assert_eq!(flex_count, 6);
}

#[test]
fn spend_never_exceeds_budget() {
    let ledger = RosterLedger::new(league_pool(), CapacityMap::reference()).unwrap();
    for budget in [20.0, 60.0, 120.0, 200.0] {
        let result = optimizer().compute_optimal_roster(budget, &ledger).unwrap();
        assert!(
            result.total_bid() <= budget + 1e-6,
            "spent {} with budget {budget}",
            result.total_bid()
        );
    }
}

#[test]
fn budget_can_be_spent_exactly() {
    // Cheapest legal roster: QB Dart 2 + RB Free 0 + RB Six 1 + RB Five 4 +
    // WR Six 1 + WR Five 3 + TE Three 1 + K Three 0 + DST Three 0 = 12.
    let mut pool = league_pool();
    pool.push(p("RB Free", Position::Rb, 1.0, 0.0));
    let ledger = RosterLedger::new(pool, CapacityMap::reference()).unwrap();

    let result = optimizer().compute_optimal_roster(12.0, &ledger).unwrap();
    assert!((result.total_bid() - 12.0).abs() < 1e-6);
    assert_eq!(result.roster.len(), 9);
}

#[test]
fn drafted_players_always_present_and_taken_always_absent() {
    let pool = with_status(league_pool(), "QB Dart", DraftStatus::Drafted);
    let pool = with_status(pool, "RB One", DraftStatus::Taken);
    let pool = with_status(pool, "WR One", DraftStatus::Taken);
    let ledger = RosterLedger::new(pool, CapacityMap::reference()).unwrap();

    let result = optimizer().compute_optimal_roster(200.0, &ledger).unwrap();
    assert!(result.contains("QB Dart", Position::Qb));
    assert!(!result.contains("RB One", Position::Rb));
    assert!(!result.contains("WR One", Position::Wr));

    let dart = result.roster.iter().find(|e| e.name == "QB Dart").unwrap();
    assert_eq!(dart.status, DraftStatus::Drafted);
}

#[test]
fn drafted_spend_comes_out_of_the_budget_once() {
    // With $200 and the $40 QB already bought, $160 remains for eight slots.
    let pool = with_status(league_pool(), "QB Elite", DraftStatus::Drafted);
    let ledger = RosterLedger::new(pool, CapacityMap::reference()).unwrap();

    let result = optimizer().compute_optimal_roster(200.0, &ledger).unwrap();
    assert!(result.total_bid() <= 200.0 + 1e-6);
    let others: f64 = result
        .roster
        .iter()
        .filter(|e| e.status != DraftStatus::Drafted)
        .map(|e| e.bid)
        .sum();
    assert!(others <= 160.0 + 1e-6);
}

#[test]
fn repeated_runs_agree_on_objective() {
    let ledger = RosterLedger::new(league_pool(), CapacityMap::reference()).unwrap();
    let first = optimizer().compute_optimal_roster(150.0, &ledger).unwrap();
    let second = optimizer().compute_optimal_roster(150.0, &ledger).unwrap();
    assert!((first.objective_value - second.objective_value).abs() < 1e-6);
}

#[test]
fn position_with_no_players_is_infeasible() {
    let pool: Vec<PlayerRecord> = league_pool()
        .into_iter()
        .filter(|pl| pl.position != Position::K)
        .collect();
    let ledger = RosterLedger::new(pool, CapacityMap::reference()).unwrap();

    let outcome = optimizer().solve_roster(200.0, &ledger, None).unwrap();
    assert_eq!(outcome, SolveOutcome::Infeasible);
}

#[test]
fn all_kickers_taken_is_infeasible() {
    let pool = with_status(league_pool(), "K One", DraftStatus::Taken);
    let pool = with_status(pool, "K Two", DraftStatus::Taken);
    let pool = with_status(pool, "K Three", DraftStatus::Taken);
    let ledger = RosterLedger::new(pool, CapacityMap::reference()).unwrap();

    let err = optimizer().compute_optimal_roster(200.0, &ledger).unwrap_err();
    assert!(matches!(err, OptimizerError::Infeasible));
}

// ===========================================================================
// Sweep properties
// ===========================================================================

#[test]
fn sweep_objective_is_non_increasing_in_bid() {
    let pool = with_status(league_pool(), "RB Two", DraftStatus::Evaluate);
    let ledger = RosterLedger::new(pool, CapacityMap::reference()).unwrap();
    let optimizer = optimizer();

    let value = MarginalValueAnalyzer::new(&optimizer, BidSchedule::default())
        .compute_marginal_value(120.0, &ledger)
        .unwrap();

    assert!(!value.curve.is_empty());
    for pair in value.curve.windows(2) {
        assert!(
            pair[1].objective_value <= pair[0].objective_value + 1e-6,
            "objective rose from {:?} to {:?}",
            pair[0],
            pair[1]
        );
    }
    for point in &value.curve {
        if point.bid <= value.threshold {
            continue;
        }
        assert!(point.objective_value <= value.baseline + 0.005);
    }
}

#[test]
fn sweep_on_full_league_stops_once_budget_runs_out() {
    let pool = with_status(league_pool(), "WR Two", DraftStatus::Evaluate);
    let ledger = RosterLedger::new(pool, CapacityMap::reference()).unwrap();
    let optimizer = optimizer();

    // The cheapest eight other slots cost $12, so a $50 budget leaves at
    // most $38 for the target.
    let value = MarginalValueAnalyzer::new(&optimizer, BidSchedule::default())
        .compute_marginal_value(50.0, &ledger)
        .unwrap();

    let stop = value.stopped_at.expect("sweep should hit the budget");
    assert!(stop <= 50.0);
    assert!(value.curve.iter().all(|pt| pt.bid < stop));
    assert!(value.threshold < stop);
}

#[test]
fn roster_result_serializes_for_reports() {
    let ledger = RosterLedger::new(league_pool(), CapacityMap::reference()).unwrap();
    let result = optimizer().compute_optimal_roster(200.0, &ledger).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["roster"].as_array().unwrap().len(), 9);
    assert!(json.get("assignment").is_none());
    assert!(json["roster"][0]["position"].is_string());
}
