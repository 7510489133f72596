//! Integration tests for fixed-team round generation.

use doubles_tournament_web::{
    generate_round, Match, MatchHistory, RematchFallback, Team, TournamentConfig, TournamentError,
    Warning,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn teams(n: usize) -> Vec<Team> {
    (1..=n)
        .map(|i| {
            Team::pair(
                format!("Team {i}"),
                (format!("P{i}a"), "Advanced".to_string(), 1.0),
                (format!("P{i}b"), "Leisure".to_string(), 1.2),
            )
        })
        .collect()
}

fn config(courts: usize) -> TournamentConfig {
    TournamentConfig {
        court_capacity: courts,
        ..TournamentConfig::default()
    }
}

fn fixture(round: u32, a: &Team, b: &Team) -> Match {
    Match::new(round, 1, (a.id.clone(), a.members()), (b.id.clone(), b.members()))
}

fn pair_key(m: &Match) -> (String, String) {
    if m.team_a < m.team_b {
        (m.team_a.clone(), m.team_b.clone())
    } else {
        (m.team_b.clone(), m.team_a.clone())
    }
}

#[test]
fn needs_two_teams() {
    let mut rng = StdRng::seed_from_u64(1);
    let err = generate_round(&teams(1), &MatchHistory::default(), &config(3), &mut rng).unwrap_err();
    assert_eq!(
        err,
        TournamentError::InsufficientTeams {
            required: 2,
            available: 1
        }
    );
}

#[test]
fn six_teams_two_rounds_without_repeats() {
    let teams = teams(6);
    let mut rng = StdRng::seed_from_u64(42);
    let mut log: Vec<Match> = Vec::new();

    for round in 1..=2 {
        let history = MatchHistory::from_matches(&log);
        let outcome = generate_round(&teams, &history, &config(3), &mut rng).unwrap();
        assert_eq!(outcome.round, round);
        assert_eq!(outcome.matches.len(), 3);
        assert!(outcome.warnings.is_empty());

        let courts: Vec<&str> = outcome.matches.iter().map(|m| m.court.as_str()).collect();
        assert_eq!(courts, vec!["Court 1", "Court 2", "Court 3"]);

        let mut seen = HashSet::new();
        for m in &outcome.matches {
            assert_eq!((m.score_a, m.score_b), (0, 0));
            assert!(seen.insert(m.team_a.clone()), "team plays twice in one round");
            assert!(seen.insert(m.team_b.clone()), "team plays twice in one round");
            assert!(!history.have_met(&m.team_a, &m.team_b), "rematch in round {round}");
        }
        log.extend(outcome.matches);
    }

    let distinct: HashSet<_> = log.iter().map(pair_key).collect();
    assert_eq!(distinct.len(), 6);
}

#[test]
fn exhausted_pairings_fall_back_to_rematches() {
    let t = teams(4);
    let log = vec![
        fixture(1, &t[0], &t[1]),
        fixture(1, &t[2], &t[3]),
        fixture(2, &t[0], &t[2]),
        fixture(2, &t[1], &t[3]),
        fixture(3, &t[0], &t[3]),
        fixture(3, &t[1], &t[2]),
    ];
    let history = MatchHistory::from_matches(&log);
    let mut rng = StdRng::seed_from_u64(3);

    let outcome = generate_round(&t, &history, &config(7), &mut rng).unwrap();
    assert_eq!(outcome.round, 4);
    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(
        outcome.warnings,
        vec![Warning::NoNovelPairingAvailable { rematches: 2 }]
    );
}

#[test]
fn rematches_can_be_disabled() {
    let t = teams(2);
    let history = MatchHistory::from_matches(&[fixture(1, &t[0], &t[1])]);
    let config = TournamentConfig {
        rematch_fallback: RematchFallback::Never,
        ..config(2)
    };
    let mut rng = StdRng::seed_from_u64(3);

    let outcome = generate_round(&t, &history, &config, &mut rng).unwrap();
    assert!(outcome.matches.is_empty());
    assert_eq!(
        outcome.warnings,
        vec![Warning::NoNovelPairingAvailable { rematches: 0 }]
    );
}

#[test]
fn court_capacity_caps_the_round() {
    let mut rng = StdRng::seed_from_u64(9);
    let outcome = generate_round(&teams(10), &MatchHistory::default(), &config(3), &mut rng).unwrap();
    assert_eq!(outcome.matches.len(), 3);
    assert_eq!(
        outcome.warnings,
        vec![Warning::CourtCapacityExceeded {
            teams: 10,
            courts: 3,
            matches: 3
        }]
    );
}

#[test]
fn idle_team_plays_next_round() {
    let teams = teams(5);
    let mut rng = StdRng::seed_from_u64(11);
    let first = generate_round(&teams, &MatchHistory::default(), &config(2), &mut rng).unwrap();
    assert_eq!(first.matches.len(), 2);

    let idle: Vec<&Team> = teams
        .iter()
        .filter(|t| !first.matches.iter().any(|m| m.involves_team(&t.id)))
        .collect();
    assert_eq!(idle.len(), 1);

    let history = MatchHistory::from_matches(&first.matches);
    let second = generate_round(&teams, &history, &config(2), &mut rng).unwrap();
    assert_eq!(second.matches.len(), 2);
    assert!(second.matches.iter().any(|m| m.involves_team(&idle[0].id)));
    assert!(second.matches.iter().all(|m| !history.have_met(&m.team_a, &m.team_b)));

    let mut log = first.matches.clone();
    log.extend(second.matches);
    let after = MatchHistory::from_matches(&log);
    let counts: Vec<u32> = teams.iter().map(|t| after.team_play_count(&t.id)).collect();
    let spread = counts.iter().max().unwrap() - counts.iter().min().unwrap();
    assert!(spread <= 1, "play counts drifted apart: {counts:?}");
}

#[test]
fn same_seed_same_round() {
    let teams = teams(8);
    let a = generate_round(&teams, &MatchHistory::default(), &config(4), &mut StdRng::seed_from_u64(5)).unwrap();
    let b = generate_round(&teams, &MatchHistory::default(), &config(4), &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn stranded_team_does_not_block_new_pairings() {
    // Team 1 has met everyone; Team 3 and Team 4 have never met.
    let t = teams(4);
    let log = vec![
        fixture(1, &t[0], &t[1]),
        fixture(2, &t[0], &t[2]),
        fixture(3, &t[0], &t[3]),
        fixture(1, &t[1], &t[2]),
        fixture(2, &t[1], &t[3]),
        fixture(4, &t[1], &t[2]),
        fixture(5, &t[1], &t[3]),
    ];
    let history = MatchHistory::from_matches(&log);

    for seed in 0..60 {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = generate_round(&t, &history, &config(2), &mut rng).unwrap();
        let pairs: Vec<(String, String)> = outcome.matches.iter().map(pair_key).collect();
        assert_eq!(pairs.len(), 2, "seed {seed}");
        assert!(
            pairs.contains(&("Team 3".to_string(), "Team 4".to_string())),
            "seed {seed}: new pairing left out: {pairs:?}"
        );
        assert_eq!(
            outcome.warnings,
            vec![Warning::NoNovelPairingAvailable { rematches: 1 }]
        );
    }
}
