//! Integration tests for fixed team generation and per-round individual teams.

use doubles_tournament_web::{
    generate_teams, individual_teams, CategoryTable, MatchHistory, PairingMode, PairingStrategy,
    Player, TeamSet, TournamentConfig, TournamentError, Warning,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn roster(entries: &[(&str, &str)]) -> Vec<Player> {
    entries
        .iter()
        .map(|(first, category)| Player::active(*first, "Doe", *category))
        .collect()
}

#[test]
fn extremes_pairs_strongest_with_weakest() {
    let players = roster(&[
        ("Ann", "Leisure"),
        ("Bob", "Advanced"),
        ("Cid", "Leisure"),
        ("Dan", "Advanced"),
    ]);
    let (set, warnings) = generate_teams(
        &players,
        &CategoryTable::default(),
        &TeamSet::new(),
        PairingMode::Fresh,
        &TournamentConfig::default(),
    )
    .unwrap();

    assert!(warnings.is_empty());
    assert_eq!(set.ids(), vec!["Team 1".to_string(), "Team 2".to_string()]);
    for team in &set.teams {
        assert_eq!(team.coefficient, 1.1);
        assert!(!team.has_bye);
        assert_ne!(team.category_1, team.category_2);
    }
    assert_eq!(set.next_number, 3);
}

#[test]
fn odd_roster_gets_exactly_one_bye() {
    let players = roster(&[("Ann", "Leisure"), ("Bob", "Leisure"), ("Cid", "Leisure")]);
    let (set, warnings) = generate_teams(
        &players,
        &CategoryTable::default(),
        &TeamSet::new(),
        PairingMode::Fresh,
        &TournamentConfig::default(),
    )
    .unwrap();

    assert_eq!(set.len(), 2);
    let byes: Vec<_> = set.teams.iter().filter(|t| t.has_bye).collect();
    assert_eq!(byes.len(), 1);
    // (1.2 + 1.0) / 2
    assert_eq!(byes[0].coefficient, 1.1);
    assert_eq!(byes[0].player_2, "Bye 2");
    assert_eq!(byes[0].members().len(), 1);
    assert!(matches!(&warnings[..], [Warning::OddPlayerWithBye { .. }]));
}

#[test]
fn lowest_ranked_player_takes_the_bye() {
    let players = roster(&[
        ("Ann", "Advanced"),
        ("Bob", "Leisure"),
        ("Cid", "Competitor"),
    ]);
    let (set, _) = generate_teams(
        &players,
        &CategoryTable::default(),
        &TeamSet::new(),
        PairingMode::Fresh,
        &TournamentConfig::default(),
    )
    .unwrap();
    let bye = set.teams.iter().find(|t| t.has_bye).unwrap();
    assert_eq!(bye.player_1, "Ann Doe");
    assert_eq!(bye.coefficient, 1.0);
}

#[test]
fn pending_players_are_not_paired() {
    let mut players = roster(&[("Ann", "Leisure"), ("Bob", "Advanced")]);
    players.push(Player::new("Cid", "Doe", "Leisure"));
    let (set, warnings) = generate_teams(
        &players,
        &CategoryTable::default(),
        &TeamSet::new(),
        PairingMode::Fresh,
        &TournamentConfig::default(),
    )
    .unwrap();
    assert_eq!(set.len(), 1);
    assert!(warnings.is_empty());
    assert!(!set.contains_player("Cid Doe"));
}

#[test]
fn fresh_needs_two_players() {
    let players = roster(&[("Ann", "Leisure")]);
    let err = generate_teams(
        &players,
        &CategoryTable::default(),
        &TeamSet::new(),
        PairingMode::Fresh,
        &TournamentConfig::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        TournamentError::InsufficientPlayers {
            required: 2,
            available: 1
        }
    );
}

#[test]
fn unknown_category_is_an_error() {
    let players = roster(&[("Ann", "Leisure"), ("Bob", "Pro")]);
    let err = generate_teams(
        &players,
        &CategoryTable::default(),
        &TeamSet::new(),
        PairingMode::Fresh,
        &TournamentConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err, TournamentError::UnknownCategory("Pro".to_string()));
}

#[test]
fn append_keeps_existing_teams_and_numbering() {
    let categories = CategoryTable::default();
    let config = TournamentConfig::default();
    let mut players = roster(&[
        ("Ann", "Leisure"),
        ("Bob", "Advanced"),
        ("Cid", "Leisure"),
        ("Dan", "Advanced"),
    ]);
    let (first, _) =
        generate_teams(&players, &categories, &TeamSet::new(), PairingMode::Fresh, &config).unwrap();

    players.extend(roster(&[("Eve", "Competitor"), ("Fay", "Advanced")]));
    let (second, warnings) =
        generate_teams(&players, &categories, &first, PairingMode::Append, &config).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(second.len(), 3);
    assert_eq!(&second.teams[..2], &first.teams[..]);
    let added = &second.teams[2];
    assert_eq!(added.id, "Team 3");
    assert!(added.contains_player("Eve Doe"));
    assert!(added.contains_player("Fay Doe"));
    assert_eq!(added.coefficient, 1.025);
}

#[test]
fn append_without_newcomers_fails() {
    let categories = CategoryTable::default();
    let config = TournamentConfig::default();
    let players = roster(&[("Ann", "Leisure"), ("Bob", "Advanced")]);
    let (set, _) =
        generate_teams(&players, &categories, &TeamSet::new(), PairingMode::Fresh, &config).unwrap();
    let err = generate_teams(&players, &categories, &set, PairingMode::Append, &config).unwrap_err();
    assert_eq!(
        err,
        TournamentError::InsufficientPlayers {
            required: 1,
            available: 0
        }
    );
}

#[test]
fn append_can_fill_a_bye_slot() {
    let categories = CategoryTable::default();
    let mut config = TournamentConfig::default();
    let mut players = roster(&[("Ann", "Leisure"), ("Bob", "Advanced"), ("Cid", "Leisure")]);
    let (set, _) =
        generate_teams(&players, &categories, &TeamSet::new(), PairingMode::Fresh, &config).unwrap();
    let bye_id = set.teams.iter().find(|t| t.has_bye).unwrap().id.clone();

    config.append_fills_byes = true;
    players.extend(roster(&[("Dan", "Advanced")]));
    let (filled, warnings) =
        generate_teams(&players, &categories, &set, PairingMode::Append, &config).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(filled.len(), 2);
    let team = filled.get(&bye_id).unwrap();
    assert!(!team.has_bye);
    assert!(team.contains_player("Dan Doe"));
    assert_eq!(team.members().len(), 2);
}

#[test]
fn individual_teams_put_least_played_together() {
    let players = roster(&[
        ("Ann", "Leisure"),
        ("Bob", "Advanced"),
        ("Cid", "Leisure"),
        ("Dan", "Advanced"),
        ("Eve", "Competitor"),
    ]);
    let mut rng = StdRng::seed_from_u64(7);
    let (teams, warnings) = individual_teams(
        &players,
        &CategoryTable::default(),
        &MatchHistory::default(),
        4,
        PairingStrategy::Adjacent,
        &mut rng,
    )
    .unwrap();

    assert_eq!(teams.len(), 3);
    assert_eq!(teams[0].id, "R4-T1");
    assert_eq!(teams[2].player_2, "Bye R4");
    assert!(teams[2].has_bye);
    assert!(matches!(&warnings[..], [Warning::OddPlayerWithBye { .. }]));

    let seated: usize = teams.iter().map(|t| t.members().len()).sum();
    assert_eq!(seated, 5);
}
