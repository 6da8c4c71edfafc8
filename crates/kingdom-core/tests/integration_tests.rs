//! Integration tests for the Patchwork Kingdom engine.
//!
//! These tests drive complete games from `Start` to `End` the way an outside
//! game loop would.

use kingdom_core::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

/// Upper bound on moves in any game, to catch a stuck state machine
const MAX_MOVES: usize = 1_000;

/// Picks moves for whichever player the game is waiting on
trait MoveSource {
    fn next_move(&mut self, game: &Game) -> GameMove;
}

/// Always submits the first valid move
struct FirstValid;

impl MoveSource for FirstValid {
    fn next_move(&mut self, game: &Game) -> GameMove {
        game.valid_moves()[0]
    }
}

/// Submits a random valid move
struct RandomValid(StdRng);

impl MoveSource for RandomValid {
    fn next_move(&mut self, game: &Game) -> GameMove {
        *game.valid_moves().choose(&mut self.0).unwrap()
    }
}

/// Everything observed while playing a game
#[derive(Default)]
struct Trace {
    events: Vec<GameEvent>,
    moves: usize,
}

/// Drive a game until it ends, checking invariants after every move
fn play(game: &mut Game, source: &mut dyn MoveSource) -> Trace {
    let mut trace = Trace::default();

    while !game.is_finished() {
        assert!(trace.moves < MAX_MOVES, "game did not finish");
        let game_move = match game.state() {
            GameState::Start => GameMove::None,
            _ => source.next_move(game),
        };
        let events = game.apply_move(game_move).expect("valid move rejected");
        check_invariants(game);
        trace.events.extend(events);
        trace.moves += 1;
    }

    trace
}

fn check_invariants(game: &Game) {
    for player in game.players() {
        let kingdom = &player.kingdom;
        assert_eq!(kingdom.get(Point::ORIGIN), Some(Square::CASTLE));
        assert!(kingdom.is_connected(), "{} kingdom split", player.color);
        assert_eq!(kingdom.tiles_placed() as u32, player.tiles_placed);

        let held = game
            .current_offer()
            .iter()
            .filter(|s| s.claimed_by == Some(player.color) && !s.delivered)
            .count();
        assert!(held <= 1, "{} holds {} tiles", player.color, held);
    }
}

fn seeded(config: GameConfig, seed: u64) -> Game {
    Game::with_rng(config, &mut StdRng::seed_from_u64(seed)).unwrap()
}

#[test]
fn test_two_player_game_runs_to_end() {
    // The 24 catalog tiles with a plain square, in catalog order, so every
    // tile can extend the plain region and none is ever discarded
    let draw: Vec<Tile> = all_tiles()
        .into_iter()
        .filter(|t| t.squares().iter().any(|s| s.terrain == Terrain::Plain))
        .collect();
    assert_eq!(draw.len(), 24);

    let config = GameConfig::standard(PlayerColor::first(2));
    assert_eq!(config.size, 7);
    let mut game = Game::with_draw_order(config, draw).unwrap();

    let trace = play(&mut game, &mut FirstValid);

    assert_eq!(game.state(), GameState::End);
    // 12 draft rounds plus the final placement-only round
    assert_eq!(game.round(), 13);
    for player in game.players() {
        assert_eq!(player.tiles_placed, 12);
        assert_eq!(player.tiles_discarded, 0);
        assert_eq!(player.kingdom.len(), 25);
    }
    let drafted = trace
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::PatchDrafted { .. }))
        .count();
    assert_eq!(drafted, 24);
    assert!(matches!(
        trace.events.last(),
        Some(GameEvent::GameEnded { .. })
    ));
}

#[test]
fn test_shuffled_two_player_game_delivers_every_tile() {
    let mut game = seeded(GameConfig::standard(PlayerColor::first(2)), 1);
    play(&mut game, &mut FirstValid);

    for player in game.players() {
        assert_eq!(player.tiles_delivered(), 12);
        assert_eq!(
            player.kingdom.tiles_placed() as u32,
            player.tiles_placed
        );
    }
}

#[test]
fn test_first_round_is_draft_only() {
    let mut game = seeded(GameConfig::standard(PlayerColor::first(2)), 5);
    game.start().unwrap();

    let first = PlayerColor::Yellow;
    let second = PlayerColor::Red;
    assert_eq!(game.state(), GameState::MapNextPatch(first));
    assert!(game.current_patches().is_empty());

    game.apply_action(first, GameMove::MapNextPatch(0)).unwrap();
    assert_eq!(game.state(), GameState::MapNextPatch(second));
    game.apply_action(second, GameMove::MapNextPatch(1)).unwrap();

    // Nobody placed anything, and round 2 is drafting
    assert_eq!(game.round(), 2);
    assert!(matches!(game.state(), GameState::MapNextPatch(_)));
    for player in game.players() {
        assert!(player.kingdom.is_empty());
    }
}

#[test]
fn test_four_players_use_whole_catalog() {
    let mut game = seeded(GameConfig::standard(PlayerColor::first(4)), 9);
    assert_eq!(game.config().size, 5);
    assert_eq!(game.choice_depth(), 4);

    let trace = play(&mut game, &mut RandomValid(StdRng::seed_from_u64(9)));

    let delivered: u32 = game.players().iter().map(Player::tiles_delivered).sum();
    assert_eq!(delivered, TILE_COUNT as u32);
    let placed = trace
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::PatchPlaced { .. }))
        .count();
    let discarded = trace
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::PatchDiscarded { .. }))
        .count();
    assert_eq!(placed + discarded, TILE_COUNT);
}

#[test]
fn test_three_player_game_leaves_tiles_unused() {
    let mut game = seeded(GameConfig::standard(PlayerColor::first(3)), 3);
    play(&mut game, &mut FirstValid);

    for player in game.players() {
        assert_eq!(player.tiles_delivered(), STANDARD_TURNS);
        assert!(player.kingdom.len() <= 25);
    }
}

#[test]
fn test_scores_are_idempotent() {
    let mut game = seeded(GameConfig::standard(PlayerColor::first(2)), 11);
    play(&mut game, &mut RandomValid(StdRng::seed_from_u64(11)));

    let first = game.scores();
    let second = game.scores();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);

    for (color, score) in &first {
        let kingdom = game.kingdom(*color).unwrap();
        let from_regions: u32 = kingdom.connected_regions().iter().map(Region::score).sum();
        assert_eq!(*score, from_regions);
    }
}

#[test]
fn test_game_ended_event_matches_scores() {
    let config = GameConfig::standard(PlayerColor::first(3)).with_scoring(ScoringRules::WITH_BONUSES);
    let mut game = seeded(config, 21);
    let trace = play(&mut game, &mut FirstValid);

    let Some(GameEvent::GameEnded { scores }) = trace.events.last() else {
        panic!("last event should end the game");
    };
    let expected: HashMap<PlayerColor, u32> = scores.iter().copied().collect();
    assert_eq!(expected, game.scores());
    for (color, score) in scores {
        assert_eq!(game.score_breakdown(*color).unwrap().total(), *score);
    }
}

#[test]
fn test_rejected_moves_change_nothing() {
    let mut game = seeded(GameConfig::standard(PlayerColor::first(2)), 4);
    game.start().unwrap();

    let bad_moves = [
        GameMove::MapNextPatch(2),
        GameMove::MapNextPatch(usize::MAX),
        GameMove::PlaceCurrentPatch(Placement::new(Point::new(1, 0), Direction::East)),
        GameMove::DiscardCurrentPatch,
    ];

    let mut source = FirstValid;
    while !game.is_finished() {
        let before = game.clone();
        for bad in bad_moves {
            if game.valid_moves().contains(&bad) {
                continue;
            }
            assert!(!game.next_turn(bad), "{:?} accepted in {:?}", bad, game.state());
            assert_eq!(game, before);
        }
        let good = source.next_move(&game);
        assert!(game.next_turn(good));
    }
}

#[test]
fn test_every_valid_move_is_accepted() {
    let mut game = seeded(GameConfig::standard(PlayerColor::first(3)), 8);
    let mut source = RandomValid(StdRng::seed_from_u64(8));

    for _ in 0..40 {
        if game.is_finished() {
            break;
        }
        for candidate in game.valid_moves() {
            let mut copy = game.clone();
            assert!(copy.apply_move(candidate).is_ok(), "{:?} rejected", candidate);
        }
        let chosen = source.next_move(&game);
        game.apply_move(chosen).unwrap();
    }
}

#[test]
fn test_invalid_construction() {
    assert_eq!(
        Game::new(7, vec![PlayerColor::Red], 12).unwrap_err(),
        ConfigError::PlayerCount(1)
    );
    assert_eq!(
        Game::new(5, PlayerColor::first(2), 12).unwrap_err(),
        ConfigError::SizeMismatch {
            expected: 7,
            actual: 5
        }
    );
    assert_eq!(
        Game::new(5, vec![PlayerColor::Red, PlayerColor::Blue, PlayerColor::Red], 12).unwrap_err(),
        ConfigError::DuplicatePlayer(PlayerColor::Red)
    );
    assert!(Game::new(5, PlayerColor::first(4), 12).is_ok());
}

#[test]
fn test_config_loads_from_json() {
    let json = r#"{"size": 5, "players": ["Blue", "Green", "Red"], "turns": 10}"#;
    let config: GameConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.scoring, ScoringRules::BASE);

    let game = Game::from_config(config).unwrap();
    assert_eq!(game.turn_order(), &[PlayerColor::Blue, PlayerColor::Green, PlayerColor::Red]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_catalog_survives_any_shuffle(seed in any::<u64>()) {
        let shuffled = shuffled_draw_order(&mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(shuffled.len(), TILE_COUNT);

        let mut counts: HashMap<Tile, i32> = HashMap::new();
        for tile in all_tiles() {
            *counts.entry(tile).or_insert(0) += 1;
        }
        for tile in shuffled {
            *counts.entry(tile).or_insert(0) -= 1;
        }
        prop_assert!(counts.values().all(|&c| c == 0));
    }

    #[test]
    fn prop_draft_order_follows_slot_index(seed in any::<u64>(), players in 2usize..=4) {
        let mut game = seeded(GameConfig::standard(PlayerColor::first(players)), seed);
        let trace = play(&mut game, &mut RandomValid(StdRng::seed_from_u64(seed ^ 0xA5A5)));

        let mut claims: Vec<(usize, PlayerColor)> = Vec::new();
        let mut rounds_started = 0;
        for event in &trace.events {
            match event {
                GameEvent::GameStarted { turn_order } => {
                    prop_assert_eq!(turn_order, &PlayerColor::first(players));
                }
                GameEvent::PatchDrafted { player, index, .. } => {
                    claims.push((*index, *player));
                }
                GameEvent::RoundStarted { turn_order, .. } => {
                    prop_assert_eq!(claims.len(), players);
                    claims.sort();
                    let expected: Vec<PlayerColor> = claims.iter().map(|(_, p)| *p).collect();
                    prop_assert_eq!(turn_order, &expected);
                    claims.clear();
                    rounds_started += 1;
                }
                _ => {}
            }
        }
        prop_assert_eq!(rounds_started, STANDARD_TURNS);
    }

    #[test]
    fn prop_fresh_offers_are_unclaimed(seed in any::<u64>(), players in 2usize..=4) {
        let mut game = seeded(GameConfig::standard(PlayerColor::first(players)), seed);
        game.start().unwrap();
        let mut source = RandomValid(StdRng::seed_from_u64(seed));

        prop_assert_eq!(game.next_offer().len(), players);
        while !game.is_finished() {
            let chosen = source.next_move(&game);
            let events = game.apply_move(chosen).unwrap();
            if events.iter().any(|e| matches!(e, GameEvent::RoundStarted { .. })) {
                let offer = game.next_offer();
                prop_assert!(offer.len() == players || offer.is_empty());
                prop_assert!(offer.iter().all(|s| !s.is_claimed()));
            }
        }
    }

    #[test]
    fn prop_kingdoms_stay_connected(seed in any::<u64>()) {
        let mut game = seeded(GameConfig::standard(PlayerColor::first(2)), seed);
        play(&mut game, &mut RandomValid(StdRng::seed_from_u64(seed)));
        for player in game.players() {
            prop_assert!(player.kingdom.is_connected());
            prop_assert_eq!(player.tiles_delivered(), STANDARD_TURNS);
        }
    }
}
