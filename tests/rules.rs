use policy_chess::board::san::{parse_san, san_for_move};
use policy_chess::board::{Color, DrawReason, Game, GameStatus, Outcome, PieceKind, Position};
use pretty_assertions::assert_eq;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[test]
fn fools_mate() {
    let mut game = Game::new();
    let mut last = String::new();
    for san in ["f3", "e5", "g4", "Qh4#"] {
        last = game.play_san(san).unwrap();
    }
    assert_eq!(last, "Qh4#");
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.status(), GameStatus::Over(Outcome::Win(Color::Black)));
    assert_eq!(game.status().label(), "Checkmate");
    assert_eq!(game.result().map(|o| o.to_string()), Some("Black wins by checkmate".to_string()));
    assert_eq!(game.pgn_movetext(), "1. f3 e5 2. g4 Qh4# 0-1");
}

#[test]
fn lone_kings_are_drawn_but_a_rook_is_not() {
    let kings = Position::builder()
        .piece("e1", Color::White, PieceKind::King)
        .piece("e8", Color::Black, PieceKind::King);
    let bare = Game::from_position(kings.clone().build().unwrap());
    assert_eq!(bare.status(), GameStatus::Over(Outcome::Draw(DrawReason::InsufficientMaterial)));

    let with_rook = Game::from_position(kings.piece("a1", Color::White, PieceKind::Rook).build().unwrap());
    assert_eq!(with_rook.status(), GameStatus::InProgress);
}

#[test]
fn king_shuffle_repeats_on_third_occurrence() {
    let pos = Position::builder()
        .piece("e1", Color::White, PieceKind::King)
        .piece("h1", Color::White, PieceKind::Rook)
        .piece("e8", Color::Black, PieceKind::King)
        .piece("a8", Color::Black, PieceKind::Rook)
        .build()
        .unwrap();
    let mut game = Game::from_position(pos);
    let shuffle = ["Kd1", "Kd8", "Ke1", "Ke8"];
    for san in shuffle {
        game.play_san(san).unwrap();
    }
    // Second occurrence of the start.
    assert!(!game.is_over());
    for san in shuffle {
        game.play_san(san).unwrap();
    }
    assert_eq!(game.result(), Some(Outcome::Draw(DrawReason::Repetition)));
    assert!(game.play_san("Kd1").is_err());
}

#[test]
fn knight_shuffle_from_the_start_position() {
    let mut game = Game::new();
    for san in ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1"] {
        game.play_san(san).unwrap();
        assert!(!game.is_over(), "drawn too early after {}", san);
    }
    game.play_san("Ng8").unwrap();
    assert_eq!(game.status().label(), "Draw");
    assert_eq!(game.result().map(|o| o.result_token()), Some("1/2-1/2"));
}

#[test]
fn san_round_trips_over_random_games() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..25 {
        let mut game = Game::new();
        while !game.is_over() && game.plies() < 150 {
            let pos = game.position();
            let legal = game.legal_moves();
            for mv in legal {
                let san = san_for_move(pos, mv, legal);
                assert_eq!(parse_san(pos, &san, legal).unwrap(), *mv, "{san}");
            }
            let mv = legal[rng.gen_range(0..legal.len())];
            game.play(&mv).unwrap();
        }
    }
}

#[test]
fn loose_san_input_is_accepted() {
    let mut game = Game::new();
    for (input, san) in [("e4!", "e4"), ("e5?!", "e5"), ("nf3", "Nf3"), ("nc6", "Nc6"), ("bc4", "Bc4"), ("bc5", "Bc5")] {
        assert_eq!(game.play_san(input).unwrap(), san);
    }
    assert_eq!(game.play_san("0-0").unwrap(), "O-O");
}

#[test]
fn promotion_with_check_suffix() {
    let pos = Position::builder()
        .piece("a1", Color::White, PieceKind::King)
        .piece("b7", Color::White, PieceKind::Pawn)
        .piece("h8", Color::Black, PieceKind::King)
        .build()
        .unwrap();
    let mut game = Game::from_position(pos);
    assert_eq!(game.play_san("b8=Q").unwrap(), "b8=Q+");
    assert_eq!(game.status(), GameStatus::Check);
}

#[test]
fn en_passant_capture() {
    let mut game = Game::new();
    for san in ["e4", "a6", "e5", "d5"] {
        game.play_san(san).unwrap();
    }
    assert_eq!(game.play_san("exd6").unwrap(), "exd6");
    assert_eq!(game.position().piece_at(35), None);
}

#[test]
fn queen_move_stalemates_the_cornered_king() {
    let pos = Position::builder()
        .piece("h1", Color::White, PieceKind::King)
        .piece("b1", Color::White, PieceKind::Queen)
        .piece("a8", Color::Black, PieceKind::King)
        .build()
        .unwrap();
    let mut game = Game::from_position(pos);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.play_san("Qb6").unwrap(), "Qb6");
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.status(), GameStatus::Over(Outcome::Draw(DrawReason::Stalemate)));
    assert_eq!(game.status().label(), "Stalemate");
    assert_eq!(game.result().map(|o| o.result_token()), Some("1/2-1/2"));
}

#[test]
fn hundredth_quiet_ply_draws_by_fifty_moves() {
    let pos = Position::builder()
        .piece("e1", Color::White, PieceKind::King)
        .piece("h1", Color::White, PieceKind::Rook)
        .piece("e8", Color::Black, PieceKind::King)
        .piece("a8", Color::Black, PieceKind::Rook)
        .halfmove_clock(96)
        .build()
        .unwrap();
    let mut game = Game::from_position(pos);
    for san in ["Rh2", "Ra7", "Rh3"] {
        game.play_san(san).unwrap();
        assert!(!game.is_over(), "drawn too early after {}", san);
    }
    assert_eq!(game.position().halfmove_clock(), 99);
    game.play_san("Ra6").unwrap();
    assert_eq!(game.result(), Some(Outcome::Draw(DrawReason::FiftyMove)));
    assert!(game.play_san("Rh4").is_err());
}
