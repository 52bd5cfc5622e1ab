use policy_chess::board::Position;
use policy_chess::perft::{perft, preset};

#[test]
fn perft_startpos_small_depths() {
    let b = Position::startpos();
    assert_eq!(perft(&b, 1), 20);
    assert_eq!(perft(&b, 2), 400);
    assert_eq!(perft(&b, 3), 8902);
    assert_eq!(perft(&b, 4), 197281);
}

#[test]
fn perft_kiwipete() {
    // Castling both ways, en passant, promotions and pins.
    let b = preset("kiwipete").unwrap();
    assert_eq!(perft(&b, 1), 48);
    assert_eq!(perft(&b, 2), 2039);
    assert_eq!(perft(&b, 3), 97862);
}

#[test]
fn perft_rook_endgame() {
    let b = preset("endgame").unwrap();
    assert_eq!(perft(&b, 1), 14);
    assert_eq!(perft(&b, 2), 191);
    assert_eq!(perft(&b, 3), 2812);
    assert_eq!(perft(&b, 4), 43238);
}
