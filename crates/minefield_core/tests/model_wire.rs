use minefield_core::{
    BombMark, Cell, CellPos, Game, GameId, Player, User, UserId, UserInput, ValidationError,
};
use serde_json::json;

#[test]
fn cell_serializes_with_client_field_names() {
    let cell = Cell::opened_by(
        CellPos::new(2, 5),
        UserId::parse("alice").unwrap(),
        1,
        1_700_000_000_000,
    );

    let value = serde_json::to_value(&cell).unwrap();
    assert_eq!(
        value,
        json!({
            "x": 2,
            "y": 5,
            "isBomb": false,
            "cellValue": 1,
            "whoOpened": ["alice"],
            "whenOpened": 1_700_000_000_000_i64,
            "isUserInput": true
        })
    );
}

#[test]
fn game_grids_serialize_as_integers_and_validate_on_decode() {
    let game = Game::fresh(
        GameId::parse("game-1").unwrap(),
        vec![vec![BombMark::Bomb, BombMark::Clear]],
    )
    .unwrap();

    let value = serde_json::to_value(&game).unwrap();
    assert_eq!(value["bombMap"], json!([[1, 0]]));
    assert_eq!(value["userInputs"], json!([[0, 0]]));

    let decoded: Game = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, game);

    let bad = json!({ "id": "game-1", "bombMap": [[1, 2]], "userInputs": [[0, 0]] });
    assert!(serde_json::from_value::<Game>(bad).is_err());
}

#[test]
fn game_decode_rejects_ragged_and_mismatched_grids() {
    let ragged = json!({ "id": "game-1", "bombMap": [[1, 0], [0]], "userInputs": [[0, 0], [0]] });
    let err = serde_json::from_value::<Game>(ragged).unwrap_err();
    assert!(err.to_string().contains("bombMap"));

    let mismatched = json!({ "id": "game-1", "bombMap": [[1, 0]], "userInputs": [[0, 0, 0]] });
    assert!(serde_json::from_value::<Game>(mismatched).is_err());
}

#[test]
fn game_new_rejects_ragged_grids() {
    let err = Game::new(
        GameId::parse("game-1").unwrap(),
        vec![vec![BombMark::Clear, BombMark::Clear], vec![BombMark::Clear]],
        vec![vec![UserInput::Untouched; 2], vec![UserInput::Untouched]],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ValidationError::RaggedGrid {
            grid: "bombMap",
            row: 1,
            found: 1,
            expected: 2
        }
    );
}

#[test]
fn game_reports_dimensions_and_bombs() {
    let game = Game::fresh(
        GameId::generate(),
        vec![
            vec![BombMark::Bomb, BombMark::Clear, BombMark::Clear],
            vec![BombMark::Clear, BombMark::Bomb, BombMark::Clear],
        ],
    )
    .unwrap();
    assert_eq!(game.dimensions(), (2, 3));
    assert_eq!(game.bomb_count(), 2);
}

#[test]
fn ids_reject_invalid_strings_on_decode() {
    assert!(serde_json::from_value::<UserId>(json!("alice")).is_ok());
    assert!(serde_json::from_value::<UserId>(json!("")).is_err());
    assert!(serde_json::from_value::<GameId>(json!("has space")).is_err());
}

#[test]
fn player_spawns_live_with_display_name_or_email() {
    let mut user = User {
        id: UserId::parse("bob").unwrap(),
        email: "bob@example.com".to_string(),
        display_name: None,
        photo_url: None,
    };

    let anonymous = Player::spawn(&user, 3, 4);
    assert_eq!(anonymous.name, "bob@example.com");
    assert!(anonymous.is_live);
    assert_eq!(anonymous.score, 0);

    user.display_name = Some("Bob".to_string());
    let named = Player::spawn(&user, 0, 0);
    assert_eq!(
        serde_json::to_value(&named).unwrap(),
        json!({ "id": "bob", "name": "Bob", "x": 0, "y": 0, "score": 0, "isLive": true })
    );
}
