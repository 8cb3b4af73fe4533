use chrono::{TimeZone, Utc};
use minefield_core::client::{CellRow, Cells, SqliteClient, StoreError, TableClient};
use minefield_core::{Cell, CellPos, CellRepository, RepoError, UserId};

fn repo() -> (SqliteClient, CellRepository<SqliteClient>) {
    let client = SqliteClient::open_in_memory().unwrap();
    let repo = CellRepository::new(client.clone());
    (client, repo)
}

fn user(id: &str) -> UserId {
    UserId::parse(id).unwrap()
}

fn cell(x: u32, y: u32, openers: &[&str], when_opened: i64) -> Cell {
    Cell {
        x,
        y,
        is_bomb: false,
        cell_value: (x + y) % 9,
        who_opened: Some(openers.iter().map(|id| user(id)).collect()),
        when_opened,
        is_user_input: true,
    }
}

fn positions(cells: &[Cell]) -> Vec<(u32, u32)> {
    cells.iter().map(|cell| (cell.x, cell.y)).collect()
}

#[tokio::test]
async fn create_then_find_roundtrip() {
    let (_, repo) = repo();
    let opened = Cell::opened_by(CellPos::new(4, 7), user("alice"), 3, 1_700_000_000_123);

    let created = repo.create(&opened).await.unwrap();
    assert_eq!(created, opened);

    let found = repo.find(4, 7).await.unwrap();
    assert_eq!(found, opened);
}

#[tokio::test]
async fn system_cell_without_openers_roundtrips() {
    let (_, repo) = repo();
    let system = Cell {
        x: 0,
        y: 0,
        is_bomb: true,
        cell_value: 0,
        who_opened: None,
        when_opened: 0,
        is_user_input: false,
    };

    repo.create(&system).await.unwrap();
    assert_eq!(repo.find(0, 0).await, Some(system));
}

#[tokio::test]
async fn find_missing_cell_is_none_and_checked_lookup_is_empty() {
    let (_, repo) = repo();

    assert_eq!(repo.find(9, 9).await, None);
    assert!(repo.try_find(9, 9).await.unwrap().is_none());
}

#[tokio::test]
async fn create_duplicate_position_propagates_unique_violation() {
    let (_, repo) = repo();
    repo.create(&cell(1, 1, &["alice"], 10)).await.unwrap();

    let err = repo.create(&cell(1, 1, &["bob"], 20)).await.unwrap_err();
    assert!(matches!(
        err,
        RepoError::Store(StoreError::UniqueViolation { table: "cells", .. })
    ));
    assert_eq!(
        repo.find(1, 1).await.unwrap().who_opened,
        Some(vec![user("alice")])
    );
}

#[tokio::test]
async fn find_all_orders_by_x_then_y_for_any_insertion_order() {
    let (_, repo) = repo();
    for (x, y) in [(2, 0), (0, 3), (1, 1), (0, 0), (2, 1), (1, 0)] {
        repo.create(&cell(x, y, &["alice"], 100)).await.unwrap();
    }

    let all = repo.find_all().await;
    assert_eq!(
        positions(&all),
        vec![(0, 0), (0, 3), (1, 0), (1, 1), (2, 0), (2, 1)]
    );
}

#[tokio::test]
async fn find_all_of_player_matches_the_exact_opener_list_only() {
    let (_, repo) = repo();
    repo.create(&cell(0, 0, &["alice"], 1)).await.unwrap();
    repo.create(&cell(0, 1, &["alice", "bob"], 2)).await.unwrap();
    repo.create(&cell(0, 2, &["bob"], 3)).await.unwrap();
    repo.create(&cell(0, 3, &["bob", "carol"], 4)).await.unwrap();

    assert_eq!(
        positions(&repo.find_all_of_player(&user("alice")).await),
        vec![(0, 0)]
    );
    // carol appears only inside a shared opener list, which never matches.
    assert!(repo.find_all_of_player(&user("carol")).await.is_empty());
    assert!(repo.find_all_of_player(&user("dave")).await.is_empty());
}

#[tokio::test]
async fn find_older_returns_newest_first_despite_its_name() {
    let (_, repo) = repo();
    repo.create(&cell(0, 0, &["alice"], 1_000)).await.unwrap();
    repo.create(&cell(1, 0, &["alice"], 3_000)).await.unwrap();
    repo.create(&cell(2, 0, &["alice"], 2_000)).await.unwrap();

    let ordered = repo.find_older().await;
    let stamps: Vec<i64> = ordered.iter().map(|cell| cell.when_opened).collect();
    assert_eq!(stamps, vec![3_000, 2_000, 1_000]);
}

#[tokio::test]
async fn find_all_user_inputted_skips_system_cells() {
    let (_, repo) = repo();
    repo.create(&cell(0, 0, &["alice"], 1)).await.unwrap();
    let mut system = cell(1, 0, &["alice"], 2);
    system.is_user_input = false;
    system.who_opened = None;
    repo.create(&system).await.unwrap();

    assert_eq!(
        positions(&repo.find_all_user_inputted().await),
        vec![(0, 0)]
    );
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (_, repo) = repo();
    repo.create(&cell(5, 5, &["alice"], 1)).await.unwrap();

    repo.delete(5, 5).await;
    repo.delete(5, 5).await;

    assert_eq!(repo.find(5, 5).await, None);
    let err = repo.try_delete(5, 5).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn negative_coordinate_row_degrades_the_whole_scan() {
    let (client, repo) = repo();
    repo.create(&cell(0, 0, &["alice"], 1)).await.unwrap();
    TableClient::<Cells>::create(
        &client,
        CellRow {
            x: -1,
            y: 0,
            is_bomb: false,
            cell_value: 0,
            who_opened: None,
            when_opened: Utc.timestamp_millis_opt(2).unwrap(),
            is_user_input: false,
        },
    )
    .await
    .unwrap();

    // One corrupt row hides every valid row on the default surface.
    assert!(repo.find_all().await.is_empty());
    assert!(matches!(
        repo.try_find_all().await,
        Err(RepoError::InvalidRow { table: "cells", .. })
    ));
    assert!(repo.find(0, 0).await.is_some());
}

#[tokio::test]
async fn corrupt_opener_id_is_reported_as_invalid_row() {
    let (client, repo) = repo();
    TableClient::<Cells>::create(
        &client,
        CellRow {
            x: 3,
            y: 3,
            is_bomb: false,
            cell_value: 1,
            who_opened: Some(vec!["bad id".to_string()]),
            when_opened: Utc.timestamp_millis_opt(0).unwrap(),
            is_user_input: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(repo.find(3, 3).await, None);
    assert!(matches!(
        repo.try_find(3, 3).await,
        Err(RepoError::InvalidRow { .. })
    ));
}

#[tokio::test]
async fn far_future_timestamp_is_rejected_without_touching_the_board() {
    let (_, repo) = repo();
    repo.create(&cell(0, 0, &["alice"], 1_700_000_000_000))
        .await
        .unwrap();

    for when_opened in [253_402_300_800_000, -65_322_000_000_000] {
        let err = repo
            .create(&cell(2, 2, &["bob"], when_opened))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidInput { entity: "cell", .. }));
    }

    assert_eq!(repo.find(2, 2).await, None);
    assert_eq!(positions(&repo.find_all().await), vec![(0, 0)]);
    assert_eq!(positions(&repo.find_older().await), vec![(0, 0)]);

    let last_ms = 253_402_300_799_999;
    repo.create(&cell(2, 2, &["bob"], last_ms)).await.unwrap();
    assert_eq!(repo.find(2, 2).await.unwrap().when_opened, last_ms);
    assert_eq!(positions(&repo.find_older().await), vec![(2, 2), (0, 0)]);
}
