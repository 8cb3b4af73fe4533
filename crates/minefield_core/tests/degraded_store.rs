use futures::future::{self, BoxFuture};
use minefield_core::client::{
    FindMany, MutableTable, MutableTableClient, StoreError, StoreResult, Table, TableClient,
};
use minefield_core::{Cell, CellPos, Game, GameId, RepoError, Store, TaskId, User, UserId};

/// Client whose every request fails as if the database were unreachable.
#[derive(Clone)]
struct UnreachableClient;

fn refused<T: Send + 'static>() -> BoxFuture<'static, StoreResult<T>> {
    Box::pin(future::ready(Err(StoreError::unavailable(
        "connection refused",
    ))))
}

impl<T: Table> TableClient<T> for UnreachableClient {
    fn create(&self, _row: T::Row) -> BoxFuture<'static, StoreResult<T::Row>> {
        refused()
    }

    fn find_unique(&self, _key: T::Key) -> BoxFuture<'static, StoreResult<Option<T::Row>>> {
        refused()
    }

    fn find_first(&self) -> BoxFuture<'static, StoreResult<Option<T::Row>>> {
        refused()
    }

    fn find_many(&self, _query: FindMany<T>) -> BoxFuture<'static, StoreResult<Vec<T::Row>>> {
        refused()
    }

    fn delete(&self, _key: T::Key) -> BoxFuture<'static, StoreResult<()>> {
        refused()
    }
}

impl<T: MutableTable> MutableTableClient<T> for UnreachableClient {
    fn upsert(
        &self,
        _key: T::Key,
        _update: T::Update,
        _create: T::Row,
    ) -> BoxFuture<'static, StoreResult<T::Row>> {
        refused()
    }

    fn update(&self, _key: T::Key, _update: T::Update) -> BoxFuture<'static, StoreResult<T::Row>> {
        refused()
    }
}

fn store() -> Store<UnreachableClient> {
    Store::new(UnreachableClient)
}

fn alice() -> UserId {
    UserId::parse("alice").unwrap()
}

#[tokio::test]
async fn cell_reads_and_delete_degrade_to_sentinels() {
    let store = store();

    assert!(store.cells.find_all().await.is_empty());
    assert!(store.cells.find_all_of_player(&alice()).await.is_empty());
    assert_eq!(store.cells.find(0, 0).await, None);
    assert!(store.cells.find_older().await.is_empty());
    assert!(store.cells.find_all_user_inputted().await.is_empty());
    store.cells.delete(0, 0).await;
}

#[tokio::test]
async fn checked_surface_reports_the_store_failure() {
    let store = store();

    let err = store.cells.try_find(0, 0).await.unwrap_err();
    assert!(matches!(err, RepoError::Store(StoreError::Unavailable { .. })));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn cell_create_propagates_the_failure() {
    let store = store();
    let cell = Cell::opened_by(CellPos::new(1, 1), alice(), 0, 0);

    assert!(matches!(
        store.cells.create(&cell).await,
        Err(RepoError::Store(StoreError::Unavailable { .. }))
    ));
}

#[tokio::test]
async fn game_operations_degrade_to_none() {
    let store = store();
    let game = Game::fresh(GameId::generate(), vec![vec![]]).unwrap();

    assert_eq!(store.games.find().await, None);
    assert_eq!(store.games.save(&game).await, None);
}

#[tokio::test]
async fn account_operations_degrade_and_task_create_propagates() {
    let store = store();
    let user = User {
        id: alice(),
        email: "alice@example.com".to_string(),
        display_name: None,
        photo_url: None,
    };

    assert_eq!(store.users.save(&user).await, None);
    assert_eq!(store.users.find(&user.id).await, None);
    assert!(store.users.find_all().await.is_empty());
    assert!(store.tasks.find_all().await.is_empty());
    assert_eq!(store.tasks.set_done(&TaskId::generate(), true).await, None);
    store.tasks.delete(&TaskId::generate()).await;
    assert!(store.tasks.create("flag the corner").await.is_err());
}
