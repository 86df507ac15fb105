//! Tests for the catalog service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockMovieRepository;
use crate::domain::ErrorCode;
use crate::test_support::InMemoryMovieRepository;

type Catalog = CatalogService<InMemoryMovieRepository>;

#[fixture]
fn catalog() -> Catalog {
    CatalogService::new(
        Arc::new(InMemoryMovieRepository::default()),
        CatalogSettings::default(),
    )
}

fn draft(title: &str, director: &str) -> MovieDraft {
    MovieDraft::try_from_parts(title, director, "1977-05-25", None, None).expect("valid draft")
}

async fn seed(catalog: &Catalog, titles: &[&str]) -> Vec<Movie> {
    let mut created = Vec::new();
    for title in titles {
        created.push(
            catalog
                .create(&draft(title, "George Lucas"))
                .await
                .expect("create succeeds"),
        );
    }
    created
}

#[rstest]
#[tokio::test]
async fn soft_deleted_movies_leave_default_reads(catalog: Catalog) {
    let movie = seed(&catalog, &["A New Hope"]).await.remove(0);

    catalog.soft_delete(&movie.id).await.expect("delete succeeds");

    let by_id = catalog
        .find_by_id(&movie.id, DeletionScope::ActiveOnly)
        .await
        .expect_err("deleted movie is hidden");
    assert_eq!(by_id.code(), ErrorCode::NotFound);
    let by_title = catalog
        .find_by_title("A New Hope")
        .await
        .expect_err("deleted movie is hidden");
    assert_eq!(by_title.code(), ErrorCode::NotFound);
    let page = catalog.list(None, None).await.expect("list succeeds");
    assert_eq!(page.total, 0);

    let deleted = catalog.list_deleted().await.expect("deleted list");
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].id, movie.id);
    let included = catalog
        .find_by_id(&movie.id, DeletionScope::IncludeDeleted)
        .await
        .expect("include-deleted scope sees it");
    assert!(!included.is_active());
}

#[rstest]
#[tokio::test]
async fn restore_brings_a_movie_back(catalog: Catalog) {
    let movie = seed(&catalog, &["Return of the Jedi"]).await.remove(0);
    catalog.soft_delete(&movie.id).await.expect("delete");

    let restored = catalog.restore(&movie.id).await.expect("restore");

    assert!(restored.is_active());
    assert_eq!(restored.key, movie.key);
    let found = catalog
        .find_by_title("Return of the Jedi")
        .await
        .expect("visible again");
    assert_eq!(found.id, movie.id);
}

#[rstest]
#[tokio::test]
async fn restoring_an_active_movie_is_a_no_op(catalog: Catalog) {
    let movie = seed(&catalog, &["The Phantom Menace"]).await.remove(0);

    let restored = catalog.restore(&movie.id).await.expect("restore");

    assert_eq!(restored, movie);
}

#[rstest]
#[tokio::test]
async fn deleting_twice_reports_not_found(catalog: Catalog) {
    let movie = seed(&catalog, &["Attack of the Clones"]).await.remove(0);
    catalog.soft_delete(&movie.id).await.expect("first delete");

    let error = catalog
        .soft_delete(&movie.id)
        .await
        .expect_err("second delete fails");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn unknown_ids_are_not_found(catalog: Catalog) {
    let id = MovieId::random();

    let delete = catalog.soft_delete(&id).await.expect_err("missing");
    let restore = catalog.restore(&id).await.expect_err("missing");

    assert_eq!(delete.code(), ErrorCode::NotFound);
    assert_eq!(restore.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_applies_default_page_size_and_title_order(catalog: Catalog) {
    let titles: Vec<String> = (0..12).rev().map(|n| format!("Episode {n:02}")).collect();
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    seed(&catalog, &refs).await;

    let page = catalog.list(None, None).await.expect("list succeeds");

    assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
    assert_eq!(page.total, 12);
    assert_eq!(page.movies.len(), 10);
    assert_eq!(page.movies[0].key.title(), "Episode 00");

    let tail = catalog.list(Some(5), Some(10)).await.expect("second page");
    assert_eq!(tail.movies.len(), 2);
    assert_eq!(tail.movies[1].key.title(), "Episode 11");
}

#[rstest]
#[case(0)]
#[case(MAX_PAGE_SIZE_PLUS_ONE)]
#[tokio::test]
async fn out_of_range_limits_are_rejected(catalog: Catalog, #[case] limit: u32) {
    let error = catalog
        .list(Some(limit), None)
        .await
        .expect_err("limit rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

const MAX_PAGE_SIZE_PLUS_ONE: u32 = crate::domain::MAX_PAGE_SIZE + 1;

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn blank_title_terms_are_invalid(catalog: Catalog, #[case] term: &str) {
    let error = catalog.find_by_title(term).await.expect_err("blank term");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "query term is required");
}

#[rstest]
#[tokio::test]
async fn creating_a_duplicate_natural_key_conflicts_even_when_deleted(catalog: Catalog) {
    let movie = seed(&catalog, &["A New Hope"]).await.remove(0);
    let active_clash = catalog
        .create(&draft("A New Hope", "George Lucas"))
        .await
        .expect_err("active clash");
    assert_eq!(active_clash.code(), ErrorCode::Conflict);

    catalog.soft_delete(&movie.id).await.expect("delete");
    let deleted_clash = catalog
        .create(&draft("A New Hope", "George Lucas"))
        .await
        .expect_err("deleted clash");
    assert_eq!(deleted_clash.code(), ErrorCode::Conflict);

    let other_director = catalog
        .create(&draft("A New Hope", "Irvin Kershner"))
        .await
        .expect("different natural key");
    assert_ne!(other_director.id, movie.id);
}

#[rstest]
#[tokio::test]
async fn update_merges_supplied_fields(catalog: Catalog) {
    let movie = seed(&catalog, &["Revenge of the Sith"]).await.remove(0);
    let changes = MovieChanges {
        producer: Some("Rick McCallum".to_owned()),
        ..MovieChanges::default()
    };

    let updated = catalog.update(&movie.id, &changes).await.expect("update");

    assert_eq!(updated.key, movie.key);
    assert_eq!(updated.details.producer.as_deref(), Some("Rick McCallum"));
    assert_eq!(updated.details.release_date, movie.details.release_date);
}

#[rstest]
#[tokio::test]
async fn updating_a_deleted_movie_is_not_found(catalog: Catalog) {
    let movie = seed(&catalog, &["The Empire Strikes Back"]).await.remove(0);
    catalog.soft_delete(&movie.id).await.expect("delete");
    let changes = MovieChanges {
        title: Some("Empire".to_owned()),
        ..MovieChanges::default()
    };

    let error = catalog
        .update(&movie.id, &changes)
        .await
        .expect_err("deleted movies are immutable");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn empty_change_sets_are_invalid(catalog: Catalog) {
    let movie = seed(&catalog, &["Rogue One"]).await.remove(0);

    let error = catalog
        .update(&movie.id, &MovieChanges::default())
        .await
        .expect_err("nothing to change");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(MoviePersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(MoviePersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_are_mapped(
    #[case] failure: MoviePersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockMovieRepository::new();
    repo.expect_list_deleted()
        .return_once(move || Err(failure));
    let catalog = CatalogService::new(Arc::new(repo), CatalogSettings::default());

    let error = catalog.list_deleted().await.expect_err("failure surfaces");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn catalog_runs_over_a_type_erased_store() {
    let movies: Arc<dyn MovieRepository> = Arc::new(InMemoryMovieRepository::default());
    let catalog: CatalogService<dyn MovieRepository> =
        CatalogService::new(movies, CatalogSettings::default());

    let created = catalog
        .create(&draft("Rogue One", "Gareth Edwards"))
        .await
        .expect("create succeeds");
    let found = catalog
        .find_by_title("Rogue One")
        .await
        .expect("find succeeds");

    assert_eq!(found.id, created.id);
}
