//! Integration tests for `MovieRepository` against a real PostgreSQL
//! instance.
//!
//! These tests are `#[ignore]`d by default because they need a live database;
//! point `DATABASE_URL` at a disposable PostgreSQL and run them with
//! `cargo test -p database -- --ignored`. Each test tags its rows with a
//! unique genre so concurrent test runs do not interfere, and cleans up
//! after itself.

use core_types::{Movie, Runtime};
use database::{DbError, Filters, MovieRepository, connect, run_migrations};
use std::time::Duration;

async fn repository() -> MovieRepository {
    let pool = connect(5, Duration::from_secs(5))
        .await
        .expect("failed to connect; is DATABASE_URL pointing at a test database?");
    run_migrations(&pool).await.expect("migrations failed");
    MovieRepository::new(pool)
}

/// Builds a draft whose title carries the test tag, keeping it clear of the
/// (title, year) uniqueness constraint across runs.
fn draft(title: &str, tag: &str) -> Movie {
    Movie {
        id: 0,
        created_at: Default::default(),
        title: format!("{title} {tag}"),
        year: 1986,
        runtime: Runtime(96),
        genres: vec![tag.to_string()],
        version: 0,
    }
}

fn unique_tag(test: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{test}-{nanos}")
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn insert_assigns_identity_and_version_one() {
    let repo = repository().await;
    let tag = unique_tag("insert");

    let mut movie = draft("The Breakfast Club", &tag);
    repo.insert(&mut movie).await.unwrap();

    assert!(movie.id > 0);
    assert_eq!(movie.version, 1);

    let fetched = repo.get(movie.id).await.unwrap();
    assert_eq!(fetched, movie);

    repo.delete(movie.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn insert_rejects_an_invalid_draft_with_every_violation() {
    let repo = repository().await;

    let mut movie = Movie {
        id: 0,
        created_at: Default::default(),
        title: String::new(),
        year: 0,
        runtime: Runtime(96),
        genres: (0..6).map(|i| format!("genre-{i}")).collect(),
        version: 0,
    };

    match repo.insert(&mut movie).await {
        Err(DbError::Validation(errors)) => {
            assert!(errors.get("title").is_some());
            assert!(errors.get("year").is_some());
            assert!(errors.get("genres").is_some());
        }
        other => panic!("expected a validation failure, got {other:?}"),
    }
    // Nothing was assigned, so nothing was written.
    assert_eq!(movie.id, 0);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn a_duplicate_insert_surfaces_the_constraint_violation() {
    let repo = repository().await;
    let tag = unique_tag("duplicate");

    let mut movie = draft("Vertigo", &tag);
    repo.insert(&mut movie).await.unwrap();

    let mut duplicate = draft("Vertigo", &tag);
    match repo.insert(&mut duplicate).await {
        Err(DbError::ConstraintViolation(message)) => {
            // The driver's message passes through unmodified.
            assert!(message.contains("movies_title_year_key"), "{message}");
        }
        other => panic!("expected a constraint violation, got {other:?}"),
    }

    repo.delete(movie.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn get_with_a_non_positive_or_unknown_id_fails_not_found() {
    let repo = repository().await;

    assert!(matches!(repo.get(0).await, Err(DbError::NotFound)));
    assert!(matches!(repo.get(-1).await, Err(DbError::NotFound)));
    assert!(matches!(repo.get(i64::MAX).await, Err(DbError::NotFound)));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn update_bumps_the_version_by_exactly_one() {
    let repo = repository().await;
    let tag = unique_tag("update");

    let mut movie = draft("Paris, Texas", &tag);
    repo.insert(&mut movie).await.unwrap();

    movie.runtime = Runtime(145);
    repo.update(&mut movie).await.unwrap();
    assert_eq!(movie.version, 2);

    let fetched = repo.get(movie.id).await.unwrap();
    assert_eq!(fetched.runtime, Runtime(145));
    assert_eq!(fetched.version, 2);

    repo.delete(movie.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn a_stale_version_fails_edit_conflict() {
    let repo = repository().await;
    let tag = unique_tag("stale");

    let mut movie = draft("Stalker", &tag);
    repo.insert(&mut movie).await.unwrap();

    let mut stale = movie.clone();
    movie.year = 1979;
    repo.update(&mut movie).await.unwrap();

    stale.year = 1980;
    assert!(matches!(
        repo.update(&mut stale).await,
        Err(DbError::EditConflict)
    ));

    repo.delete(movie.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn racing_updates_from_the_same_version_admit_one_winner() {
    let repo = repository().await;
    let tag = unique_tag("race");

    let mut movie = draft("Rashomon", &tag);
    repo.insert(&mut movie).await.unwrap();

    let mut first = movie.clone();
    first.runtime = Runtime(88);
    let mut second = movie.clone();
    second.runtime = Runtime(89);

    let (a, b) = tokio::join!(repo.update(&mut first), repo.update(&mut second));

    assert!(
        a.is_ok() != b.is_ok(),
        "expected exactly one winner, got {a:?} and {b:?}"
    );
    let a_won = a.is_ok();
    let loser = if a_won { b } else { a };
    assert!(matches!(loser, Err(DbError::EditConflict)));

    // A subsequent read shows only the winner's field values.
    let fetched = repo.get(movie.id).await.unwrap();
    assert_eq!(fetched.version, movie.version + 1);
    let winner = if a_won { &first } else { &second };
    assert_eq!(fetched.runtime, winner.runtime);

    repo.delete(movie.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn delete_is_permanent_and_not_repeatable() {
    let repo = repository().await;
    let tag = unique_tag("delete");

    let mut movie = draft("Heat", &tag);
    repo.insert(&mut movie).await.unwrap();

    repo.delete(movie.id).await.unwrap();
    assert!(matches!(repo.get(movie.id).await, Err(DbError::NotFound)));
    assert!(matches!(repo.delete(movie.id).await, Err(DbError::NotFound)));
    assert!(matches!(repo.delete(0).await, Err(DbError::NotFound)));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn list_matches_filters_and_orders_deterministically() {
    let repo = repository().await;
    let tag = unique_tag("list");

    let mut titles = Vec::new();
    for (title, year) in [("Alien", 1979), ("Aliens", 1986), ("Alien 3", 1992)] {
        let mut movie = draft(title, &tag);
        movie.year = year;
        repo.insert(&mut movie).await.unwrap();
        titles.push(movie);
    }

    // The unique tag scopes the listing to this test's rows; default
    // pagination orders by id ascending.
    let listed = repo
        .list("", &[tag.clone()], &Filters::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.windows(2).all(|w| w[0].id < w[1].id));

    // Descending year, with the id tie-break keeping the order stable.
    let by_year = repo
        .list(
            "",
            &[tag.clone()],
            &Filters {
                sort: "-year".to_string(),
                ..Filters::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_year[0].year, 1992);
    assert_eq!(by_year[2].year, 1979);

    // Full-text title matching is normalized, not a literal substring:
    // the token "aliens" matches only the one title containing it.
    let searched = repo
        .list("aliens", &[tag.clone()], &Filters::default())
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert!(searched[0].title.starts_with("Aliens"));

    assert_eq!(repo.count("", &[tag.clone()]).await.unwrap(), 3);

    // No match yields an empty vector, never an error.
    let none = repo
        .list("nonexistent-title", &[tag.clone()], &Filters::default())
        .await
        .unwrap();
    assert!(none.is_empty());

    for movie in titles {
        repo.delete(movie.id).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (DATABASE_URL)"]
async fn an_unrecognized_sort_field_is_rejected_before_any_query() {
    let repo = repository().await;

    let filters = Filters {
        sort: "created_at".to_string(),
        ..Filters::default()
    };
    match repo.list("", &[], &filters).await {
        Err(DbError::Validation(errors)) => {
            assert_eq!(errors.get("sort"), Some("invalid sort value"));
        }
        other => panic!("expected a validation failure, got {other:?}"),
    }
}
