//! Integration test: coordinator units against an in-memory store.

use quire_core::coordinator::Coordinator;
use quire_core::db::connect_in_memory;
use quire_core::models::{
    CategoryUpdate, IdentityUpdate, NewCategory, NewIdentity, NewPost, PostUpdate, Role,
};
use quire_core::store::{categories, comments, identities, posts};
use quire_core::{CoreError, UniqueField};
use uuid::Uuid;

async fn coordinator() -> Coordinator {
    let pool = connect_in_memory().await.expect("in-memory store");
    Coordinator::new(pool)
}

async fn user(c: &Coordinator, name: &str) -> Uuid {
    c.create_identity(&NewIdentity::new(
        name,
        &format!("{name}@example.com"),
        "hash".into(),
    ))
    .await
    .expect("create identity")
    .id
}

async fn category(c: &Coordinator, name: &str) -> Uuid {
    c.create_category(&NewCategory {
        name: name.into(),
        description: None,
    })
    .await
    .expect("create category")
    .id
}

fn post(title: &str, categories: &[&str]) -> NewPost {
    NewPost {
        title: title.into(),
        content: "Body".into(),
        category_names: Some(categories.iter().map(|s| s.to_string()).collect()),
    }
}

async fn count(c: &Coordinator, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(c.pool())
        .await
        .expect("count rows")
}

#[tokio::test]
async fn duplicate_username_is_a_conflict_regardless_of_case() {
    let c = coordinator().await;
    user(&c, "alice").await;

    let err = c
        .create_identity(&NewIdentity::new("ALICE", "other@example.com", "hash".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(UniqueField::Username)));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let c = coordinator().await;
    user(&c, "alice").await;

    let err = c
        .create_identity(&NewIdentity::new("alice2", "Alice@Example.com", "hash".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(UniqueField::Email)));
}

#[tokio::test]
async fn profile_update_into_taken_username_conflicts() {
    let c = coordinator().await;
    user(&c, "alice").await;
    let bob = user(&c, "bob").await;

    let err = c
        .update_identity(
            bob,
            IdentityUpdate {
                username: Some("Alice".into()),
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(UniqueField::Username)));

    let unchanged = identities::get_identity(c.pool(), bob)
        .await
        .unwrap()
        .expect("bob still exists");
    assert_eq!(unchanged.username, "bob");
}

#[tokio::test]
async fn duplicate_category_name_is_a_conflict() {
    let c = coordinator().await;
    category(&c, "rust").await;
    let err = c
        .create_category(&NewCategory {
            name: "rust".into(),
            description: Some("again".into()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(UniqueField::CategoryName)));
}

#[tokio::test]
async fn post_with_unknown_category_is_not_created() {
    let c = coordinator().await;
    let alice = user(&c, "alice").await;
    category(&c, "go").await;

    let err = c
        .create_post(alice, &post("Hello", &["go", "rust"]))
        .await
        .unwrap_err();
    match err {
        CoreError::CategoryNotFound(missing) => assert_eq!(missing, vec!["rust"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(count(&c, "posts").await, 0);
    assert_eq!(count(&c, "post_categories").await, 0);
}

#[tokio::test]
async fn storage_failure_mid_unit_rolls_back_post() {
    let c = coordinator().await;
    let alice = user(&c, "alice").await;
    category(&c, "go").await;
    sqlx::query(
        "CREATE TRIGGER fail_link BEFORE INSERT ON post_categories \
         BEGIN SELECT RAISE(ABORT, 'link insert failed'); END",
    )
    .execute(c.pool())
    .await
    .expect("install trigger");

    let err = c
        .create_post(alice, &post("Hello", &["go"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::StorageError(_)), "got {err:?}");
    assert_eq!(count(&c, "posts").await, 0);
    assert_eq!(count(&c, "post_categories").await, 0);
}

#[tokio::test]
async fn failed_category_replacement_leaves_post_untouched() {
    let c = coordinator().await;
    let alice = user(&c, "alice").await;
    category(&c, "go").await;
    category(&c, "rust").await;
    let created = c
        .create_post(alice, &post("Hello", &["go", "rust"]))
        .await
        .expect("create post");

    let err = c
        .update_post(
            created.post.id,
            &PostUpdate {
                title: Some("Changed".into()),
                content: None,
                category_names: Some(vec!["go".into(), "missing".into()]),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::CategoryNotFound(_)));

    let mut conn = c.pool().acquire().await.unwrap();
    let stored = posts::get_post_with_categories(&mut conn, created.post.id)
        .await
        .unwrap()
        .expect("post still exists");
    assert_eq!(stored.post.title, "Hello");
    let names: Vec<_> = stored.categories.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["go", "rust"]);
}

#[tokio::test]
async fn update_post_category_semantics() {
    let c = coordinator().await;
    let alice = user(&c, "alice").await;
    category(&c, "go").await;
    let created = c
        .create_post(alice, &post("Hello", &["go"]))
        .await
        .expect("create post");

    // Absent list keeps the current set.
    let kept = c
        .update_post(
            created.post.id,
            &PostUpdate {
                title: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .expect("rename");
    assert_eq!(kept.post.title, "Renamed");
    assert_eq!(kept.categories.len(), 1);

    // Empty list clears it.
    let cleared = c
        .update_post(
            created.post.id,
            &PostUpdate {
                category_names: Some(Vec::new()),
                ..Default::default()
            },
        )
        .await
        .expect("clear categories");
    assert!(cleared.categories.is_empty());
}

#[tokio::test]
async fn deleting_identity_cascades_through_posts_and_comments() {
    let c = coordinator().await;
    let alice = user(&c, "alice").await;
    let bob = user(&c, "bob").await;
    category(&c, "go").await;

    const POSTS: usize = 3;
    const COMMENTS: usize = 4;
    for i in 0..POSTS {
        let created = c
            .create_post(alice, &post(&format!("Post {i}"), &["go"]))
            .await
            .expect("create post");
        for j in 0..COMMENTS {
            // Mix of alice's own comments and other users' comments.
            let author = if j % 2 == 0 { alice } else { bob };
            c.create_comment(created.post.id, author, "Nice post")
                .await
                .expect("create comment");
        }
    }
    let bobs_post = c
        .create_post(bob, &post("Bob's", &[]))
        .await
        .expect("bob post");
    c.create_comment(bobs_post.post.id, alice, "alice was here")
        .await
        .expect("alice comment");
    c.create_comment(bobs_post.post.id, bob, "bob replies")
        .await
        .expect("bob comment");

    c.delete_identity(alice).await.expect("delete alice");

    assert!(identities::get_identity(c.pool(), alice).await.unwrap().is_none());
    assert!(posts::list_posts_by_author(c.pool(), alice).await.unwrap().is_empty());
    let remaining = comments::list_comments(c.pool()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].author_id, bob);
    assert_eq!(remaining[0].post_id, bobs_post.post.id);
    assert_eq!(count(&c, "post_categories").await, 0);
    assert_eq!(count(&c, "categories").await, 1);
}

#[tokio::test]
async fn deleting_category_keeps_posts() {
    let c = coordinator().await;
    let alice = user(&c, "alice").await;
    let go = category(&c, "go").await;
    let created = c
        .create_post(alice, &post("Hello", &["go"]))
        .await
        .expect("create post");

    c.delete_category(go).await.expect("delete category");

    assert!(posts::get_post(c.pool(), created.post.id).await.unwrap().is_some());
    assert!(posts::categories_for_post(c.pool(), created.post.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn missing_targets_are_not_found() {
    let c = coordinator().await;
    let ghost = Uuid::now_v7();

    assert!(matches!(c.delete_identity(ghost).await, Err(CoreError::NotFound(_))));
    assert!(matches!(c.delete_post(ghost).await, Err(CoreError::NotFound(_))));
    assert!(matches!(c.delete_category(ghost).await, Err(CoreError::NotFound(_))));
    assert!(matches!(c.delete_comment(ghost).await, Err(CoreError::NotFound(_))));
    assert!(matches!(
        c.set_role(ghost, Role::Admin).await,
        Err(CoreError::NotFound(_))
    ));
    assert!(matches!(
        c.create_comment(ghost, ghost, "hello").await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn post_for_vanished_author_maps_foreign_key_to_not_found() {
    let c = coordinator().await;
    let err = c
        .create_post(Uuid::now_v7(), &post("Orphan", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn comment_on_deleted_post_is_not_found() {
    let c = coordinator().await;
    let alice = user(&c, "alice").await;
    let created = c
        .create_post(alice, &post("Short-lived", &[]))
        .await
        .expect("create post");
    c.delete_post(created.post.id).await.expect("delete post");

    let err = c
        .create_comment(created.post.id, alice, "too late")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
    assert_eq!(count(&c, "comments").await, 0);
}

#[tokio::test]
async fn login_lookup_prefers_username_then_email() {
    let c = coordinator().await;
    let alice = user(&c, "alice").await;

    let by_email = identities::find_by_login(c.pool(), "Alice@Example.com")
        .await
        .unwrap()
        .expect("email login");
    assert_eq!(by_email.identity.id, alice);

    // Rows written below the validation layer may still collide; the
    // username match must win deterministically.
    let shadow = c
        .create_identity(&NewIdentity::new(
            "alice@example.com",
            "shadow@example.com",
            "hash".into(),
        ))
        .await
        .expect("shadow identity")
        .id;
    let resolved = identities::find_by_login(c.pool(), "alice@example.com")
        .await
        .unwrap()
        .expect("login");
    assert_eq!(resolved.identity.id, shadow);
    let by_name = identities::find_by_login(c.pool(), "alice")
        .await
        .unwrap()
        .expect("username login");
    assert_eq!(by_name.identity.id, alice);
}

#[tokio::test]
async fn category_description_can_be_cleared() {
    let c = coordinator().await;
    let id = c
        .create_category(&NewCategory {
            name: "go".into(),
            description: Some("gophers".into()),
        })
        .await
        .expect("create")
        .id;

    let renamed = c
        .update_category(
            id,
            &CategoryUpdate {
                name: Some("golang".into()),
                description: None,
            },
        )
        .await
        .expect("rename");
    assert_eq!(renamed.name, "golang");
    assert_eq!(renamed.description.as_deref(), Some("gophers"));

    let cleared = c
        .update_category(
            id,
            &CategoryUpdate {
                name: None,
                description: Some(None),
            },
        )
        .await
        .expect("clear");
    assert_eq!(cleared.description, None);
    assert_eq!(categories::list_categories(c.pool()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn role_and_password_updates_persist() {
    let c = coordinator().await;
    let alice = user(&c, "alice").await;

    let promoted = c.set_role(alice, Role::Admin).await.expect("promote");
    assert_eq!(promoted.role, Role::Admin);

    c.set_password_hash(alice, "new-hash").await.expect("password");
    let stored = identities::find_by_login(c.pool(), "ALICE@example.com")
        .await
        .unwrap()
        .expect("login lookup");
    assert_eq!(stored.password_hash, "new-hash");
    assert_eq!(stored.identity.role, Role::Admin);
}
