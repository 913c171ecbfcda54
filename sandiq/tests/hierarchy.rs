//! End-to-end behaviour of container hierarchies through the public API.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use once_cell::sync::Lazy;
use sandiq::prelude::*;

static DB: Lazy<Id> = Lazy::new(|| Id::token("db"));
static REPO: Lazy<Id> = Lazy::new(|| Id::token("repo"));

#[derive(Debug, Clone, PartialEq)]
struct Database {
    name: String,
}

struct UserRepository {
    db: Database,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("sandiq_container=trace")
        .with_test_writer()
        .try_init();
}

fn app_container() -> Container {
    let root = Container::new();
    root.bind(*DB, |_| {
        Ok(Database {
            name: "real-db".into(),
        })
    })
    .bind(*REPO, |inject: &Inject<'_>| {
        Ok(UserRepository {
            db: inject.get(*DB)?,
        })
    });
    root
}

#[test]
fn child_override_is_scoped_to_child() {
    init_tracing();
    let root = app_container();

    let child = root.create_child();
    child.bind(*DB, |_| {
        Ok(Database {
            name: "mock-db".into(),
        })
    });

    assert_eq!(child.get::<Database>(*DB).unwrap().name, "mock-db");
    assert_eq!(root.get::<Database>(*DB).unwrap().name, "real-db");
}

#[test]
fn inherited_factory_sees_child_override() {
    let root = app_container();
    let request = root.create_child();
    request.bind(*DB, |_| {
        Ok(Database {
            name: "tx-db".into(),
        })
    });

    let repo: UserRepository = request.get(*REPO).unwrap();
    assert_eq!(repo.db.name, "tx-db");

    let repo: UserRepository = root.get(*REPO).unwrap();
    assert_eq!(repo.db.name, "real-db");
}

#[test]
fn string_and_token_ids_share_a_table() {
    let container = Container::new();
    container
        .bind("db", |_| Ok("by name"))
        .bind(*DB, |_| Ok("by token"));

    assert_eq!(container.get::<&str>("db").unwrap(), "by name");
    assert_eq!(container.get::<&str>(*DB).unwrap(), "by token");
    assert_eq!(container.local_ids().len(), 2);
}

#[test]
fn composed_parents_resolve_in_order() {
    let defaults = Container::new();
    defaults
        .bind_value("timeout", 30u32)
        .bind_value("retries", 3u32);

    let overrides = Container::new();
    overrides.bind_value("timeout", 5u32);

    let service = Container::new();
    service.extend([&overrides, &defaults]);

    assert_eq!(service.get::<u32>("timeout").unwrap(), 5);
    assert_eq!(service.get::<u32>("retries").unwrap(), 3);

    let reversed = Container::new();
    reversed.extend([&defaults, &overrides]);
    assert_eq!(reversed.get::<u32>("timeout").unwrap(), 30);
}

#[test]
fn missing_dependency_is_a_distinct_error() {
    let container = Container::new();
    container.bind("report", |inject: &Inject<'_>| {
        let db: Database = inject.get("database")?;
        Ok(db.name)
    });

    let err = container.get::<String>("report").unwrap_err();
    let missing = err.binding_not_found().expect("binding not found");
    assert_eq!(missing.id, Id::name("database"));
    assert!(err.to_string().contains("database"));
}

#[test]
fn shared_instance_is_a_factory_choice() {
    let built = Arc::new(AtomicU32::new(0));
    let shared = Arc::new(Database {
        name: "pool".into(),
    });

    let container = Container::new();
    container
        .bind("pool", {
            let shared = shared.clone();
            move |_| Ok(shared.clone())
        })
        .bind("conn", {
            let built = built.clone();
            move |_| Ok(built.fetch_add(1, Ordering::SeqCst))
        });

    let a: Arc<Database> = container.get("pool").unwrap();
    let b: Arc<Database> = container.get("pool").unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let first: u32 = container.get("conn").unwrap();
    let second: u32 = container.get("conn").unwrap();
    assert_ne!(first, second);
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

type Pending<T> = Pin<Box<dyn Future<Output = T> + Send>>;

#[tokio::test]
async fn deferred_values_are_returned_unawaited() {
    let started = Arc::new(AtomicU32::new(0));

    let container = Container::new();
    container.bind("conn", {
        let started = started.clone();
        move |_| {
            let started = started.clone();
            let pending: Pending<String> = Box::pin(async move {
                started.fetch_add(1, Ordering::SeqCst);
                String::from("connected")
            });
            Ok(pending)
        }
    });

    let pending: Pending<String> = container.get("conn").unwrap();
    assert_eq!(started.load(Ordering::SeqCst), 0);

    assert_eq!(pending.await, "connected");
    assert_eq!(started.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn children_per_task_share_one_parent() {
    let root = app_container();

    let tasks: Vec<_> = (0..4)
        .map(|n| {
            let scope = root.create_child();
            tokio::spawn(async move {
                scope.bind_value("request.id", n);
                let repo: UserRepository = scope.get(*REPO)?;
                let id: i32 = scope.get("request.id")?;
                Ok::<_, SandiqError>((id, repo.db.name))
            })
        })
        .collect();

    for (n, task) in tasks.into_iter().enumerate() {
        let (id, db) = task.await.unwrap().unwrap();
        assert_eq!(id, n as i32);
        assert_eq!(db, "real-db");
    }
    assert!(!root.is_bound("request.id"));
}
