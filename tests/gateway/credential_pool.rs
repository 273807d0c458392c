use std::sync::Arc;

use cogload::gateway::{
    CredentialPool,
    credentials::{CredentialProvider, EnvCredentialProvider, resolve_all},
    types::CredentialRef,
};

fn pool(size: usize) -> CredentialPool {
    CredentialPool::new((0..size).map(|index| format!("key-{index}")).collect())
}

#[test]
fn given_fresh_pool_when_current_then_first_key_is_checked_out() {
    let pool = pool(2);
    let credential = pool.current().expect("pool should not be exhausted");
    assert_eq!(credential.index, 0);
    assert_eq!(credential.token(), "key-0");
}

#[test]
fn given_stale_credential_when_retired_twice_then_cursor_moves_once() {
    let pool = pool(3);
    let observed = pool.current().expect("key 0");

    assert!(pool.retire(&observed));
    assert!(!pool.retire(&observed));
    assert_eq!(pool.cursor(), 1);
}

#[test]
fn given_last_key_retired_when_current_then_pool_is_exhausted_for_good() {
    let pool = pool(1);
    let only = pool.current().expect("key 0");
    pool.retire(&only);

    assert!(pool.is_exhausted());
    assert!(pool.current().is_none());
    assert!(!pool.retire(&only));
    assert_eq!(pool.cursor(), 1);
}

#[tokio::test]
async fn given_concurrent_failures_on_one_key_when_retired_then_only_one_position_is_skipped() {
    let pool = Arc::new(pool(4));
    let observed = pool.current().expect("key 0");

    let handles = (0..8)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let observed = observed.clone();
            tokio::spawn(async move { pool.retire(&observed) })
        })
        .collect::<Vec<_>>();

    let mut winners = 0;
    for handle in handles {
        if handle.await.expect("task should join") {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(pool.cursor(), 1);
}

#[test]
fn given_inline_tokens_when_resolved_then_order_is_preserved() {
    let tokens = resolve_all(
        &EnvCredentialProvider,
        &[
            CredentialRef::InlineToken {
                token: " first ".to_string(),
            },
            CredentialRef::InlineToken {
                token: "second".to_string(),
            },
        ],
    )
    .expect("inline tokens should resolve");
    assert_eq!(tokens, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn given_unset_env_var_when_resolved_then_startup_error() {
    let provider = EnvCredentialProvider;
    let err = provider
        .resolve(&CredentialRef::Env {
            var: "COGLOAD_TEST_SURELY_UNSET_VAR".to_string(),
        })
        .expect_err("unset variable should fail");
    assert!(err.message.contains("COGLOAD_TEST_SURELY_UNSET_VAR"));
}
