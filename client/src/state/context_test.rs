use super::*;
use crate::net::types::User;

#[test]
fn signal_starts_from_store_snapshot() {
    let owner = Owner::new();
    owner.with(|| {
        let store = AuthStore::in_memory();
        store.set_auth(User::with_id("u1"), "tok".to_owned());

        let signal = provide_auth_store(store);
        assert!(signal.get_untracked().is_authenticated());
    });
}

#[test]
fn signal_follows_store_transitions() {
    let owner = Owner::new();
    owner.with(|| {
        let store = AuthStore::in_memory();
        let signal = provide_auth_store(store.clone());
        assert!(!signal.get_untracked().is_authenticated());

        store.set_auth(User::with_id("u1"), "tok".to_owned());
        assert_eq!(signal.get_untracked().token(), Some("tok"));

        store.logout();
        assert_eq!(signal.get_untracked(), AuthState::default());
    });
}

#[test]
fn context_exposes_store_and_signal() {
    let owner = Owner::new();
    owner.with(|| {
        let store = AuthStore::in_memory();
        provide_auth_store(store);

        let from_ctx = use_auth_store().unwrap();
        from_ctx.set_token(Some("t".to_owned()));
        assert_eq!(use_auth_session().unwrap().get_untracked().token(), Some("t"));
    });
}

#[test]
fn nothing_in_context_without_provider() {
    let owner = Owner::new();
    owner.with(|| {
        assert!(use_auth_store().is_none());
        assert!(use_auth_session().is_none());
    });
}

#[test]
fn store_outliving_owner_does_not_panic() {
    let store = AuthStore::in_memory();
    {
        let owner = Owner::new();
        owner.with(|| {
            provide_auth_store(store.clone());
        });
    }
    store.set_auth(User::with_id("u1"), "tok".to_owned());
    assert!(store.is_authenticated());
}
