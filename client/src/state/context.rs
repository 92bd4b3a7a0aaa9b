//! Reactive bridge between [`AuthStore`] and Leptos components.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component calls [`provide_auth_store`] once. Components then read
//! `RwSignal<AuthState>` from context and re-render on sign-in and sign-out,
//! while event handlers reach the store itself through [`use_auth_store`].
//!
//! The signal is a mirror. Writes go through the store; a store listener
//! copies each committed state into the signal.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use leptos::prelude::*;

use super::auth::{AuthState, AuthStore};

/// Provide `store` and its mirrored signal to the current reactive owner.
pub fn provide_auth_store(store: AuthStore) -> RwSignal<AuthState> {
    let signal = RwSignal::new(store.snapshot());
    store.subscribe(move |state| {
        // The owner may be gone while the store lives on.
        let _ = signal.try_set(state.clone());
    });
    provide_context(store);
    provide_context(signal);
    signal
}

pub fn use_auth_store() -> Option<AuthStore> {
    use_context::<AuthStore>()
}

pub fn use_auth_session() -> Option<RwSignal<AuthState>> {
    use_context::<RwSignal<AuthState>>()
}
