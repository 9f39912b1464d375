//! Session revalidation triggers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The cached session goes stale whenever another tab or an OAuth redirect
//! changes the cookie. Mount, window focus, and `storage` events each start
//! one independent session check; nothing is debounced.

use leptos::prelude::*;

use crate::state::auth::AuthSink;
use crate::state::sync::{RevalidationTrigger, SessionSync, SessionTransport};

/// Check once now, then again on every focus and `storage` event until the
/// owning component is cleaned up.
pub fn install_revalidation_triggers<T, S>(sync: SessionSync<T, S>)
where
    T: SessionTransport + Clone + Send + Sync + 'static,
    S: AuthSink + Clone + Send + Sync + 'static,
{
    spawn_check(sync.clone(), RevalidationTrigger::Mount);

    let on_focus = sync.clone();
    let focus = window_event_listener(leptos::ev::focus, move |_| {
        spawn_check(on_focus.clone(), RevalidationTrigger::Focus);
    });

    let storage = window_event_listener(leptos::ev::storage, move |_| {
        spawn_check(sync.clone(), RevalidationTrigger::Storage);
    });

    on_cleanup(move || {
        focus.remove();
        storage.remove();
    });
}

fn spawn_check<T, S>(sync: SessionSync<T, S>, trigger: RevalidationTrigger)
where
    T: SessionTransport + 'static,
    S: AuthSink + 'static,
{
    leptos::task::spawn_local(async move {
        sync.revalidate(trigger).await;
    });
}
