//! Session gate behavior: restore, login replay, queueing, cancellation,
//! failure handling and teardown.

mod common;

use common::*;
use gpui_console_navigator::permission::Requirement;
use gpui_console_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Yield until `ready` holds, e.g. until a held fetch has started.
async fn until(ready: impl Fn() -> bool) {
    while !ready() {
        tokio::task::yield_now().await;
    }
}

// ---- sign-in flow ----

#[tokio::test]
async fn test_anonymous_is_sent_to_login_with_destination() {
    let gate = gate();

    let result = gate.start("/orders?page=2").await;

    assert_eq!(gate.phase(), GatePhase::Anonymous);
    assert_eq!(
        result.path(),
        Some("/login?redirect=%2Forders%3Fpage%3D2")
    );
    assert_eq!(gate.current_path(), "/login");
    assert_eq!(gate.api().calls.identity.get(), 0);
}

#[tokio::test]
async fn test_public_pages_stay_reachable_signed_out() {
    let gate = gate();

    let result = gate.navigate("/login").await;
    assert!(result.is_success());
    assert_eq!(gate.page_title(), "Sign in - Marketplace Console");

    let result = gate.navigate("/register").await;
    assert!(result.is_success());
}

#[tokio::test]
async fn test_login_replays_destination_once() {
    let store = MemoryTokenStore::new();
    let gate = counting_gate(store.clone());

    gate.start("/orders").await;
    let result = gate.login(&credentials("root")).await.unwrap();

    assert_eq!(result, NavigationResult::Success { path: "/orders".into() });
    assert_eq!(gate.phase(), GatePhase::Ready);
    assert_eq!(gate.current_path(), "/orders");
    assert_eq!(gate.api().calls.identity.get(), 1);
    assert_eq!(gate.api().calls.menu.get(), 1);
    assert_eq!(gate.registry().materializations, 1);
    assert_eq!(store.get("token").as_deref(), Some(ROOT_TOKEN));

    // Ready: further intents never refetch.
    assert!(gate.navigate("/orders/42").await.is_success());
    assert_eq!(gate.api().calls.menu.get(), 1);
    assert_eq!(gate.registry().materializations, 1);
    assert_eq!(
        gate.current_stack().unwrap().params().get("id").map(String::as_str),
        Some("42")
    );
}

#[tokio::test]
async fn test_login_without_destination_lands_home() {
    let gate = gate();

    let result = gate.login(&credentials("root")).await.unwrap();

    assert_eq!(
        result,
        NavigationResult::Redirected {
            requested: "/".into(),
            path: "/dashboard".into(),
            reason: None,
        }
    );
    assert_eq!(gate.page_title(), "Home - Marketplace Console");
}

#[tokio::test]
async fn test_rejected_credentials_leave_gate_untouched() {
    let gate = gate();
    gate.start("/orders").await;

    let err = gate
        .login(&Credentials::new("root", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, NavError::AuthRejected { .. }));
    assert_eq!(gate.phase(), GatePhase::Anonymous);
    assert_eq!(gate.current_path(), "/login");
    assert!(gate.mounted_routes().is_empty());
}

#[tokio::test]
async fn test_restore_from_stored_token() {
    let gate = counting_gate(MemoryTokenStore::with_token("token", OPS_TOKEN));

    let result = gate.start("/orders").await;

    assert!(result.is_success());
    assert_eq!(gate.identity().map(|i| i.username), Some("ops".to_string()));
    assert_eq!(
        gate.mounted_routes(),
        vec!["Layout", "Dashboard", "OrderDetail", "Orders", "System"]
    );
}

#[tokio::test]
async fn test_auth_path_while_ready_goes_home() {
    let gate = counting_gate(MemoryTokenStore::with_token("token", ROOT_TOKEN));
    gate.start("/orders").await;

    let result = gate.navigate("/login").await;

    assert!(result.is_redirected());
    assert_eq!(gate.current_path(), "/dashboard");
}

// ---- concurrency ----

#[tokio::test]
async fn test_intents_during_resolution_are_queued_and_replayed() {
    let gate = counting_gate(MemoryTokenStore::with_token("token", ROOT_TOKEN));
    let hold = gate.api().hold_menu();

    let (first, queued) = tokio::join!(gate.start("/orders"), async {
        until(|| gate.api().calls.menu.get() == 1).await;
        let (queued, ()) = tokio::join!(gate.navigate("/orders/7"), async {
            hold.notify_one();
        });
        queued
    });

    assert_eq!(first, NavigationResult::Success { path: "/orders".into() });
    assert_eq!(queued, NavigationResult::Success { path: "/orders/7".into() });
    assert_eq!(gate.current_path(), "/orders/7");
    assert!(gate.back().is_success());
    assert_eq!(gate.current_path(), "/orders");
    assert_eq!(gate.api().calls.menu.get(), 1);
    assert_eq!(gate.registry().materializations, 1);
}

#[tokio::test]
async fn test_queued_intent_sees_its_own_guard_outcome() {
    let gate = counting_gate(MemoryTokenStore::with_token("token", OPS_TOKEN));
    let hold = gate.api().hold_menu();

    let (first, queued) = tokio::join!(gate.start("/orders"), async {
        until(|| gate.api().calls.menu.get() == 1).await;
        let (queued, ()) = tokio::join!(gate.navigate("/system"), async {
            hold.notify_one();
        });
        queued
    });

    assert!(first.is_success());
    assert_eq!(
        queued,
        NavigationResult::Redirected {
            requested: "/system".into(),
            path: "/403".into(),
            reason: Some("Requires one of roles [admin]".into()),
        }
    );
    assert_eq!(gate.current_path(), "/403");
}

#[tokio::test]
async fn test_logout_during_resolution_cancels_it() {
    let store = MemoryTokenStore::with_token("token", ROOT_TOKEN);
    let gate = counting_gate(store.clone());
    let hold = gate.api().hold_menu();

    let (first, queued) = tokio::join!(gate.start("/orders"), async {
        until(|| gate.api().calls.menu.get() == 1).await;
        let (queued, _) = tokio::join!(gate.navigate("/system"), async {
            let result = gate.logout().await;
            hold.notify_one();
            result
        });
        queued
    });

    assert_eq!(queued, NavigationResult::Cancelled { path: "/system".into() });
    assert!(first.is_cancelled());
    assert_eq!(gate.phase(), GatePhase::Anonymous);
    assert!(gate.mounted_routes().is_empty());
    assert_eq!(gate.registry().materializations, 0);
    assert_eq!(gate.current_path(), "/login");
    assert!(store.get("token").is_none());
}

#[tokio::test]
async fn test_login_during_resolution_fences_out_old_session() {
    let store = MemoryTokenStore::with_token("token", ROOT_TOKEN);
    let gate = counting_gate(store.clone());
    let hold = gate.api().hold_menu();

    let (first, relogin) = tokio::join!(gate.start("/orders"), async {
        until(|| gate.api().calls.menu.get() == 1).await;
        let result = gate.login(&credentials("ops")).await.unwrap();
        hold.notify_one();
        result
    });

    assert_eq!(first, NavigationResult::Cancelled { path: "/orders".into() });
    assert_eq!(relogin.path(), Some("/dashboard"));
    assert_eq!(gate.phase(), GatePhase::Ready);
    assert_eq!(gate.identity().map(|i| i.username), Some("ops".to_string()));
    assert_eq!(gate.registry().materializations, 1);
    assert_eq!(gate.api().calls.menu.get(), 2);
    assert_eq!(store.get("token").as_deref(), Some(OPS_TOKEN));
    // Still the ops session: the admin-only page stays out of reach.
    assert_eq!(gate.navigate("/system").await.path(), Some("/403"));
}

// ---- failures ----

#[tokio::test]
async fn test_unavailable_keeps_phase_and_retries() {
    let gate = counting_gate(MemoryTokenStore::with_token("token", ROOT_TOKEN));
    gate.api()
        .fail_menu_once(NavError::unavailable("menu service timed out"));

    let result = gate.start("/orders").await;

    assert!(result.error().is_some_and(NavError::is_retryable));
    assert_eq!(gate.phase(), GatePhase::ResolvingRoutes);
    assert!(gate.is_authenticated());

    let result = gate.navigate("/orders").await;
    assert!(result.is_success());
    assert_eq!(gate.api().calls.identity.get(), 1);
    assert_eq!(gate.api().calls.menu.get(), 2);
}

#[tokio::test]
async fn test_failed_resolution_reaches_queued_intents() {
    let gate = counting_gate(MemoryTokenStore::with_token("token", ROOT_TOKEN));
    gate.api()
        .fail_menu_once(NavError::unavailable("menu service timed out"));
    let hold = gate.api().hold_menu();

    let (first, queued) = tokio::join!(gate.start("/orders"), async {
        until(|| gate.api().calls.menu.get() == 1).await;
        let (queued, ()) = tokio::join!(gate.navigate("/orders/7"), async {
            hold.notify_one();
        });
        queued
    });

    assert!(first.error().is_some_and(NavError::is_retryable));
    assert!(queued.error().is_some_and(NavError::is_retryable));
    assert_eq!(gate.phase(), GatePhase::ResolvingRoutes);

    // Nothing left over: the retry replays only the new intent.
    assert!(gate.navigate("/dashboard").await.is_success());
    assert_eq!(gate.current_path(), "/dashboard");
    assert!(gate.back().is_success());
    assert_eq!(gate.current_path(), "/");
}

#[tokio::test]
async fn test_failed_refresh_does_not_replay_stale_intents() {
    let gate = counting_gate(MemoryTokenStore::with_token("token", ROOT_TOKEN));
    gate.start("/orders").await;
    gate.api()
        .fail_identity_once(NavError::unavailable("identity service timed out"));
    let hold = gate.api().hold_identity();

    let (refreshed, queued) = tokio::join!(gate.refresh_identity(), async {
        until(|| gate.api().calls.identity.get() == 2).await;
        let (queued, ()) = tokio::join!(gate.navigate("/system"), async {
            hold.notify_one();
        });
        queued
    });

    assert!(refreshed.unwrap_err().is_retryable());
    assert!(queued.error().is_some_and(NavError::is_retryable));
    assert_eq!(gate.current_path(), "/orders");
    assert_eq!(gate.phase(), GatePhase::Ready);

    assert!(gate.navigate("/dashboard").await.is_success());
    assert!(!gate.refresh_identity().await.unwrap());
    assert_eq!(gate.current_path(), "/dashboard");
}

#[tokio::test]
async fn test_rejected_token_expires_session() {
    let store = MemoryTokenStore::with_token("token", "stale");
    let gate = counting_gate(store.clone());

    let result = gate.start("/orders").await;

    assert_eq!(gate.phase(), GatePhase::Expired);
    assert_eq!(result.path(), Some("/login?redirect=%2Forders"));
    assert!(store.get("token").is_none());
    assert!(gate.identity().is_none());

    // Expired behaves like anonymous, and login replays the destination.
    let result = gate.login(&credentials("ops")).await.unwrap();
    assert_eq!(result.path(), Some("/orders"));
}

#[tokio::test]
async fn test_malformed_menu_falls_back_to_landing() {
    let gate = gate().with_store(MemoryTokenStore::with_token("token", ROOT_TOKEN));
    gate.api()
        .set_menu(r#"[{ "path": "/orders", "name": "Orders" }]"#);

    gate.start("/").await;

    assert_eq!(gate.phase(), GatePhase::Ready);
    assert_eq!(gate.current_path(), "/dashboard");
    assert_eq!(gate.mounted_routes(), vec!["Layout", "Dashboard"]);
    assert!(matches!(
        gate.diagnostics().as_slice(),
        [NavError::Structural(StructuralError::MissingRoot)]
    ));
    assert!(gate.navigate("/orders").await.is_not_found());
}

#[tokio::test]
async fn test_empty_menu_mounts_nothing() {
    let gate = gate().with_store(MemoryTokenStore::with_token("token", ROOT_TOKEN));
    gate.api().set_menu(r#"{ "menus": [] }"#);

    let result = gate.start("/orders").await;

    assert_eq!(gate.phase(), GatePhase::Ready);
    assert!(result.is_not_found());
    assert!(gate.mounted_routes().is_empty());
    assert!(gate.diagnostics().is_empty());
}

// ---- authorization ----

#[tokio::test]
async fn test_role_restricted_route_redirects_to_forbidden() {
    let gate = gate().with_store(MemoryTokenStore::with_token("token", OPS_TOKEN));
    gate.start("/orders").await;

    let result = gate.navigate("/system").await;

    assert_eq!(result.path(), Some("/403"));
    assert_eq!(gate.current_path(), "/403");
    let titles: Vec<String> = gate.sidebar().into_iter().map(|e| e.title).collect();
    assert_eq!(titles, vec!["Home", "Orders"]);
}

#[tokio::test]
async fn test_custom_guard_blocks() {
    let gate = gate()
        .with_store(MemoryTokenStore::with_token("token", OPS_TOKEN))
        .guard(guards::PermissionGuard::new(
            "/orders",
            Requirement::permission("order:write"),
        ));
    gate.start("/dashboard").await;

    let result = gate.navigate("/orders/9").await;

    assert!(result.is_blocked());
    assert_eq!(gate.current_path(), "/dashboard");
    assert!(gate.evaluate(&Requirement::permission("order:read")));
    assert!(!gate.evaluate(&Requirement::role("admin")));
}

#[tokio::test]
async fn test_identity_change_rebuilds_routes() {
    let gate = counting_gate(MemoryTokenStore::with_token("token", OPS_TOKEN));
    gate.start("/orders").await;
    assert!(gate.navigate("/system").await.is_redirected());

    gate.api()
        .set_identity(OPS_TOKEN, Identity::new(2, "ops", "admin"));
    assert!(gate.refresh_identity().await.unwrap());

    assert_eq!(gate.registry().materializations, 2);
    assert!(gate.navigate("/system").await.is_success());

    // Same identity again: nothing rebuilt.
    assert!(!gate.refresh_identity().await.unwrap());
    assert_eq!(gate.registry().materializations, 2);
}

// ---- teardown ----

#[tokio::test]
async fn test_logout_tears_down() {
    let store = MemoryTokenStore::with_token("token", ROOT_TOKEN);
    let channel = RecordingChannel::default();
    let gate = gate()
        .with_store(store.clone())
        .with_channel(channel.clone());
    gate.start("/orders").await;
    assert_eq!(*channel.log.borrow(), vec![format!("connect {ROOT_TOKEN}")]);

    let result = gate.logout().await;

    assert_eq!(result.path(), Some("/login?redirect=%2Forders"));
    assert_eq!(gate.phase(), GatePhase::Anonymous);
    assert!(gate.mounted_routes().is_empty());
    assert!(gate.sidebar().is_empty());
    assert!(store.get("token").is_none());
    assert_eq!(gate.api().calls.logout.get(), 1);
    assert_eq!(channel.log.borrow().last().map(String::as_str), Some("close"));
}

#[tokio::test]
async fn test_expire_keeps_destination() {
    let gate = gate().with_store(MemoryTokenStore::with_token("token", ROOT_TOKEN));
    gate.start("/orders/3").await;

    let result = gate.expire();

    assert_eq!(gate.phase(), GatePhase::Expired);
    assert_eq!(result.path(), Some("/login?redirect=%2Forders%2F3"));
    assert!(gate.navigate("/orders").await.is_redirected());
}

#[tokio::test]
async fn test_push_events_reach_handlers() {
    let channel = RecordingChannel::default();
    let gate = gate()
        .with_store(MemoryTokenStore::with_token("token", ROOT_TOKEN))
        .with_channel(channel.clone());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    gate.on_event("order.created", move |event| {
        sink.borrow_mut().push(event.content["id"].clone());
    });
    gate.start("/orders").await;

    channel.emit(&serde_json::from_str(r#"{"type": "order.created", "content": {"id": 5}}"#).unwrap());
    channel.emit(&serde_json::from_str(r#"{"type": "refund.created"}"#).unwrap());

    assert_eq!(*seen.borrow(), vec![serde_json::json!(5)]);
}
