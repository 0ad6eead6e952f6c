mod common;

use std::time::Duration;

use common::{loader_over, portal_source};
use portal_contenidos::models::{Categoria, EntityKind};
use portal_contenidos::services::{NavigationOutcome, PageNavigator, PageStatus};
use portal_contenidos::utils::errors::ContentError;

#[tokio::test]
async fn test_navigator_starts_idle() {
    let navigator = PageNavigator::new(loader_over(portal_source()));
    let state = navigator.state();

    assert_eq!(state.status, PageStatus::Idle);
    assert_eq!(state.generation, 0);
    assert!(state.page.is_none());
}

#[tokio::test]
async fn test_navigate_publishes_ready_page() {
    let navigator = PageNavigator::new(loader_over(portal_source()));
    let mut rx = navigator.subscribe();

    let outcome = navigator.navigate(Some("blog")).await;

    let NavigationOutcome::Applied(result) = outcome else {
        panic!("navigation should apply");
    };
    assert_eq!(result.status, PageStatus::Ready);
    assert_eq!(result.data.unwrap().apartado.id, 3);

    assert!(rx.has_changed().unwrap());
    let visible = rx.borrow_and_update().clone();
    assert_eq!(visible.status, PageStatus::Ready);
    assert_eq!(visible.generation, 1);
    assert_eq!(visible.slug.as_deref(), Some("blog"));
}

#[tokio::test]
async fn test_stale_navigation_does_not_overwrite_newer_one() {
    let source = portal_source();
    source.delay(EntityKind::Categoria, Some(3), Duration::from_millis(80));
    let loader = loader_over(source.clone());
    let navigator = PageNavigator::new(loader.clone());

    let (slow, fast) = tokio::join!(
        navigator.navigate(Some("blog")),
        navigator.navigate(Some("nosotros"))
    );

    assert!(matches!(slow, NavigationOutcome::Superseded));
    let NavigationOutcome::Applied(fast) = fast else {
        panic!("latest navigation should apply");
    };
    assert_eq!(fast.data.unwrap().apartado.id, 2);

    let visible = navigator.state();
    assert_eq!(visible.status, PageStatus::Ready);
    assert_eq!(visible.generation, 2);
    assert_eq!(visible.page.unwrap().apartado.id, 2);

    // La navegación superada igual dejó sus datos en el cache
    let categorias = loader.cache().cached_children::<Categoria>(3).await.unwrap();
    assert_eq!(categorias.len(), 2);
    assert_eq!(source.calls(EntityKind::Apartado, None), 1);
}

#[tokio::test]
async fn test_resolve_returns_latest_visible_state_when_superseded() {
    let source = portal_source();
    source.delay(EntityKind::Categoria, Some(3), Duration::from_millis(80));
    let navigator = PageNavigator::new(loader_over(source));

    let (slow, fast) = tokio::join!(
        navigator.resolve(Some("blog")),
        navigator.resolve(Some("nosotros"))
    );

    assert_eq!(slow.status, PageStatus::Ready);
    assert_eq!(slow.data.unwrap().apartado.id, 2);
    assert_eq!(fast.data.unwrap().apartado.id, 2);
}

#[tokio::test]
async fn test_unknown_slug_ends_not_found() {
    let navigator = PageNavigator::new(loader_over(portal_source()));

    let result = navigator.resolve(Some("inexistente")).await;

    assert_eq!(result.status, PageStatus::NotFound);
    assert!(result.data.is_none());
    assert_eq!(result.error, Some(ContentError::NotFound("inexistente".to_string())));
}

#[tokio::test]
async fn test_transport_failure_ends_in_error() {
    let source = portal_source();
    source.fail(EntityKind::Apartado, None);
    let navigator = PageNavigator::new(loader_over(source.clone()));

    let result = navigator.resolve(Some("blog")).await;
    assert_eq!(result.status, PageStatus::Error);
    assert!(matches!(result.error, Some(ContentError::Transport { .. })));

    // Reintentar tras recuperarse vuelve a pedir los apartados
    source.recover(EntityKind::Apartado, None);
    let retry = navigator.resolve(Some("blog")).await;
    assert_eq!(retry.status, PageStatus::Ready);
    assert_eq!(source.calls(EntityKind::Apartado, None), 2);
}

#[tokio::test]
async fn test_sequential_navigation_reuses_cache() {
    let source = portal_source();
    let navigator = PageNavigator::new(loader_over(source.clone()));

    navigator.resolve(Some("blog")).await;
    navigator.resolve(Some("inicio")).await;
    let again = navigator.resolve(Some("blog")).await;

    assert_eq!(again.status, PageStatus::Ready);
    assert_eq!(navigator.current_generation(), 3);
    assert_eq!(source.calls(EntityKind::Apartado, None), 1);
    assert_eq!(source.calls(EntityKind::Categoria, Some(3)), 1);
    assert_eq!(source.calls(EntityKind::Seccion, Some(30)), 1);
}
