//! Services module
//!
//! Este módulo contiene la lógica de resolución de páginas: resolución de
//! slugs, carga jerárquica, navegación con estado visible y despacho de
//! plantillas.

pub mod hierarchy_loader;
pub mod page_navigator;
pub mod slug_resolver;
pub mod template_dispatcher;

pub use hierarchy_loader::{Degradation, FullyResolvedPage, HierarchyLoader, PageStatus};
pub use page_navigator::{NavigationOutcome, PageNavigator, PageState, ResolveResult};
pub use slug_resolver::{resolve_slug, MatchKind, ReservedAlias, Resolution};
pub use template_dispatcher::{render_plan, PageTemplate, RenderPlan, SectionLayout};
