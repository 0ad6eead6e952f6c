pub mod cache_routes;
pub mod pagina_routes;
