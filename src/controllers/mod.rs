pub mod pagina_controller;
