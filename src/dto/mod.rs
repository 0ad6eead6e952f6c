pub mod pagina_dto;
