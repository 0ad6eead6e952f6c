//! Identificadores de plantilla conocidos
//!
//! Los `plantilla_id` son opacos para el backend; estos son los que el
//! portal sabe renderizar. Cualquier otro cae en la variante por defecto.

use uuid::Uuid;

pub const INICIO: Uuid = Uuid::from_u128(0x6f1c2a4e_0b7d_4d3e_9a51_1c2e7a0f0001);
pub const NOSOTROS: Uuid = Uuid::from_u128(0x6f1c2a4e_0b7d_4d3e_9a51_1c2e7a0f0002);
pub const PREGUNTAS_FRECUENTES: Uuid = Uuid::from_u128(0x6f1c2a4e_0b7d_4d3e_9a51_1c2e7a0f0003);
pub const TERMINOS: Uuid = Uuid::from_u128(0x6f1c2a4e_0b7d_4d3e_9a51_1c2e7a0f0004);
pub const POLITICAS: Uuid = Uuid::from_u128(0x6f1c2a4e_0b7d_4d3e_9a51_1c2e7a0f0005);
pub const BLOG: Uuid = Uuid::from_u128(0x6f1c2a4e_0b7d_4d3e_9a51_1c2e7a0f0010);
pub const PRECIOS: Uuid = Uuid::from_u128(0x6f1c2a4e_0b7d_4d3e_9a51_1c2e7a0f0011);
pub const CONTACTO: Uuid = Uuid::from_u128(0x6f1c2a4e_0b7d_4d3e_9a51_1c2e7a0f0012);

/// Compara un `plantilla_id` recibido con un UUID conocido.
/// Tolera mayúsculas y espacios; un id que no es UUID nunca coincide.
pub fn is_plantilla(plantilla_id: &str, expected: Uuid) -> bool {
    Uuid::parse_str(plantilla_id.trim())
        .map(|parsed| parsed == expected)
        .unwrap_or(false)
}
