pub mod destacados;
pub mod marcas;
pub mod modelos;
pub mod tienda;
