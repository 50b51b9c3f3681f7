pub mod angle;
pub mod mat3;
pub mod vec2;
pub mod vec3;
