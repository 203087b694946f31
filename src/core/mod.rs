pub mod animation;
pub mod color;
pub mod control;
pub mod particles;
pub mod time;
