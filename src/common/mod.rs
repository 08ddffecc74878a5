pub mod debounce;
pub mod text;
