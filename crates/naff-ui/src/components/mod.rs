pub mod nav;
pub mod notice;
