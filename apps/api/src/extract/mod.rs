pub mod contact;
pub mod text;
