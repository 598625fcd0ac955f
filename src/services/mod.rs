pub mod dealers;
pub mod deals;
pub mod documents;
pub mod sales;
pub mod sync;
pub mod tokens;
