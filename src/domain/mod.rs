pub mod month;
pub mod track;
