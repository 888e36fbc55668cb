pub mod csv;
pub mod hit;
pub mod svg;

pub use csv::render_csv;
pub use hit::hit_test;
pub use svg::{ExportError, render_svg};
