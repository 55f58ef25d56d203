//! sheetgrader-report — HTML rendering of scored sheets.

pub mod html;
