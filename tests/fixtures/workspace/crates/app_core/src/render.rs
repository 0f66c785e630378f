use serde::Serialize;
use std::fmt;
use crate::theme::Palette;
use std::collections::BTreeMap;
use serde::Deserialize;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Renderer {
    palette: BTreeMap<String, Palette>,
}

impl Renderer {
    pub fn print(&self, source: &str) {
        println!("{} ({} columns)", source, source.width());
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Renderer({} palettes)", self.palette.len())
    }
}
