//! Font lookup and text measurement.
//!
//! Resolves font families through a system `fontdb` database (plus any extra
//! directories configured in settings) and caches `rusttype` faces for the
//! lifetime of the process. When no face resolves (headless CI being the
//! usual case) measurement falls back to a deterministic metric so layout
//! and clamping stay functional.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{Font, Scale};
use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::{Mutex, OnceLock},
};
use tracing::{debug, warn};

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
}

static EXTRA_DIRS: OnceLock<Vec<PathBuf>> = OnceLock::new();

/// Registers extra font directories before the database is first used.
/// A call after first use is ignored.
pub fn set_extra_font_dirs(dirs: Vec<PathBuf>) {
    if EXTRA_DIRS.set(dirs).is_err() {
        warn!("font database already initialized; extra font dirs ignored");
    }
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        if let Some(dirs) = EXTRA_DIRS.get() {
            for dir in dirs {
                db.load_fonts_dir(dir);
            }
        }
        db
    })
}

/// Sorted list of available font family names.
pub fn list_font_families() -> Vec<String> {
    let mut set = std::collections::HashSet::new();
    for face in db().faces() {
        for (name, _) in &face.families {
            set.insert(name.clone());
        }
    }
    let mut out: Vec<_> = set.into_iter().collect();
    out.sort();
    out
}

/// Resolves a family to a cached face. Returns `None` when the family (and
/// the generic sans-serif fallback) cannot be found.
pub fn get_font_for(family: &str) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, &'static Font<'static>>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey {
        family: family.to_string(),
    };

    if let Some(font) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(&key) {
        return Some(font);
    }

    let loaded = load_font_from_system(family)?;
    let font_ref: &'static Font<'static> = Box::leak(Box::new(loaded));
    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(key, font_ref);
    Some(font_ref)
}

fn load_font_from_system(family: &str) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other), Family::SansSerif],
    };

    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
    }
}

// Metric fallback ratios for environments with no usable fonts. Chosen to
// approximate a typical sans-serif at the same size.
const FALLBACK_ADVANCE: f64 = 0.6;
const FALLBACK_LINE_HEIGHT: f64 = 1.2;

/// Measures a text block at the given size, in design units.
///
/// Multi-line text measures as the widest line by the summed line height.
/// The result is deterministic for a fixed font database state.
pub fn measure_text(text: &str, font_size: f64, family: &str) -> (f64, f64) {
    let lines: Vec<&str> = text.split('\n').collect();
    match get_font_for(family) {
        Some(font) => {
            let scale = Scale::uniform(font_size as f32);
            let v = font.v_metrics(scale);
            let line_height = (v.ascent - v.descent + v.line_gap) as f64;
            let width = lines
                .iter()
                .map(|line| line_advance(font, scale, line))
                .fold(0.0_f64, f64::max);
            (width, line_height * lines.len() as f64)
        }
        None => {
            debug!(family = %family, "no usable font face; using metric fallback");
            let chars = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            (
                chars as f64 * font_size * FALLBACK_ADVANCE,
                lines.len() as f64 * font_size * FALLBACK_LINE_HEIGHT,
            )
        }
    }
}

fn line_advance(font: &Font<'_>, scale: Scale, line: &str) -> f64 {
    font.glyphs_for(line.chars())
        .map(|g| g.scaled(scale).h_metrics().advance_width as f64)
        .sum()
}
