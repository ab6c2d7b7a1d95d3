// i18n.rs
//
// Lightweight runtime i18n:
// - Strings live in assets/i18n/<lang>.json next to the executable or in the
//   working directory; the tables shipped with the crate are embedded as a
//   fallback so the viewer always has text.
// - Load order: selected lang -> fallback en
// - Lookup: tr("key") / tr_with("key", [("name", "...")]) with {name} placeholders

use once_cell::sync::{Lazy, OnceCell};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

pub const FALLBACK_LANG: &str = "en";

/// Languages with a shipped table, as (code, native name).
pub const LANGUAGES: [(&str, &str); 2] = [("en", "English"), ("zh-Hans", "简体中文")];

#[derive(Debug, Clone)]
pub struct I18n {
    pub lang: String,
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

static BUILTIN_FALLBACK: Lazy<HashMap<String, String>> =
    Lazy::new(|| embedded(FALLBACK_LANG).unwrap_or_default());

fn embedded(lang: &str) -> Option<HashMap<String, String>> {
    let text = match lang {
        "en" => include_str!("../assets/i18n/en.json"),
        "zh-Hans" => include_str!("../assets/i18n/zh-Hans.json"),
        _ => return None,
    };
    serde_json::from_str(text).ok()
}

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(map) => Some(map),
        Err(err) => {
            log::warn!("ignoring malformed string table {}: {err}", path.display());
            None
        }
    }
}

/// Find assets/i18n/<lang>.json by searching:
/// 1) <exe_dir>/assets/i18n/<lang>.json
/// 2) ./assets/i18n/<lang>.json  (dev working dir)
fn find_lang_file(lang: &str) -> Option<PathBuf> {
    let file = format!("{lang}.json");

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    exe_dir
        .into_iter()
        .chain(std::iter::once(PathBuf::new()))
        .map(|dir| dir.join("assets").join("i18n").join(&file))
        .find(|p| p.exists())
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    find_lang_file(lang)
        .and_then(|p| load_json_map(&p))
        .or_else(|| embedded(lang))
        .unwrap_or_else(|| {
            log::warn!("no string table for language '{lang}'");
            HashMap::new()
        })
}

/// Initialize global i18n. Safe to call multiple times; later calls overwrite current lang maps.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();

    let map = load_lang(&lang);
    let fallback_map = if lang == FALLBACK_LANG {
        map.clone()
    } else {
        load_lang(FALLBACK_LANG)
    };

    let i = I18n {
        lang,
        map,
        fallback_map,
    };

    let lock = I18N.get_or_init(|| RwLock::new(i.clone()));
    if let Ok(mut w) = lock.write() {
        *w = i;
    }
}

/// Get localized text by key. If key missing, returns key itself.
pub fn tr(key: &str) -> String {
    if let Some(i) = I18N.get().and_then(|l| l.read().ok()) {
        if let Some(v) = i.map.get(key).or_else(|| i.fallback_map.get(key)) {
            return v.clone();
        }
    }
    BUILTIN_FALLBACK
        .get(key)
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// Get localized text and substitute `{name}` placeholders.
/// Any placeholder not provided is kept as-is.
pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    let mut s = tr(key);
    for (k, v) in args {
        let placeholder = format!("{{{k}}}");
        s = s.replace(&placeholder, v);
    }
    s
}
