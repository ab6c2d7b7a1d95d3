// fonts.rs — UI font discovery for languages egui's bundled fonts lack
//
// egui ships Latin fonts only. For CJK tables we search the system font
// directories, then ./assets next to the executable or working directory.
// ab_glyph validates candidates; .ttc collections are tried but skipped if
// they do not parse.

use std::path::{Path, PathBuf};

const ASSET_FONTS: [&str; 4] = [
    "NotoSansSC-Regular.otf",
    "NotoSansSC-Regular.ttf",
    "NotoSansCJK-Regular.ttc",
    "NotoSans-Regular.ttf",
];

/// Whether `lang` needs glyphs beyond egui's bundled fonts.
pub fn needs_extra_font(lang: &str) -> bool {
    !lang.starts_with("en")
}

fn system_candidates() -> Vec<PathBuf> {
    let fixed: &[&str] = if cfg!(windows) {
        &[
            r"C:\Windows\Fonts\msyh.ttf",
            r"C:\Windows\Fonts\simhei.ttf",
            r"C:\Windows\Fonts\simsun.ttf",
            r"C:\Windows\Fonts\Deng.ttf",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
            "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
            "/Library/Fonts/NotoSansSC-Regular.otf",
        ]
    } else {
        &[
            "/usr/share/fonts/opentype/noto/NotoSansSC-Regular.otf",
            "/usr/share/fonts/truetype/noto/NotoSansSC-Regular.ttf",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
        ]
    };
    let mut out: Vec<PathBuf> = fixed.iter().map(PathBuf::from).collect();

    if cfg!(unix) && !cfg!(target_os = "macos") {
        if let Ok(home) = std::env::var("HOME") {
            let home = PathBuf::from(home);
            out.push(home.join(".local/share/fonts/NotoSansSC-Regular.otf"));
            out.push(home.join(".fonts/NotoSansSC-Regular.otf"));
        }
    }
    out
}

fn asset_candidates() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(dir.join("assets"));
    }
    dirs.push(PathBuf::from("assets"));

    dirs.iter()
        .flat_map(|dir| ASSET_FONTS.iter().map(move |f| dir.join(f)))
        .collect()
}

fn load_valid_font(path: &Path) -> Option<Vec<u8>> {
    let bytes = std::fs::read(path).ok()?;
    ab_glyph::FontRef::try_from_slice(&bytes).ok()?;
    Some(bytes)
}

/// First candidate that exists and parses as a font.
pub fn find_font(candidates: impl IntoIterator<Item = PathBuf>) -> Option<(PathBuf, Vec<u8>)> {
    candidates
        .into_iter()
        .find_map(|p| load_valid_font(&p).map(|bytes| (p, bytes)))
}

/// Puts a system or bundled font in front of egui's defaults when `lang`
/// needs it. Without one, non-Latin text renders as boxes.
pub fn install_ui_font(ctx: &egui::Context, lang: &str) {
    if !needs_extra_font(lang) {
        return;
    }
    let candidates = system_candidates().into_iter().chain(asset_candidates());
    let Some((path, bytes)) = find_font(candidates) else {
        log::warn!("no font with {lang} glyphs found; UI text may not render");
        return;
    };
    log::info!("using UI font {}", path.display());

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("ui".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        if let Some(list) = fonts.families.get_mut(&family) {
            list.insert(0, "ui".to_owned());
        }
    }
    ctx.set_fonts(fonts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn english_needs_nothing_extra() {
        assert!(!needs_extra_font("en"));
        assert!(needs_extra_font("zh-Hans"));
    }

    #[test]
    fn invalid_files_are_skipped() {
        let mut bogus = tempfile::NamedTempFile::new().unwrap();
        bogus.write_all(b"not a font").unwrap();
        let found = find_font([
            PathBuf::from("/nonexistent/font.ttf"),
            bogus.path().to_path_buf(),
        ]);
        assert!(found.is_none());
    }
}
