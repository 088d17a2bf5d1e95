use std::collections::HashMap;
use std::path::Path;

/// Associations missing from the `mime_guess` database that document pipelines rely on.
const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("md", "text/markdown"),
    ("markdown", "text/markdown"),
    ("msg", "application/vnd.ms-outlook"),
];

/// Compression suffixes; the content type comes from the extension underneath.
const COMPRESSION_SUFFIXES: &[&str] = &["gz", "z", "bz2", "xz", "br"];

/// Single-suffix shorthands for compressed archives, mapped to the inner extension.
const COMPRESSED_ALIASES: &[(&str, &str)] = &[
    ("tgz", "tar"),
    ("taz", "tar"),
    ("tz", "tar"),
    ("tbz2", "tar"),
    ("txz", "tar"),
    ("svgz", "svg"),
];

/// Extension to content-type lookup table.
///
/// Lookup order: instance overrides, then the built-in associations, then the
/// `mime_guess` database. Each router owns its own registry, so registering a
/// type never leaks into other routers.
#[derive(Debug, Clone, Default)]
pub struct MimeRegistry {
    overrides: HashMap<String, String>,
}

impl MimeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(mime, extension)` pairs.
    #[must_use]
    pub fn with_types<I, M, E>(types: I) -> Self
    where
        I: IntoIterator<Item = (M, E)>,
        M: Into<String>,
        E: AsRef<str>,
    {
        let mut registry = Self::new();
        for (mime, ext) in types {
            registry.register(mime, ext.as_ref());
        }
        registry
    }

    /// Associate `extension` (with or without the leading dot) with `mime`.
    pub fn register(&mut self, mime: impl Into<String>, extension: &str) {
        let ext = normalize_extension(extension);
        if ext.is_empty() {
            tracing::warn!(extension, "ignoring empty extension in mime registration");
            return;
        }
        let mime = mime.into();
        tracing::debug!(%ext, %mime, "registered mime type");
        self.overrides.insert(ext, mime);
    }

    /// Infer the content type of `path` from its extension.
    ///
    /// A compression suffix (`.gz`, `.bz2`, ...) is looked through, so
    /// `logs.tar.gz` is a tar archive and a bare `data.gz` has no type.
    /// Registered overrides for the final extension still win.
    /// Purely syntactic: the file is never opened.
    #[must_use]
    pub fn guess(&self, path: &Path) -> Option<String> {
        let ext = normalize_extension(path.extension()?.to_str()?);
        if let Some(mime) = self.overrides.get(&ext) {
            return Some(mime.clone());
        }
        if let Some((_, inner)) = COMPRESSED_ALIASES.iter().find(|(alias, _)| *alias == ext) {
            return self.guess_extension(inner);
        }
        if COMPRESSION_SUFFIXES.contains(&ext.as_str()) {
            let inner = Path::new(path.file_stem()?).extension()?.to_str()?;
            return self.guess_extension(inner);
        }
        self.guess_extension(&ext)
    }

    #[must_use]
    pub fn guess_extension(&self, extension: &str) -> Option<String> {
        let ext = normalize_extension(extension);
        if ext.is_empty() {
            return None;
        }
        if let Some(mime) = self.overrides.get(&ext) {
            return Some(mime.clone());
        }
        if let Some((_, mime)) = BUILTIN_TYPES.iter().find(|(known, _)| *known == ext) {
            return Some((*mime).to_owned());
        }
        mime_guess::from_ext(&ext).first_raw().map(str::to_owned)
    }

    #[must_use]
    pub fn overrides(&self) -> &HashMap<String, String> {
        &self.overrides
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}
