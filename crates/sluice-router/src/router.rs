use regex::Regex;
use regex_syntax::hir::{Hir, Look};
use sluice_core::{MetaArg, Source, normalize_metadata};

use crate::error::RouterError;
use crate::mime::MimeRegistry;
use crate::partition::RoutePartition;

/// Bucket for sources with no content type or no matching rule.
pub const UNCLASSIFIED: &str = "unclassified";

#[derive(Debug)]
struct Rule {
    pattern: String,
    matcher: Regex,
}

impl Rule {
    fn compile(pattern: String) -> Result<Self, RouterError> {
        let invalid = |source: regex::Error| RouterError::InvalidPattern {
            pattern: pattern.clone(),
            source: Box::new(source),
        };
        Regex::new(&pattern).map_err(invalid)?;
        // Anchor the parsed rule rather than its text, so flags and comments
        // inside the rule cannot reach the anchors.
        let hir = regex_syntax::parse(&pattern)
            .map_err(|err| invalid(regex::Error::Syntax(err.to_string())))?;
        let anchored = Hir::concat(vec![Hir::look(Look::Start), hir, Hir::look(Look::End)]);
        let matcher = Regex::new(&anchored.to_string()).map_err(invalid)?;
        Ok(Self { pattern, matcher })
    }
}

/// Routes file paths and byte streams into buckets by content type.
///
/// Rules are exact content types or regular expressions, matched case-sensitively
/// against the whole content type. The first matching rule wins.
#[derive(Debug)]
pub struct FileTypeRouter {
    rules: Vec<Rule>,
    registry: MimeRegistry,
}

impl FileTypeRouter {
    /// # Errors
    ///
    /// Returns [`RouterError::EmptyRules`] if `rules` is empty, or
    /// [`RouterError::InvalidPattern`] naming the first rule that fails to compile.
    pub fn new<I, S>(rules: I) -> Result<Self, RouterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_registry(rules, MimeRegistry::new())
    }

    /// Like [`FileTypeRouter::new`], with extra `(mime, extension)` associations.
    ///
    /// # Errors
    ///
    /// Same as [`FileTypeRouter::new`].
    pub fn with_additional_mime_types<I, S, T, M, E>(
        rules: I,
        additional: T,
    ) -> Result<Self, RouterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        T: IntoIterator<Item = (M, E)>,
        M: Into<String>,
        E: AsRef<str>,
    {
        Self::with_registry(rules, MimeRegistry::with_types(additional))
    }

    /// # Errors
    ///
    /// Same as [`FileTypeRouter::new`].
    pub fn with_registry<I, S>(rules: I, registry: MimeRegistry) -> Result<Self, RouterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(|rule| Rule::compile(rule.into()))
            .collect::<Result<Vec<_>, _>>()?;
        if rules.is_empty() {
            return Err(RouterError::EmptyRules);
        }
        Ok(Self { rules, registry })
    }

    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.pattern.as_str())
    }

    /// Output channel names: every rule in order, then [`UNCLASSIFIED`].
    #[must_use]
    pub fn channels(&self) -> Vec<&str> {
        self.rules().chain(std::iter::once(UNCLASSIFIED)).collect()
    }

    #[must_use]
    pub fn registry(&self) -> &MimeRegistry {
        &self.registry
    }

    /// Return the first rule matching `content_type` in full.
    #[must_use]
    pub fn classify(&self, content_type: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.is_match(content_type))
            .map(|rule| rule.pattern.as_str())
    }

    /// Declared type for streams, extension-based guess for paths.
    #[must_use]
    pub fn content_type_of(&self, source: &Source) -> Option<String> {
        match source {
            Source::Path(path) => self.registry.guess(path),
            Source::Stream(stream) => stream.content_type().map(str::to_owned),
        }
    }

    /// Partition `sources` by content type.
    ///
    /// Sources with non-empty metadata are read into a [`ByteStream`](sluice_core::ByteStream)
    /// and the metadata merged in; other sources are routed as given.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Core`] if `meta` has the wrong length or a source
    /// that must carry metadata cannot be read. No partial result is returned.
    pub fn run(&self, sources: Vec<Source>, meta: MetaArg) -> Result<RoutePartition, RouterError> {
        let _span = tracing::info_span!("file_type_router.run", sources = sources.len()).entered();
        let metas = normalize_metadata(meta, sources.len())?;

        let mut partition = RoutePartition::default();
        for (source, meta) in sources.into_iter().zip(metas) {
            let content_type = self.content_type_of(&source);

            let source = if meta.is_empty() {
                source
            } else {
                let mut stream = source.into_byte_stream()?;
                stream.merge_meta(meta);
                Source::Stream(stream)
            };

            let bucket = content_type
                .as_deref()
                .filter(|ct| !ct.is_empty())
                .and_then(|ct| self.classify(ct))
                .unwrap_or(UNCLASSIFIED);
            tracing::debug!(
                %source,
                content_type = content_type.as_deref().unwrap_or_default(),
                bucket,
                "routed source"
            );
            partition.push(bucket, source);
        }

        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sluice_core::{ByteStream, FILE_PATH_KEY, Meta};

    use super::*;

    fn obj(value: serde_json::Value) -> Meta {
        value.as_object().cloned().unwrap()
    }

    fn paths(names: &[&str]) -> Vec<Source> {
        names.iter().map(|n| Source::from(*n)).collect()
    }

    #[test]
    fn empty_rules_rejected() {
        let result = FileTypeRouter::new(Vec::<String>::new());
        assert!(matches!(result, Err(RouterError::EmptyRules)));
    }

    #[test]
    fn invalid_pattern_names_rule() {
        let err = FileTypeRouter::new(["text/plain", "[unclosed"]).unwrap_err();
        match &err {
            RouterError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "[unclosed"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
        assert!(err.to_string().contains("'[unclosed'"));
    }

    #[test]
    fn unbalanced_group_rejected_before_wrapping() {
        let err = FileTypeRouter::new(["text)(plain"]).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }

    #[test]
    fn verbose_rule_with_trailing_comment_compiles() {
        let router = FileTypeRouter::new(["(?x) text/plain  # exact match"]).unwrap();
        assert_eq!(router.classify("text/plain"), Some("(?x) text/plain  # exact match"));
        assert_eq!(router.classify("text/plainer"), None);
    }

    #[test]
    fn multiline_flag_does_not_loosen_anchoring() {
        let router = FileTypeRouter::new(["(?m)text/plain"]).unwrap();
        assert_eq!(router.classify("text/plain\nimage/png"), None);
        assert_eq!(router.classify("text/plain"), Some("(?m)text/plain"));
    }

    #[test]
    fn channels_list_rules_then_unclassified() {
        let router = FileTypeRouter::new(["text/plain", "audio/.*"]).unwrap();
        assert_eq!(router.channels(), vec!["text/plain", "audio/.*", UNCLASSIFIED]);
        assert_eq!(router.rules().count(), 2);
    }

    #[test]
    fn exact_and_regex_routing() {
        let router = FileTypeRouter::new(["text/plain", "application/pdf"]).unwrap();
        let out = router
            .run(paths(&["file.txt", "document.pdf", "song.mp3"]), MetaArg::None)
            .unwrap();
        assert_eq!(out.get("text/plain").unwrap(), paths(&["file.txt"]).as_slice());
        assert_eq!(
            out.get("application/pdf").unwrap(),
            paths(&["document.pdf"]).as_slice()
        );
        assert_eq!(out.unclassified().unwrap(), paths(&["song.mp3"]).as_slice());

        let router = FileTypeRouter::new([r"audio/.*", r"text/plain"]).unwrap();
        let out = router
            .run(paths(&["file.txt", "document.pdf", "song.mp3"]), MetaArg::None)
            .unwrap();
        assert_eq!(out.get("audio/.*").unwrap(), paths(&["song.mp3"]).as_slice());
        assert_eq!(out.get("text/plain").unwrap(), paths(&["file.txt"]).as_slice());
        assert_eq!(out.unclassified().unwrap(), paths(&["document.pdf"]).as_slice());
    }

    #[test]
    fn first_matching_rule_wins() {
        let router = FileTypeRouter::new(["text/plain", "text/.*"]).unwrap();
        let out = router.run(paths(&["a.txt", "b.md"]), MetaArg::None).unwrap();
        assert_eq!(out.get("text/plain").unwrap(), paths(&["a.txt"]).as_slice());
        assert_eq!(out.get("text/.*").unwrap(), paths(&["b.md"]).as_slice());
    }

    #[test]
    fn match_is_full_string() {
        let router = FileTypeRouter::new(["text"]).unwrap();
        assert!(router.classify("text/plain").is_none());
        let router = FileTypeRouter::new(["text/plain|text/plainer"]).unwrap();
        assert_eq!(router.classify("text/plainer"), Some("text/plain|text/plainer"));
    }

    #[test]
    fn match_is_case_sensitive() {
        let router = FileTypeRouter::new(["text/plain"]).unwrap();
        assert!(router.classify("TEXT/PLAIN").is_none());
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let router = FileTypeRouter::new(["text/plain", "image/png"]).unwrap();
        let out = router.run(paths(&["a.txt"]), MetaArg::None).unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out.contains("image/png"));
        assert!(out.unclassified().is_none());
    }

    #[test]
    fn empty_batch_gives_empty_partition() {
        let router = FileTypeRouter::new(["text/plain"]).unwrap();
        assert!(router.run(Vec::new(), MetaArg::None).unwrap().is_empty());
    }

    #[test]
    fn unknown_extension_is_unclassified() {
        let router = FileTypeRouter::new([".*"]).unwrap();
        let out = router.run(paths(&["blob.unknownext42", "Makefile"]), MetaArg::None).unwrap();
        assert_eq!(out.unclassified().unwrap().len(), 2);
        assert!(!out.contains(".*"));
    }

    #[test]
    fn streams_use_declared_content_type() {
        let router = FileTypeRouter::new(["text/plain", "application/json"]).unwrap();
        let typed = ByteStream::new("{}").with_content_type("application/json");
        let untyped = ByteStream::new("??");
        let empty_type = ByteStream::new("..").with_content_type("");
        let out = router
            .run(
                vec![typed.clone().into(), untyped.clone().into(), empty_type.clone().into()],
                MetaArg::None,
            )
            .unwrap();
        assert_eq!(out.get("application/json").unwrap(), &[Source::Stream(typed)]);
        assert_eq!(
            out.unclassified().unwrap(),
            &[Source::Stream(untyped), Source::Stream(empty_type)]
        );
    }

    #[test]
    fn stream_named_like_pdf_is_not_reinferred() {
        let router = FileTypeRouter::new(["application/pdf"]).unwrap();
        let stream = ByteStream::new("x").with_meta(obj(json!({"file_path": "doc.pdf"})));
        let out = router.run(vec![stream.into()], MetaArg::None).unwrap();
        assert!(out.unclassified().is_some());
    }

    #[test]
    fn additional_mime_types_are_used() {
        let router = FileTypeRouter::with_additional_mime_types(
            ["application/x-sluice-test"],
            [("application/x-sluice-test", ".slt")],
        )
        .unwrap();
        let out = router.run(paths(&["x.slt"]), MetaArg::None).unwrap();
        assert_eq!(
            out.get("application/x-sluice-test").unwrap(),
            paths(&["x.slt"]).as_slice()
        );

        let plain = FileTypeRouter::new(["application/x-sluice-test"]).unwrap();
        let out = plain.run(paths(&["x.slt"]), MetaArg::None).unwrap();
        assert!(out.unclassified().is_some());
    }

    #[test]
    fn shared_meta_promotes_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "alpha").unwrap();
        std::fs::write(&b, "beta").unwrap();

        let router = FileTypeRouter::new(["text/plain"]).unwrap();
        let out = router
            .run(
                vec![a.clone().into(), b.clone().into()],
                MetaArg::Shared(obj(json!({"batch": 7}))),
            )
            .unwrap();

        let bucket = out.get("text/plain").unwrap();
        assert_eq!(bucket.len(), 2);
        for (source, (path, body)) in bucket.iter().zip([(&a, "alpha"), (&b, "beta")]) {
            let stream = source.as_stream().unwrap();
            assert_eq!(stream.data(), body.as_bytes());
            assert_eq!(stream.meta()["batch"], 7);
            assert_eq!(stream.meta()[FILE_PATH_KEY], path.display().to_string());
        }
    }

    #[test]
    fn per_source_meta_merges_and_overwrites() {
        let router = FileTypeRouter::new(["text/plain"]).unwrap();
        let stream = ByteStream::new("x")
            .with_content_type("text/plain")
            .with_meta(obj(json!({"author": "a", "language": "en"})));
        let out = router
            .run(
                vec![stream.into(), Source::from("unrouted.bin.unknownext42")],
                MetaArg::PerSource(vec![obj(json!({"language": "it"})), Meta::new()]),
            )
            .unwrap();

        let routed = out.get("text/plain").unwrap()[0].as_stream().unwrap();
        assert_eq!(
            serde_json::Value::Object(routed.meta().clone()),
            json!({"author": "a", "language": "it"})
        );
        // empty per-source meta leaves the path untouched, no disk read
        assert_eq!(
            out.unclassified().unwrap(),
            &[Source::from("unrouted.bin.unknownext42")]
        );
    }

    #[test]
    fn meta_length_mismatch_fails() {
        let router = FileTypeRouter::new(["text/plain"]).unwrap();
        let err = router
            .run(
                paths(&["a.txt", "b.txt"]),
                MetaArg::PerSource(vec![Meta::new()]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RouterError::Core(sluice_core::CoreError::MetaLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn promotion_of_missing_file_aborts_call() {
        let router = FileTypeRouter::new(["text/plain"]).unwrap();
        let err = router
            .run(
                paths(&["/nonexistent/missing.txt"]),
                MetaArg::Shared(obj(json!({"k": 1}))),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RouterError::Core(sluice_core::CoreError::Io { .. })
        ));
    }
}
