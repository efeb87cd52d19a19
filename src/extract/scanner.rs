use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use super::{
    descriptor::parse_descriptor,
    rules::{ExtractionRule, RuleKind, extract_keys},
};
use crate::utils::relative_display;

/// One rule match on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// `file:line:offset`, with a 1-based line and a 0-based char offset.
    pub pos: String,
    /// The matched source text. For descriptor rules it ends at the
    /// descriptor's closing brace.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
}

/// An occurrence as listed per file, with its owning id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOccurrence {
    pub id: String,
    #[serde(flatten)]
    pub occurrence: Occurrence,
    pub ln: usize,
    /// 1-based char column.
    pub col: usize,
}

pub type MessageMap = IndexMap<String, Vec<Occurrence>>;
pub type FileMap = IndexMap<String, Vec<FileOccurrence>>;
pub type DefaultMessages = IndexMap<String, String>;

#[derive(Debug, Default)]
pub struct ScanResult {
    pub message_map: MessageMap,
    pub file_map: FileMap,
    pub default_messages: DefaultMessages,
    pub files_scanned: usize,
    /// Descriptor matches that could not be parsed and were skipped.
    pub parse_failures: usize,
}

/// Applies extraction rules line by line and accumulates occurrences.
///
/// Matching never crosses a line break, so a descriptor spread over several
/// lines is not seen.
pub struct Scanner<'a> {
    rules: &'a [ExtractionRule],
    result: ScanResult,
}

impl<'a> Scanner<'a> {
    pub fn new(rules: &'a [ExtractionRule]) -> Self {
        Self {
            rules,
            result: ScanResult::default(),
        }
    }

    /// Scan one file's content. `file` is the name recorded in positions.
    pub fn scan_source(&mut self, file: &str, content: &str) {
        self.result.files_scanned += 1;
        let mut found: Vec<FileOccurrence> = Vec::new();

        for (index, line) in content.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let ln = index + 1;
            for rule in self.rules {
                for caps in rule.regex.captures_iter(line) {
                    let (Some(matched), Some(capture)) = (caps.get(0), caps.get(1)) else {
                        continue;
                    };
                    let offset = line[..matched.start()].chars().count();
                    let col = offset + 1;
                    let pos = format!("{}:{}:{}", file, ln, offset);

                    let id = match rule.kind {
                        RuleKind::Object => match parse_descriptor(capture.as_str()) {
                            Ok(descriptor) => {
                                if let Some(message) = descriptor.default_message {
                                    self.result
                                        .default_messages
                                        .insert(descriptor.id.clone(), message);
                                }
                                descriptor.id
                            }
                            Err(err) => {
                                warn!(
                                    %pos,
                                    code = matched.as_str(),
                                    %err,
                                    "could not parse message descriptor"
                                );
                                self.result.parse_failures += 1;
                                continue;
                            }
                        },
                        RuleKind::String if capture.as_str().is_empty() => continue,
                        RuleKind::String => capture.as_str().to_string(),
                    };

                    let code = match rule.kind {
                        RuleKind::Object => &line[matched.start()..capture.end()],
                        RuleKind::String => matched.as_str(),
                    };
                    let occurrence = Occurrence {
                        pos,
                        code: code.to_string(),
                        keys: caps.get(2).map(|m| extract_keys(m.as_str())),
                    };
                    self.result
                        .message_map
                        .entry(id.clone())
                        .or_default()
                        .push(occurrence.clone());
                    found.push(FileOccurrence {
                        id,
                        occurrence,
                        ln,
                        col,
                    });
                }
            }
        }

        if !found.is_empty() {
            debug!(file, occurrences = found.len(), "scanned file");
            found.sort_by_key(|o| (o.ln, o.col));
            self.result
                .file_map
                .entry(file.to_string())
                .or_default()
                .extend(found);
        }
    }

    pub fn finish(self) -> ScanResult {
        self.result
    }
}

/// Read and scan each file, recording paths relative to `root`.
///
/// A file that cannot be read aborts the scan.
pub fn scan_files(root: &Path, files: &[PathBuf], rules: &[ExtractionRule]) -> Result<ScanResult> {
    let mut scanner = Scanner::new(rules);
    for path in files {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read source file: {}", path.display()))?;
        let content = String::from_utf8_lossy(&bytes);
        scanner.scan_source(&relative_display(root, path), &content);
    }
    Ok(scanner.finish())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::extract::rules::{PatternConfig, compile_rules, default_patterns};

    fn scan(files: &[(&str, &str)]) -> ScanResult {
        let rules = compile_rules(&default_patterns()).unwrap();
        let mut scanner = Scanner::new(&rules);
        for (file, content) in files {
            scanner.scan_source(file, content);
        }
        scanner.finish()
    }

    #[test]
    fn test_shorthand_id_occurrence() {
        let result = scan(&[("src/app.js", "const t = 1;\n  title: __('welcome.title'),\n")]);
        assert_eq!(
            result.message_map["welcome.title"],
            vec![Occurrence {
                pos: "src/app.js:2:9".to_string(),
                code: "__('welcome.title')".to_string(),
                keys: None,
            }]
        );
        let file = &result.file_map["src/app.js"][0];
        assert_eq!((file.id.as_str(), file.ln, file.col), ("welcome.title", 2, 10));
    }

    #[test]
    fn test_descriptor_occurrence_and_default_message() {
        let result = scan(&[(
            "a.js",
            "intl.formatMessage({ id: 'user.greeting', defaultMessage: 'Hi {user_name}' }, values)",
        )]);
        assert_eq!(
            result.default_messages["user.greeting"],
            "Hi {userName}".to_string()
        );
        assert_eq!(result.message_map["user.greeting"].len(), 1);
        assert_eq!(result.message_map["user.greeting"][0].pos, "a.js:1:5");
        assert_eq!(
            result.message_map["user.greeting"][0].code,
            "formatMessage({ id: 'user.greeting', defaultMessage: 'Hi {user_name}' }"
        );
        assert_eq!(result.file_map["a.js"][0].col, 6);
    }

    #[test]
    fn test_pos_offset_is_zero_based_and_col_one_based() {
        let result = scan(&[("a.js", "x = __('welcome.title')")]);
        assert_eq!(result.message_map["welcome.title"][0].pos, "a.js:1:4");
        assert_eq!(result.file_map["a.js"][0].col, 5);
    }

    #[test]
    fn test_descriptor_code_stops_at_closing_brace() {
        let result = scan(&[("a.js", "__({ id: 'a.b' }); formatMessage({ id: 'c.d' }, values)")]);
        let codes: Vec<&str> = result.file_map["a.js"]
            .iter()
            .map(|o| o.occurrence.code.as_str())
            .collect();
        assert_eq!(codes, vec!["__({ id: 'a.b' }", "formatMessage({ id: 'c.d' }"]);
    }

    #[test]
    fn test_conflicting_default_messages_last_one_wins() {
        let result = scan(&[
            ("a.js", "formatMessage({ id: 'greet', defaultMessage: 'Hello' })"),
            (
                "b.js",
                "formatMessage({ id: 'greet', defaultMessage: 'Hi' })\n\
                 __({ id: 'greet', defaultMessage: 'Hey {first_name}' })",
            ),
        ]);
        assert_eq!(result.default_messages["greet"], "Hey {firstName}");
        assert_eq!(result.message_map["greet"].len(), 3);
    }

    #[test]
    fn test_multiple_matches_per_line_in_order() {
        let result = scan(&[("a.js", "__('b.second'); __('a.first'); __('b.second')")]);
        let ids: Vec<&str> = result.message_map.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["b.second", "a.first"]);
        assert_eq!(result.message_map["b.second"].len(), 2);
        let cols: Vec<usize> = result.file_map["a.js"].iter().map(|o| o.col).collect();
        assert_eq!(cols, vec![1, 17, 32]);
    }

    #[test]
    fn test_file_map_sorted_by_line_then_column() {
        // Rule order would put the descriptor call first; the file map is by position.
        let result = scan(&[(
            "a.js",
            "__('x.id'); formatMessage({ id: 'y.id' })\nthrow new Meteor.Error(500, 'z.id');",
        )]);
        let ids: Vec<&str> = result.file_map["a.js"].iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["x.id", "y.id", "z.id"]);
        let rule_order: Vec<&str> = result.message_map.keys().map(String::as_str).collect();
        assert_eq!(rule_order, vec!["y.id", "x.id", "z.id"]);
    }

    #[test]
    fn test_parse_failure_is_skipped() {
        let result = scan(&[(
            "a.js",
            "formatMessage({ id: dynamicId }, v)\nformatMessage({ id: 'ok.id' })",
        )]);
        assert_eq!(result.parse_failures, 1);
        assert_eq!(result.message_map.len(), 1);
        assert!(result.message_map.contains_key("ok.id"));
    }

    #[test]
    fn test_multi_line_descriptor_is_missed() {
        let result = scan(&[(
            "a.js",
            "formatMessage({\n  id: 'split.id',\n  defaultMessage: 'Hi',\n})",
        )]);
        assert!(result.message_map.is_empty());
        assert!(result.default_messages.is_empty());
    }

    #[test]
    fn test_formatted_message_keys() {
        let result = scan(&[(
            "a.jsx",
            r#"<FormattedMessage id="cart.total" values={{ count: n, price }} />"#,
        )]);
        assert_eq!(
            result.message_map["cart.total"][0].keys,
            Some(vec!["count".to_string(), "price".to_string()])
        );
    }

    #[test]
    fn test_overlapping_rules_are_not_deduplicated() {
        let rules = compile_rules(&[
            PatternConfig::new(r"t\('([^']+)'\)", RuleKind::String),
            PatternConfig::new(r"\bt\('([^']+)'\)", RuleKind::String),
        ])
        .unwrap();
        let mut scanner = Scanner::new(&rules);
        scanner.scan_source("a.js", "t('same.id')");
        let result = scanner.finish();
        assert_eq!(result.message_map["same.id"].len(), 2);
        assert_eq!(result.file_map["a.js"].len(), 2);
    }

    #[test]
    fn test_crlf_and_unicode_columns() {
        let result = scan(&[("a.js", "x\r\n\"héllo\" + __('greet.id')\r\n")]);
        let occurrence = &result.file_map["a.js"][0];
        assert_eq!((occurrence.ln, occurrence.col), (2, 11));
        assert_eq!(occurrence.occurrence.code, "__('greet.id')");
    }

    #[test]
    fn test_scan_is_deterministic() {
        let files = [("a.js", "__('a'); __('b')"), ("b.js", "__('b')\n__('c')")];
        let first = scan(&files);
        let second = scan(&files);
        assert_eq!(first.message_map, second.message_map);
        assert_eq!(first.file_map, second.file_map);
    }

    #[test]
    fn test_serialized_shapes() {
        let result = scan(&[(
            "a.jsx",
            r#"<FormattedMessage id="n" values={{ count }} />"#,
        )]);
        let file_map = serde_json::to_value(&result.file_map).unwrap();
        assert_eq!(
            file_map,
            serde_json::json!({
                "a.jsx": [{
                    "id": "n",
                    "pos": "a.jsx:1:0",
                    "code": r#"<FormattedMessage id="n" values={{ count }} />"#,
                    "keys": ["count"],
                    "ln": 1,
                    "col": 1
                }]
            })
        );
    }

    #[test]
    fn test_scan_files_relative_paths() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        let file = dir.path().join("src/app.js");
        fs::write(&file, "__('welcome.title')").unwrap();

        let rules = compile_rules(&default_patterns()).unwrap();
        let result = scan_files(dir.path(), &[file], &rules).unwrap();
        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.message_map["welcome.title"][0].pos, "src/app.js:1:0");
    }

    #[test]
    fn test_scan_files_missing_file_is_fatal() {
        let dir = tempdir().unwrap();
        let rules = compile_rules(&default_patterns()).unwrap();
        let err = scan_files(dir.path(), &[dir.path().join("gone.js")], &rules).unwrap_err();
        assert!(err.to_string().contains("gone.js"));
    }
}
