use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::CliTest;

const CONFIG: &str = r#"{ "locales": ["en", "fr"] }"#;

fn project() -> Result<CliTest> {
    CliTest::with_files(&[
        (".intlrc.json", CONFIG),
        ("locales/en.json", r#"{"a":"Hello"}"#),
        ("locales/fr.json", r#"{"a":"Bonjour"}"#),
        (
            "src/app.js",
            "__('a');\nintl.formatMessage({ id: 'b', defaultMessage: 'World' }, {});\n",
        ),
    ])
}

#[test]
fn test_extract_merges_default_messages() -> Result<()> {
    let test = project()?;

    let output = test.extract_command().output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(
        test.read_file("locales/en.json")?,
        "{\n    \"a\": \"Hello\",\n    \"b\": \"World\"\n}\n"
    );
    assert_eq!(
        test.read_json("locales/fr.json")?,
        json!({ "a": "Bonjour", "b": "" })
    );
    assert_eq!(
        test.read_json("locales/.extract/template.json")?,
        json!({ "a": "", "b": "" })
    );

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Extracted 2 messages from 1 of 1 source file"));
    assert!(stdout.contains("template: locales/.extract/template.json"));
    assert!(stdout.contains("locales/en.json (2 keys, 1 added)"));
    assert!(stdout.contains("locales/fr.json (2 keys, 1 added)"));

    Ok(())
}

#[test]
fn test_extract_file_map() -> Result<()> {
    let test = CliTest::with_files(&[
        (".intlrc.json", r#"{ "locales": ["en"], "jsonIntend": 2 }"#),
        ("src/app.js", "export const t = () => __('welcome.title');\n"),
    ])?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());

    insta::assert_snapshot!(test.read_file("locales/.extract/file-map.json")?, @r#"
    {
      "src/app.js": [
        {
          "id": "welcome.title",
          "pos": "src/app.js:1:23",
          "code": "__('welcome.title')",
          "ln": 1,
          "col": 24
        }
      ]
    }
    "#);

    Ok(())
}

#[test]
fn test_extract_is_idempotent() -> Result<()> {
    let test = project()?;
    let files = [
        "locales/en.json",
        "locales/fr.json",
        "locales/.extract/template.json",
        "locales/.extract/message-map.json",
        "locales/.extract/file-map.json",
    ];

    assert!(test.extract_command().output()?.status.success());
    let first = files
        .iter()
        .map(|f| test.read_file(f))
        .collect::<Result<Vec<_>>>()?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());
    let second = files
        .iter()
        .map(|f| test.read_file(f))
        .collect::<Result<Vec<_>>>()?;

    assert_eq!(first, second);
    assert!(String::from_utf8(output.stdout)?.contains("locales/en.json (2 keys)"));

    Ok(())
}

#[test]
fn test_extract_corrupt_locale_file_fails() -> Result<()> {
    let test = CliTest::with_files(&[
        (".intlrc.json", CONFIG),
        ("locales/fr.json", "{ \"a\": "),
        ("src/app.js", "__('a')"),
    ])?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr)?.contains("fr.json"));
    assert!(!test.root().join("locales/en.json").exists());
    assert!(!test.root().join("locales/.extract").exists());

    Ok(())
}

#[test]
fn test_extract_invalid_sort_by_fails() -> Result<()> {
    let test = CliTest::with_files(&[
        (".intlrc.json", r#"{ "sortBy": "length" }"#),
        ("src/app.js", "__('a')"),
    ])?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr)?.contains("sortBy"));
    assert!(!test.root().join("locales").exists());

    Ok(())
}

#[test]
fn test_extract_command_line_overrides() -> Result<()> {
    let test = CliTest::with_files(&[
        ("client/b.js", "__('b')"),
        ("client/a.js", "__('a')"),
        ("server/c.js", "__('c')"),
    ])?;

    let output = test
        .extract_command()
        .args(["--source-dir", "client", "--locale", "de"])
        .args(["--sort-by", "none", "--output-dir", "build/intl"])
        .output()?;
    assert!(output.status.success());

    assert_eq!(test.read_file("locales/de.json")?, "{\n    \"a\": \"\",\n    \"b\": \"\"\n}\n");
    assert!(!test.root().join("locales/en.json").exists());
    assert!(test.root().join("build/intl/message-map.json").exists());

    Ok(())
}

#[test]
fn test_extract_reports_unparsable_descriptors() -> Result<()> {
    let test = CliTest::with_files(&[
        (".intlrc.json", r#"{ "locales": ["en"] }"#),
        ("src/app.js", "formatMessage({ id: someVariable }, {})\n__('ok')\n"),
    ])?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("warning: 1 message descriptor could not be parsed"));
    assert!(String::from_utf8(output.stderr)?.contains("src/app.js:1:0"));
    assert_eq!(test.read_json("locales/en.json")?, json!({ "ok": "" }));

    Ok(())
}

#[test]
fn test_extract_fallback_locale() -> Result<()> {
    let test = CliTest::with_files(&[
        (".intlrc.json", r#"{ "locales": ["en", "fr"], "fallback": "en" }"#),
        ("locales/en.json", r#"{"a":"Hello"}"#),
        ("src/app.js", "__('a')"),
    ])?;

    assert!(test.extract_command().output()?.status.success());
    assert_eq!(test.read_json("locales/fr.json")?, json!({ "a": "Hello" }));

    Ok(())
}
