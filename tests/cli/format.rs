use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

fn project() -> Result<CliTest> {
    CliTest::with_files(&[
        (".intlrc.json", r#"{ "locales": ["en", "fr"] }"#),
        (
            "locales/en.json",
            r#"{
                "greeting": "Hello {name}!",
                "user.status.ok": "Active",
                "status": "Status: {@'user.status.{status}'}",
                "items": "{count, plural, one {# item} other {# items}}"
            }"#,
        ),
        (
            "locales/fr.json",
            r#"{ "greeting": "Bonjour {name} !", "items": "" }"#,
        ),
    ])
}

fn stdout(test: &CliTest, id: &str, args: &[&str]) -> Result<String> {
    let output = test.format_command(id).args(args).output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8(output.stdout)?)
}

#[test]
fn test_format_substitutes_values() -> Result<()> {
    let test = project()?;
    assert_eq!(
        stdout(&test, "greeting", &["--values", r#"{"name": "Jack"}"#])?,
        "Hello Jack!\n"
    );
    assert_eq!(
        stdout(&test, "greeting", &["--values", r#"{"name": "Jack"}"#, "--locale", "fr"])?,
        "Bonjour Jack !\n"
    );
    Ok(())
}

#[test]
fn test_format_nested_reference() -> Result<()> {
    let test = project()?;
    assert_eq!(
        stdout(&test, "status", &["--values", r#"{"status": "ok"}"#])?,
        "Status: Active\n"
    );
    Ok(())
}

#[test]
fn test_format_plural_and_gap_filling() -> Result<()> {
    let test = project()?;
    assert_eq!(
        stdout(&test, "items", &["--values", r#"{"count": 1}"#])?,
        "1 item\n"
    );
    assert_eq!(
        stdout(&test, "items", &["--values", r#"{"count": 2}"#, "--locale", "fr"])?,
        "[en]2 items\n"
    );
    Ok(())
}

#[test]
fn test_format_missing_message() -> Result<()> {
    let test = project()?;
    assert_eq!(stdout(&test, "not.there", &[])?, "not.there\n");
    assert_eq!(
        stdout(&test, "not.there", &["--fallback", "N/A"])?,
        "N/A\n"
    );
    assert_eq!(
        stdout(
            &test,
            "not.there",
            &["--default-message", "Hi {name}", "--values", r#"{"name": "Jack"}"#]
        )?,
        "Hi Jack\n"
    );
    Ok(())
}

#[test]
fn test_format_missing_value_uses_fallback() -> Result<()> {
    let test = project()?;
    assert_eq!(
        stdout(&test, "greeting", &["--values", "{}", "--fallback", "Hello!"])?,
        "Hello!\n"
    );
    Ok(())
}

#[test]
fn test_format_invalid_values() -> Result<()> {
    let test = project()?;
    let output = test
        .format_command("greeting")
        .args(["--values", "[1, 2]"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr)?.contains("--values"));
    Ok(())
}

#[test]
fn test_format_skips_non_string_entries() -> Result<()> {
    let test = CliTest::with_files(&[
        (".intlrc.json", r#"{ "locales": ["en"] }"#),
        (
            "locales/en.json",
            r#"{ "greeting": "Hello {name}!", "draft": null, "count": 3 }"#,
        ),
    ])?;
    assert_eq!(
        stdout(&test, "greeting", &["--values", r#"{"name": "Jack"}"#])?,
        "Hello Jack!\n"
    );
    Ok(())
}
