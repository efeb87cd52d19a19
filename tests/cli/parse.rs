use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

fn project() -> Result<CliTest> {
    CliTest::with_files(&[
        (".intlrc.json", r#"{ "locales": ["en", "ja"] }"#),
        (
            "locales/en.json",
            r#"{ "task.assigned": "{user} assigned {assignee} a task" }"#,
        ),
        ("locales/ja.json", r#"{ "task.assigned": "{user}が{assignee}にタスクを割り当てました" }"#),
    ])
}

#[test]
fn test_parse_recovers_variables() -> Result<()> {
    let test = project()?;
    let output = test
        .command()
        .args(["parse", "task.assigned", "Jack assigned Black a task"])
        .output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "{\n  \"user\": \"Jack\",\n  \"assignee\": \"Black\"\n}\n"
    );
    Ok(())
}

#[test]
fn test_parse_with_locale() -> Result<()> {
    let test = project()?;
    let output = test
        .command()
        .args(["parse", "task.assigned", "花子が太郎にタスクを割り当てました", "--locale", "ja"])
        .output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "{\n  \"user\": \"花子\",\n  \"assignee\": \"太郎\"\n}\n"
    );
    Ok(())
}

#[test]
fn test_parse_mismatch_prints_empty_object() -> Result<()> {
    let test = project()?;
    let output = test
        .command()
        .args(["parse", "task.assigned", "Something else entirely"])
        .output()?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "{}\n");
    Ok(())
}
