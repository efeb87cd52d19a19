use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["localesDir"], "locales");
    assert_eq!(parsed["defaultLanguage"], "en");
    assert_eq!(parsed["outputDir"], "locales/.extract");
    assert_eq!(parsed["sortBy"], "keys");
    assert_eq!(parsed["jsonIntend"], 4);
    assert_eq!(
        parsed["patterns"].as_array().map(Vec::len),
        Some(5),
        "Config should list the built-in patterns"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "\u{2713} Created .intlrc.json\n");

    let content = test.read_file(".intlrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".intlrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains(".intlrc.json already exists"));
    assert_eq!(test.read_file(".intlrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("src/app.tsx", "export const title = __('home.title');")?;

    let output = test.extract_command().output()?;
    assert!(
        output.status.success(),
        "Extract should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(test.root().join("locales/zh-hk.json").exists());

    Ok(())
}
