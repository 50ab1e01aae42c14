/*!
 * Tests for converting files and folders on disk
 */

use anyhow::Result;
use danmaku_converter::app_config::Config;
use danmaku_converter::file_utils::FileManager;
use danmaku_converter::Converter;
use crate::common;

#[test]
fn test_convert_file_withDefaults_shouldWriteAssNamedAfterInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "episode01.xml", &common::sample_document())?;
    let converter = Converter::new(Config::default());

    let output = converter.convert_file(&input, temp_dir.path(), false)?;
    let output = output.expect("output should be written");

    assert_eq!(output, temp_dir.path().join("episode01.ass"));
    let script = FileManager::read_to_string(&output)?;
    assert!(script.contains("Title: episode01"));
    assert_eq!(script.lines().filter(|l| l.starts_with("Dialogue:")).count(), 4);
    Ok(())
}

#[test]
fn test_convert_file_withExistingOutput_shouldRespectForceFlag() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "ep.xml", &common::sample_document())?;
    let existing = common::create_test_file(temp_dir.path(), "ep.ass", "keep me")?;
    let mut config = Config::default();
    config.title = "Configured".to_string();
    let converter = Converter::new(config);

    assert_eq!(converter.convert_file(&input, temp_dir.path(), false)?, None);
    assert_eq!(FileManager::read_to_string(&existing)?, "keep me");

    assert!(converter.convert_file(&input, temp_dir.path(), true)?.is_some());
    assert!(FileManager::read_to_string(&existing)?.contains("Title: Configured"));
    Ok(())
}

#[test]
fn test_convert_file_withMissingInput_shouldFail() {
    let converter = Converter::new(Config::default());
    let result = converter.convert_file(
        std::path::Path::new("/nonexistent/none.xml"),
        std::path::Path::new("/tmp"),
        false,
    );
    assert!(result.is_err());
}

#[test]
fn test_convert_folder_withMixedFiles_shouldConvertEachXml() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season2");
    FileManager::ensure_dir(&nested)?;

    common::create_test_file(temp_dir.path(), "a.xml", &common::sample_document())?;
    common::create_test_file(&nested, "b.xml", &common::sample_document())?;
    common::create_test_file(&nested, "broken.xml", "<i><d p=")?;
    common::create_test_file(temp_dir.path(), "readme.txt", "not danmaku")?;

    let converter = Converter::new(Config::default());
    let summary = converter.convert_folder(temp_dir.path(), false)?;

    assert_eq!(summary.converted, 2);
    assert_eq!(summary.failed, 1);
    assert!(FileManager::file_exists(temp_dir.path().join("a.ass")));
    assert!(FileManager::file_exists(nested.join("b.ass")));
    assert!(!FileManager::file_exists(temp_dir.path().join("readme.ass")));

    let summary = converter.convert_folder(temp_dir.path(), false)?;
    assert_eq!(summary.converted, 0);
    assert_eq!(summary.skipped, 2);
    Ok(())
}

#[test]
fn test_convert_folder_withEmptyDirectory_shouldDoNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let converter = Converter::new(Config::default());

    let summary = converter.convert_folder(temp_dir.path(), false)?;
    assert_eq!(summary, Default::default());
    Ok(())
}
