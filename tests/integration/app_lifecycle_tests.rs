/*!
 * End-to-end tests through the application controller
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;

use srt_relay::app_config::Config;
use srt_relay::app_controller::Controller;
use srt_relay::providers::mock::MockProvider;
use srt_relay::session::JobStatus;
use srt_relay::subtitle_processor::SubtitleCollection;
use crate::common;

fn config(target_language: &str) -> Config {
    Config {
        target_language: target_language.to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_controller_from_mock_config_should_translate_file() -> Result<()> {
    let input_dir = common::create_temp_dir()?;
    let output_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(input_dir.path(), "movie.srt")?;

    let controller = Controller::with_config(config("Hungarian"))?;
    let output = controller.run(&input, Some(output_dir.path()), false).await?.unwrap();

    assert_eq!(output, output_dir.path().join("movie_hungarian.srt"));
    let entries = SubtitleCollection::parse_file(&output)?;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].lines.len(), 2);
    assert_eq!(controller.manager().store().count_by_status(JobStatus::Completed), 1);
    Ok(())
}

#[tokio::test]
async fn test_run_folder_should_translate_valid_files_and_count_them() -> Result<()> {
    let input_dir = common::create_temp_dir()?;
    let output_dir = common::create_temp_dir()?;
    common::create_test_subtitle(input_dir.path(), "a.srt")?;
    fs::create_dir_all(input_dir.path().join("season2"))?;
    common::create_test_file(&input_dir.path().join("season2"), "b.srt", &common::sample_srt(15))?;
    common::create_test_file(input_dir.path(), "broken.srt", "this is not a subtitle")?;
    common::create_test_file(input_dir.path(), "readme.txt", "ignored")?;

    let controller = Controller::with_provider(config("de"), Arc::new(MockProvider::slow(0, 3)));
    let translated = controller.run_folder(input_dir.path(), Some(output_dir.path()), false).await?;

    assert_eq!(translated, 2);
    assert!(output_dir.path().join("a_de.srt").exists());
    assert!(output_dir.path().join("b_de.srt").exists());
    assert!(!output_dir.path().join("broken_de.srt").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_folder_twice_should_skip_existing_outputs() -> Result<()> {
    let input_dir = common::create_temp_dir()?;
    let output_dir = common::create_temp_dir()?;
    common::create_test_subtitle(input_dir.path(), "a.srt")?;
    let controller = Controller::with_provider(config("es"), Arc::new(MockProvider::working()));

    assert_eq!(controller.run_folder(input_dir.path(), Some(output_dir.path()), false).await?, 1);
    assert_eq!(controller.run_folder(input_dir.path(), Some(output_dir.path()), false).await?, 0);
    assert_eq!(controller.run_folder(input_dir.path(), Some(output_dir.path()), true).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_run_folder_with_translated_outputs_in_place_should_ignore_them() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_subtitle(dir.path(), "a.srt")?;
    let controller = Controller::with_provider(config("es"), Arc::new(MockProvider::working()));

    assert_eq!(controller.run_folder(dir.path(), Some(dir.path()), false).await?, 1);
    assert_eq!(controller.run_folder(dir.path(), Some(dir.path()), true).await?, 1);
    assert!(!dir.path().join("a_es_es.srt").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_with_failing_provider_should_not_write_output() -> Result<()> {
    let input_dir = common::create_temp_dir()?;
    let output_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(input_dir.path(), "movie.srt")?;
    let controller = Controller::with_provider(config("fr"), Arc::new(MockProvider::failing_on_entry(3, "rejected")));

    let err = controller.run(&input, Some(output_dir.path()), false).await.unwrap_err();

    assert!(err.to_string().contains("rejected"));
    assert!(fs::read_dir(output_dir.path())?.next().is_none());
    Ok(())
}

#[test]
fn test_validate_file_should_reject_non_subtitle() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "fake.srt", "hello\nworld\n")?;

    let err = Controller::validate_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Not a valid .srt subtitle file"));
    Ok(())
}
