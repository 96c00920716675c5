use base16_activator::cli::Commands;
use base16_activator::config::AppConfig;
use base16_activator::terminal::{Console, SharedConsole};
use base16_activator::{App, AppError};
use claims::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

type TestApp = App<Cursor<&'static str>, Vec<u8>>;

fn setup(root: &Path, config_toml: &str, input: &'static str) -> (TestApp, SharedConsole<Cursor<&'static str>, Vec<u8>>) {
    let themes_dir = root.join("themes");
    fs::create_dir_all(&themes_dir).unwrap();
    for theme in ["base16-mocha", "base16-ocean", "base16-eighties"] {
        fs::write(
            themes_dir.join(format!("{theme}.json")),
            format!(r#"{{"name": "{theme}"}}"#),
        )
        .unwrap();
    }

    let config: AppConfig = toml::from_str(config_toml).unwrap();
    let console = Console::shared(Cursor::new(input), Vec::new());
    (App::new(config.with_base_dir(root), console.clone()), console)
}

fn transcript(console: &SharedConsole<Cursor<&'static str>, Vec<u8>>) -> String {
    String::from_utf8(console.borrow().output().clone()).unwrap()
}

fn configured(root: &Path) -> Vec<String> {
    let settings: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("settings.json")).unwrap()).unwrap();
    serde_json::from_value(settings["base16.generator.activatedThemes"].clone()).unwrap()
}

#[test]
fn test_activate_picks_and_prompts_restart() {
    let root = TempDir::new().unwrap();
    // candidates are listed sorted: eighties, mocha, ocean
    let (app, console) = setup(root.path(), "editor_name = \"Helix\"\n", "3,1\nn\n");

    assert_ok!(app.run(Commands::Activate, &mut Vec::new()));

    assert_eq!(configured(root.path()), vec!["base16-eighties", "base16-ocean"]);
    let marker = root.path().join("activated").join("base16-ocean.json");
    assert_eq!(
        fs::read_to_string(marker).unwrap(),
        r#"{"name": "base16-ocean"}"#
    );

    let shown = transcript(&console);
    assert!(shown.contains("Search a theme:"));
    assert!(shown.contains("Base16 theme has changed (2 Added). Please restart Helix."));
    assert!(!shown.contains("Error:"));
}

#[test]
fn test_cancelled_activation_leaves_settings_alone() {
    let root = TempDir::new().unwrap();
    let (app, console) = setup(root.path(), "", "\n");

    assert_ok!(app.run(Commands::Activate, &mut Vec::new()));

    assert!(!root.path().join("settings.json").exists());
    assert!(!transcript(&console).contains("Restart now?"));
}

#[test]
fn test_deactivate_all_without_restart_command_prints_reminder() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("settings.json"),
        r#"{"base16.generator.activatedThemes": ["base16-mocha"], "editor.fontSize": 14}"#,
    )
    .unwrap();
    // first answer is the startup sync, second the deactivation
    let (app, console) = setup(root.path(), "", "n\ny\n");

    assert_ok!(app.run(Commands::DeactivateAll, &mut Vec::new()));

    assert!(configured(root.path()).is_empty());
    assert!(!root.path().join("activated").join("base16-mocha.json").exists());

    let settings = fs::read_to_string(root.path().join("settings.json")).unwrap();
    assert!(settings.contains("editor.fontSize"));

    let shown = transcript(&console);
    assert!(shown.contains("(1 Removed). Please restart your editor."));
    assert!(shown.contains("Restart your editor to load the activated themes."));
}

#[cfg(unix)]
#[test]
fn test_failed_restart_command_is_reported() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("settings.json"),
        r#"{"base16.generator.activatedThemes": ["base16-mocha"]}"#,
    )
    .unwrap();
    let (app, console) = setup(root.path(), "restart_command = \"exit 1\"\n", "y\n");

    let error = assert_err!(app.run(Commands::Sync, &mut Vec::new()));

    assert!(matches!(error, AppError::Reported(1)));
    assert!(transcript(&console).contains("Error: Failed to restart your editor"));
    // the activation itself went through
    assert!(root.path().join("activated").join("base16-mocha.json").is_file());
}

#[test]
fn test_unwritable_activation_dir_fails_the_run() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("settings.json"),
        r#"{"base16.generator.activatedThemes": ["base16-ocean"]}"#,
    )
    .unwrap();
    // a plain file where the activation directory should be
    fs::write(root.path().join("activated"), "").unwrap();
    let (app, console) = setup(root.path(), "", "");

    let error = assert_err!(app.run(Commands::Sync, &mut Vec::new()));

    assert!(matches!(error, AppError::Reported(1)));
    assert!(transcript(&console).contains("Error: Base16: sync activated themes failed"));
}

#[test]
fn test_list_active_follows_activation_order() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("settings.json"),
        r#"{"base16.generator.activatedThemes": ["base16-ocean", "base16-missing", "base16-eighties"]}"#,
    )
    .unwrap();
    let (app, _console) = setup(root.path(), "", "");

    let mut out = Vec::new();
    assert_ok!(app.run(
        Commands::List {
            active: true,
            inactive: false
        },
        &mut out
    ));

    let listing = String::from_utf8(out).unwrap();
    let ids: Vec<&str> = listing
        .lines()
        .map(|line| line.split_whitespace().nth(1).unwrap())
        .collect();
    assert_eq!(ids, vec!["base16-ocean", "base16-eighties"]);
}

#[test]
fn test_activation_dir_spelled_as_catalog_leaves_assets_alone() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("settings.json"),
        r#"{"base16.generator.activatedThemes": ["base16-ocean"]}"#,
    )
    .unwrap();
    let (app, console) = setup(
        root.path(),
        "themes_dir = \"themes\"\nactivation_dir = \"x/../themes\"\n",
        "",
    );
    assert!(app.config().validate().is_err());

    let error = assert_err!(app.run(Commands::Sync, &mut Vec::new()));

    assert!(matches!(error, AppError::Reported(1)));
    assert!(transcript(&console).contains("overlaps themes directory"));
    let themes_dir = root.path().join("themes");
    assert_eq!(
        fs::read_to_string(themes_dir.join("base16-ocean.json")).unwrap(),
        r#"{"name": "base16-ocean"}"#
    );
    assert!(themes_dir.join("base16-mocha.json").is_file());
}
