use std::fs;
use std::io::Read;
use std::path::Path;

use cybersaver::error::AppError;
use cybersaver::profiles::ProfileStore;
use cybersaver::saves::{QuestIndex, SaveKind};

fn store() -> (tempfile::TempDir, ProfileStore) {
    let dir = tempfile::tempdir().expect("tempdir should work");
    let store = ProfileStore::open(dir.path().join("profiles")).expect("store should open");
    (dir, store)
}

fn write_save(profile_dir: &Path, name: &str, sidecar: Option<&str>) {
    let save = profile_dir.join(name);
    fs::create_dir_all(&save).expect("mkdir should work");
    fs::write(save.join("sav.dat"), name).expect("write should work");
    if let Some(raw) = sidecar {
        fs::write(save.join("metadata.9.json"), raw).expect("write should work");
    }
}

#[test]
fn create_rejects_existing_profile() {
    let (_dir, store) = store();
    store.create_profile("corpo").expect("create should work");

    let err = store.create_profile("corpo").expect_err("duplicate should fail");
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.list_profiles(), ["corpo"]);
}

#[test]
fn lists_profiles_sorted_and_skips_files() {
    let (_dir, store) = store();
    store.create_profile("street").expect("create should work");
    store.create_profile("corpo").expect("create should work");
    fs::write(store.root().join("stray.txt"), "x").expect("write should work");

    assert_eq!(store.list_profiles(), ["corpo", "street"]);
}

#[test]
fn notes_round_trip_trimmed() {
    let (_dir, store) = store();
    store.create_profile("nomad").expect("create should work");
    assert_eq!(store.read_note("nomad"), "");

    store
        .write_note("nomad", "  before the heist \n")
        .expect("note should save");
    assert_eq!(store.read_note("nomad"), "before the heist");
}

#[test]
fn lists_saves_with_metadata() {
    let (_dir, store) = store();
    let profile = store.create_profile("corpo").expect("create should work");
    write_save(
        &profile,
        "ManualSave-2",
        Some(
            r#"{"Data":{"metadata":{"trackedQuestEntry":"quests/prologue/q005_heist/konpeki/enter_hotel","playTime":7500.0,"level":12.0}}}"#,
        ),
    );
    fs::write(profile.join("ManualSave-2/screenshot.png"), b"png").expect("write should work");

    let saves = store.list_saves("corpo", &QuestIndex::bundled());
    assert_eq!(saves.len(), 1);

    let save = &saves[0];
    assert_eq!(save.name, "ManualSave-2");
    assert_eq!(save.kind, SaveKind::Manual);
    assert_eq!(save.screenshot, "ManualSave-2/screenshot.png");
    assert_eq!(save.playtime, "2h 5m");
    assert_eq!(save.level, "Lvl 12");
    assert_eq!(save.quest, "enter_hotel");
    assert_eq!(save.quest_title, "The Heist");
}

#[test]
fn saves_without_sidecar_have_empty_details() {
    let (_dir, store) = store();
    let profile = store.create_profile("street").expect("create should work");
    write_save(&profile, "AutoSave-0", None);
    write_save(&profile, "QuickSave-1", Some("not json"));

    let mut saves = store.list_saves("street", &QuestIndex::default());
    saves.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(saves[0].kind, SaveKind::Auto);
    assert_eq!(saves[1].kind, SaveKind::Other);
    for save in &saves {
        assert!(save.playtime.is_empty());
        assert!(save.quest.is_empty());
        assert!(save.screenshot.is_empty());
    }
}

#[test]
fn missing_profile_has_no_saves() {
    let (_dir, store) = store();
    assert!(store.list_saves("ghost", &QuestIndex::default()).is_empty());
}

#[test]
fn copy_save_suffixes_on_collision() {
    let (_dir, store) = store();
    let corpo = store.create_profile("corpo").expect("create should work");
    let street = store.create_profile("street").expect("create should work");
    write_save(&corpo, "ManualSave-1", None);
    write_save(&street, "ManualSave-1", None);

    let dest = store
        .copy_save("corpo", "ManualSave-1", "street")
        .expect("copy should work");
    let dest_name = dest
        .file_name()
        .expect("dest has a name")
        .to_string_lossy()
        .into_owned();

    assert!(dest_name.starts_with("ManualSave-1_copy_"));
    assert_eq!(
        fs::read_to_string(dest.join("sav.dat")).expect("read should work"),
        "ManualSave-1"
    );
}

#[test]
fn copy_save_creates_target_profile() {
    let (_dir, store) = store();
    let corpo = store.create_profile("corpo").expect("create should work");
    write_save(&corpo, "AutoSave-3", None);

    let dest = store
        .copy_save("corpo", "AutoSave-3", "fresh")
        .expect("copy should work");
    assert_eq!(dest, store.profile_dir("fresh").join("AutoSave-3"));
}

#[test]
fn copy_missing_save_is_not_found() {
    let (_dir, store) = store();
    store.create_profile("corpo").expect("create should work");

    let err = store
        .copy_save("corpo", "nope", "street")
        .expect_err("copy should fail");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn delete_save_and_missing_save_succeed() {
    let (_dir, store) = store();
    let corpo = store.create_profile("corpo").expect("create should work");
    write_save(&corpo, "AutoSave-1", None);

    store.delete_save("corpo", "AutoSave-1").expect("delete should work");
    store.delete_save("corpo", "AutoSave-1").expect("second delete should work");
    assert!(!corpo.join("AutoSave-1").exists());
}

#[test]
fn delete_profile_refuses_active_target() {
    let (_dir, store) = store();
    let corpo = store.create_profile("corpo").expect("create should work");

    let err = store
        .delete_profile("corpo", Some(&corpo))
        .expect_err("active delete should fail");
    assert!(matches!(err, AppError::Conflict(_)));

    store.delete_profile("corpo", None).expect("delete should work");
    assert!(!store.exists("corpo"));
    store.delete_profile("corpo", None).expect("missing delete should work");
}

#[test]
fn imports_game_folder_contents() {
    let (dir, store) = store();
    let game = dir.path().join("Cyberpunk 2077");
    write_save(&game, "AutoSave-0", None);
    fs::write(game.join("UserSettings.json"), "{}").expect("write should work");

    let dest = store.import_from(&game, "imported").expect("import should work");

    assert!(dest.join("AutoSave-0/sav.dat").is_file());
    assert!(dest.join("UserSettings.json").is_file());
    assert!(game.join("AutoSave-0/sav.dat").is_file());
}

#[test]
fn exports_zip_rooted_at_profile_name() {
    let (_dir, store) = store();
    let nomad = store.create_profile("nomad").expect("create should work");
    write_save(&nomad, "ManualSave-7", None);

    let file = store.export_zip("nomad").expect("export should work");
    let mut archive = zip::ZipArchive::new(file).expect("zip should open");

    let mut contents = String::new();
    archive
        .by_name("nomad/ManualSave-7/sav.dat")
        .expect("entry should exist")
        .read_to_string(&mut contents)
        .expect("read should work");
    assert_eq!(contents, "ManualSave-7");
}

#[test]
fn export_missing_profile_is_not_found() {
    let (_dir, store) = store();
    let err = store.export_zip("ghost").expect_err("export should fail");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[cfg(unix)]
#[test]
fn import_into_linked_profile_keeps_saves() {
    let (dir, store) = store();
    let main = store.create_profile("main").expect("create should work");
    write_save(&main, "ManualSave-0", None);
    let game = dir.path().join("Cyberpunk 2077");
    std::os::unix::fs::symlink(&main, &game).expect("symlink should work");

    let err = store
        .import_from(&game, "main")
        .expect_err("self import should fail");
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(
        fs::read_to_string(main.join("ManualSave-0/sav.dat")).expect("read should work"),
        "ManualSave-0"
    );
}

#[test]
fn import_refuses_game_folder_inside_profile() {
    let (_dir, store) = store();
    let main = store.create_profile("main").expect("create should work");
    let nested = main.join("Cyberpunk 2077");
    write_save(&nested, "AutoSave-0", None);

    let err = store
        .import_from(&nested, "main")
        .expect_err("nested import should fail");
    assert!(matches!(err, AppError::Conflict(_)));
}
