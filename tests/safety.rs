use std::fs;

use cybersaver::safety::ensure_protection;

#[test]
fn backs_up_saves_once() {
    let dir = tempfile::tempdir().expect("tempdir should work");
    let game = dir.path().join("Cyberpunk 2077");
    fs::create_dir_all(game.join("ManualSave-1")).expect("mkdir should work");
    fs::write(game.join("ManualSave-1/sav.dat"), "v").expect("write should work");
    let profiles = dir.path().join("profiles");

    let first = ensure_protection(Some(&game), &profiles).expect("protection should work");
    assert!(first.first_run);
    assert_eq!(first.foreign_link, None);
    let backup = first.backup.expect("backup should be made");
    assert!(backup.join("ManualSave-1/sav.dat").is_file());
    assert!(
        backup
            .file_name()
            .expect("backup has a name")
            .to_string_lossy()
            .starts_with("Cyberpunk 2077_backup_")
    );
    assert!(profiles.join(".warning_ack").is_file());

    let second = ensure_protection(Some(&game), &profiles).expect("protection should work");
    assert!(!second.first_run);
    assert_eq!(second.backup, None);
}

#[test]
fn first_run_without_game_folder_only_writes_marker() {
    let dir = tempfile::tempdir().expect("tempdir should work");
    let profiles = dir.path().join("profiles");

    let report = ensure_protection(Some(&dir.path().join("missing")), &profiles)
        .expect("protection should work");
    assert!(report.first_run);
    assert_eq!(report.backup, None);
    assert!(profiles.join(".warning_ack").is_file());
}

#[cfg(unix)]
#[test]
fn reports_link_pointing_outside_profiles() {
    let dir = tempfile::tempdir().expect("tempdir should work");
    let elsewhere = dir.path().join("other-tool/slot1");
    fs::create_dir_all(&elsewhere).expect("mkdir should work");
    let game = dir.path().join("Cyberpunk 2077");
    std::os::unix::fs::symlink(&elsewhere, &game).expect("symlink should work");

    let report = ensure_protection(Some(&game), &dir.path().join("profiles"))
        .expect("protection should work");
    assert_eq!(report.foreign_link, Some(elsewhere));
}
