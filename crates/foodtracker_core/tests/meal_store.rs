use foodtracker_core::{
    archive_path, decode_meals, encode_meals, load_meals, save_meals, Meal, StoreError,
};
use std::fs;

fn caprese() -> Meal {
    Meal::new("Caprese Salad", Some(vec![0x89, b'P', b'N', b'G', 1, 2, 3]), 4).unwrap()
}

fn chicken() -> Meal {
    Meal::new("Chicken and Potatoes", None, 5).unwrap()
}

#[test]
fn encode_decode_roundtrip_preserves_order_and_fields() {
    let meals = vec![
        caprese(),
        chicken(),
        Meal::new("Pasta with Meatballs", Some(Vec::new()), 0).unwrap(),
    ];

    let decoded = decode_meals(&encode_meals(&meals).unwrap()).unwrap();
    assert_eq!(decoded, meals);
    assert_eq!(decoded[2].photo(), Some(&b""[..]));
}

#[test]
fn encode_decode_roundtrip_handles_empty_list() {
    let decoded = decode_meals(&encode_meals(&[]).unwrap()).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn save_then_load_returns_same_meals() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive_path(dir.path());

    save_meals(&[caprese(), chicken()], &path).unwrap();
    let loaded = load_meals(&path).unwrap().expect("archive should exist");

    assert_eq!(loaded, vec![caprese(), chicken()]);
}

#[test]
fn saving_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive_path(dir.path());
    let meals = vec![chicken(), caprese()];

    save_meals(&meals, &path).unwrap();
    let first = load_meals(&path).unwrap().unwrap();
    let first_bytes = fs::read(&path).unwrap();

    save_meals(&meals, &path).unwrap();
    let second = load_meals(&path).unwrap().unwrap();

    assert_eq!(first, meals);
    assert_eq!(second, meals);
    assert_eq!(fs::read(&path).unwrap(), first_bytes);
}

#[test]
fn save_replaces_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive_path(dir.path());

    save_meals(&[caprese(), chicken()], &path).unwrap();
    save_meals(&[chicken()], &path).unwrap();

    assert_eq!(load_meals(&path).unwrap().unwrap(), vec![chicken()]);
}

#[test]
fn load_missing_archive_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = load_meals(dir.path().join("meals")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn load_garbage_archive_returns_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive_path(dir.path());
    fs::write(&path, b"bplist00 not a meal archive").unwrap();

    let err = load_meals(&path).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)), "unexpected error: {err}");
    assert_eq!(err.code(), "corrupt_store");
}

#[test]
fn load_truncated_archive_returns_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive_path(dir.path());
    save_meals(&[caprese(), chicken()], &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let err = load_meals(&path).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)), "unexpected error: {err}");
}

#[test]
fn load_empty_file_returns_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive_path(dir.path());
    fs::write(&path, b"").unwrap();

    assert!(matches!(load_meals(&path), Err(StoreError::Corrupt(_))));
}

#[test]
fn scenario_from_first_run_to_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = archive_path(dir.path());

    let record_a = Meal::new("Caprese Salad", Some(b"photo1".to_vec()), 4).unwrap();
    assert!(Meal::new("", None, 4).is_err());
    assert!(Meal::new("Salad", None, 7).is_err());
    let record_b = Meal::new("Salad", None, 2).unwrap();

    assert!(load_meals(&path).unwrap().is_none());
    save_meals(&[record_a.clone(), record_b.clone()], &path).unwrap();
    assert_eq!(load_meals(&path).unwrap().unwrap(), vec![record_a, record_b]);
}
