use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b").unwrap(), "a/b");
    assert_eq!(normalize_rel_path("a\\b").unwrap(), "a/b");
    assert_eq!(normalize_rel_path("./74/").unwrap(), "74");
    assert!(normalize_rel_path("../x").is_err());
    assert!(normalize_rel_path("/abs").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn file_name_validation() {
    validate_file_name("example.jpg").unwrap();
    validate_file_name("no_ext").unwrap();
    assert!(validate_file_name("").is_err());
    assert!(validate_file_name("..").is_err());
    assert!(validate_file_name("a/b.jpg").is_err());
    assert!(validate_file_name("a\\b.jpg").is_err());
}

#[test]
fn split_on_last_dot() {
    assert_eq!(split_file_name("example.jpg"), ("example", Some("jpg")));
    assert_eq!(split_file_name("a.b.jpg"), ("a.b", Some("jpg")));
    assert_eq!(split_file_name("plain"), ("plain", None));
    assert_eq!(split_file_name(".hidden"), (".hidden", None));
    assert_eq!(split_file_name("trailing."), ("trailing.", None));
}

#[tokio::test]
async fn stat_or_absent_treats_missing_as_none() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(stat_or_absent(&tmp.path().join("nope")).await.unwrap().is_none());
    assert!(stat_or_absent(tmp.path()).await.unwrap().is_some());
}

#[tokio::test]
async fn ensure_dir_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("a/b/c");
    ensure_dir(&dir).await.unwrap();
    ensure_dir(&dir).await.unwrap();
    assert!(dir.is_dir());
}

#[tokio::test]
async fn remove_tree_tolerates_absence() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("gone");
    remove_tree(&dir).await.unwrap();

    std::fs::create_dir_all(dir.join("inner")).unwrap();
    std::fs::write(dir.join("inner/f.txt"), b"x").unwrap();
    remove_tree(&dir).await.unwrap();
    assert!(!dir.exists());
}

#[tokio::test]
async fn glob_matches_every_extension_for_stem() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["pic.jpg", "pic.png", "other.jpg", "pic"] {
        std::fs::write(tmp.path().join(name), b"x").unwrap();
    }

    let mut found = glob_with_stem(tmp.path(), "pic").await.unwrap();
    found.sort();
    assert_eq!(
        found,
        vec![tmp.path().join("pic.jpg"), tmp.path().join("pic.png")]
    );
}

#[tokio::test]
async fn glob_escapes_metacharacters_in_stem() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("[x].jpg"), b"x").unwrap();
    std::fs::write(tmp.path().join("x.jpg"), b"x").unwrap();

    let found = glob_with_stem(tmp.path(), "[x]").await.unwrap();
    assert_eq!(found, vec![tmp.path().join("[x].jpg")]);
}

#[tokio::test]
async fn glob_on_missing_dir_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let found = glob_with_stem(&tmp.path().join("missing"), "pic")
        .await
        .unwrap();
    assert!(found.is_empty());
}
